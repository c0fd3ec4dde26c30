use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use create_discussion::templates::WorkflowContext;
use create_discussion::{
    ActionOutputs, CreatedDiscussion, DiscussionCategory, DiscussionPlatform, NewDiscussion,
    PlatformError, RepositoryRecord, Runner, RunnerConfig, RunnerError, TemplateError,
};
use tempfile::TempDir;

/// 2024-03-05T14:30:00Z
const TIMESTAMP_MS: i64 = 1_709_649_000_000;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// In-memory platform that records every discussion it is asked to create.
struct FakePlatform {
    repository: Option<RepositoryRecord>,
    categories: Vec<DiscussionCategory>,
    create_error: Option<String>,
    created: Mutex<Vec<NewDiscussion>>,
}

impl FakePlatform {
    fn new() -> Self {
        Self {
            repository: Some(RepositoryRecord {
                id: "R_kgDOmyrepo".to_string(),
                owner: "octo".to_string(),
                name: "my-repo".to_string(),
            }),
            categories: vec![
                DiscussionCategory {
                    id: "DIC_announcements".to_string(),
                    name: "Announcements".to_string(),
                },
                DiscussionCategory {
                    id: "DIC_general".to_string(),
                    name: "General".to_string(),
                },
            ],
            create_error: None,
            created: Mutex::new(Vec::new()),
        }
    }

    fn created(&self) -> Vec<NewDiscussion> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl DiscussionPlatform for FakePlatform {
    async fn get_repository(
        &self,
        _owner: &str,
        _name: &str,
    ) -> Result<Option<RepositoryRecord>, PlatformError> {
        Ok(self.repository.clone())
    }

    async fn list_discussion_categories(
        &self,
        _owner: &str,
        _name: &str,
    ) -> Result<Vec<DiscussionCategory>, PlatformError> {
        Ok(self.categories.clone())
    }

    async fn create_discussion(
        &self,
        discussion: &NewDiscussion,
    ) -> Result<CreatedDiscussion, PlatformError> {
        if let Some(message) = &self.create_error {
            return Err(PlatformError::RequestFailed {
                message: message.clone(),
                errors: vec![message.clone(), "Body is too long".to_string()],
            });
        }

        let mut created = self.created.lock().unwrap();
        created.push(discussion.clone());
        let number = created.len() as u64 + 40;

        Ok(CreatedDiscussion {
            id: format!("D_kwDO{number}"),
            number,
            title: discussion.title.clone(),
            url: format!("https://github.com/octo/my-repo/discussions/{number}"),
        })
    }
}

fn config(template: PathBuf, category: &str, output: &TempDir) -> RunnerConfig {
    let mut env = BTreeMap::new();
    env.insert("VERSION".to_string(), "1.2.3".to_string());

    RunnerConfig::new(Some(template), category.to_string(), "octo/my-repo", "token".into())
        .unwrap()
        .with_env(env)
        .with_timestamp_millis(TIMESTAMP_MS)
        .with_outputs(ActionOutputs::to_file(output.path().join("github_output")))
}

#[tokio::test]
async fn creates_discussion_from_template() {
    let temp = TempDir::new().unwrap();
    let runner = Runner::with_platform(
        config(fixture("release.md"), "general", &temp),
        FakePlatform::new(),
    );

    let discussion = runner.run().await.unwrap();

    assert_eq!(discussion.number, 41);
    assert_eq!(discussion.title, "Release 1.2.3");

    let created = runner.platform().created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].repository_id, "R_kgDOmyrepo");
    assert_eq!(created[0].category_id, "DIC_general");
    assert_eq!(created[0].title, "Release 1.2.3");
    assert_eq!(created[0].body.trim_end(), "Notes for my-repo");

    let outputs = fs::read_to_string(temp.path().join("github_output")).unwrap();
    assert_eq!(
        outputs,
        "number=41\nurl=https://github.com/octo/my-repo/discussions/41\n"
    );
}

#[tokio::test]
async fn renders_dates_and_workflow_context() {
    let temp = TempDir::new().unwrap();
    let workflow = WorkflowContext {
        event_name: Some("schedule".to_string()),
        ..WorkflowContext::default()
    };
    let runner = Runner::with_platform(
        config(fixture("weekly.md"), "ANNOUNCEMENTS", &temp).with_workflow(workflow),
        FakePlatform::new(),
    );

    runner.run().await.unwrap();

    let created = runner.platform().created();
    assert_eq!(created[0].title, "Weekly sync for March 5, 2024");
    assert_eq!(created[0].category_id, "DIC_announcements");
    assert_eq!(
        created[0].body,
        "Agenda for octo/my-repo (schedule):\n\n- \n"
    );
}

#[tokio::test]
async fn fails_when_discussions_are_disabled() {
    let temp = TempDir::new().unwrap();
    let mut platform = FakePlatform::new();
    platform.categories.clear();
    let template = fixture("release.md");
    let runner = Runner::with_platform(config(template.clone(), "General", &temp), platform);

    let err = runner.run().await.unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Creating {
            source: PlatformError::DiscussionsDisabled { .. },
            ..
        }
    ));
    let message = err.to_string();
    assert!(message.contains("Discussions are not enabled"));
    assert!(message.contains("An error occurred while creating the discussion."));
    assert!(message.contains(&template.display().to_string()));
    assert!(runner.platform().created().is_empty());
    assert!(!temp.path().join("github_output").exists());
}

#[tokio::test]
async fn fails_when_category_is_missing() {
    let temp = TempDir::new().unwrap();
    let runner = Runner::with_platform(
        config(fixture("release.md"), "Ideas", &temp),
        FakePlatform::new(),
    );

    let err = runner.run().await.unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Creating {
            source: PlatformError::CategoryNotFound { .. },
            ..
        }
    ));
    assert!(err.to_string().contains("Could not find discussion category \"Ideas\""));
}

#[tokio::test]
async fn fails_when_repository_is_missing() {
    let temp = TempDir::new().unwrap();
    let mut platform = FakePlatform::new();
    platform.repository = None;
    let runner = Runner::with_platform(config(fixture("release.md"), "General", &temp), platform);

    let err = runner.run().await.unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Creating {
            source: PlatformError::RepoNotFound { .. },
            ..
        }
    ));
}

#[tokio::test]
async fn surfaces_platform_errors() {
    let temp = TempDir::new().unwrap();
    let mut platform = FakePlatform::new();
    platform.create_error = Some("Title can't be blank".to_string());
    let runner = Runner::with_platform(config(fixture("release.md"), "General", &temp), platform);

    let err = runner.run().await.unwrap_err();

    match &err {
        RunnerError::Creating { source, .. } => {
            assert_eq!(source.sub_errors().len(), 2);
        }
        other => panic!("expected a creation error, got {other:?}"),
    }
    assert!(err.to_string().ends_with("\n\nTitle can't be blank"));
}

#[tokio::test]
async fn malformed_template_stops_before_any_request() {
    let temp = TempDir::new().unwrap();
    let runner = Runner::with_platform(
        config(fixture("no-title.md"), "General", &temp),
        FakePlatform::new(),
    );

    let err = runner.run().await.unwrap_err();

    assert!(matches!(
        err,
        RunnerError::Template(TemplateError::MalformedTemplate { .. })
    ));
    assert!(runner.platform().created().is_empty());
}

#[tokio::test]
async fn missing_template_is_an_io_error() {
    let temp = TempDir::new().unwrap();
    let runner = Runner::with_platform(
        config(temp.path().join("DISCUSSION_TEMPLATE.md"), "General", &temp),
        FakePlatform::new(),
    );

    let err = runner.run().await.unwrap_err();

    assert!(matches!(err, RunnerError::Template(TemplateError::Io { .. })));
}
