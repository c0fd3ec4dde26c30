//! Values exposed to discussion templates.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Default REST endpoint when `GITHUB_API_URL` is unset.
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default web endpoint when `GITHUB_SERVER_URL` is unset.
const DEFAULT_SERVER_URL: &str = "https://github.com";

/// Default GraphQL endpoint when `GITHUB_GRAPHQL_URL` is unset.
const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Repository coordinates, exposed as `{{ repo.owner }}` and `{{ repo.repo }}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoContext {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

/// The workflow run that triggered the action.
///
/// Fields are flattened into the top level of the template context, so a
/// template reads `{{ sha }}` or `{{ payload.release.tag_name }}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowContext {
    /// Webhook payload of the triggering event.
    pub payload: Value,
    pub event_name: Option<String>,
    pub sha: Option<String>,
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    pub workflow: Option<String>,
    pub action: Option<String>,
    pub actor: Option<String>,
    pub job: Option<String>,
    pub run_number: Option<u64>,
    pub run_id: Option<u64>,
    pub api_url: String,
    pub server_url: String,
    pub graphql_url: String,
}

impl Default for WorkflowContext {
    fn default() -> Self {
        Self {
            payload: json!({}),
            event_name: None,
            sha: None,
            git_ref: None,
            workflow: None,
            action: None,
            actor: None,
            job: None,
            run_number: None,
            run_id: None,
            api_url: DEFAULT_API_URL.to_string(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
        }
    }
}

impl WorkflowContext {
    /// Builds the workflow context from a snapshot of `GITHUB_*` variables.
    ///
    /// The event payload is read from the file named by `GITHUB_EVENT_PATH`.
    /// A missing or unreadable payload file yields an empty object.
    #[must_use]
    pub fn from_env(env: &BTreeMap<String, String>) -> Self {
        let var = |name: &str| env.get(name).filter(|v| !v.is_empty()).cloned();
        let number = |name: &str| -> Option<u64> { var(name).and_then(|v| v.parse().ok()) };

        let payload = var("GITHUB_EVENT_PATH")
            .map(|path| read_payload(Path::new(&path)))
            .unwrap_or_else(|| json!({}));

        Self {
            payload,
            event_name: var("GITHUB_EVENT_NAME"),
            sha: var("GITHUB_SHA"),
            git_ref: var("GITHUB_REF"),
            workflow: var("GITHUB_WORKFLOW"),
            action: var("GITHUB_ACTION"),
            actor: var("GITHUB_ACTOR"),
            job: var("GITHUB_JOB"),
            run_number: number("GITHUB_RUN_NUMBER"),
            run_id: number("GITHUB_RUN_ID"),
            api_url: var("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            server_url: var("GITHUB_SERVER_URL").unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            graphql_url: var("GITHUB_GRAPHQL_URL")
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
        }
    }
}

fn read_payload(path: &Path) -> Value {
    let parsed = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()));

    match parsed {
        Ok(payload) => payload,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not read event payload");
            json!({})
        }
    }
}

/// Everything a template can reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateContext {
    #[serde(flatten)]
    pub workflow: WorkflowContext,

    pub repo: RepoContext,

    /// Process environment, exposed as `{{ env.NAME }}`.
    pub env: BTreeMap<String, String>,

    /// Milliseconds since the Unix epoch, for use with `format_date`.
    pub date: i64,
}

impl TemplateContext {
    /// Converts the context into the JSON value handed to the renderer.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env_of(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn workflow_defaults_without_env() {
        let workflow = WorkflowContext::from_env(&BTreeMap::new());

        assert_eq!(workflow, WorkflowContext::default());
        assert_eq!(workflow.payload, json!({}));
        assert_eq!(workflow.api_url, "https://api.github.com");
    }

    #[test]
    fn workflow_reads_github_variables() {
        let env = env_of(&[
            ("GITHUB_SHA", "abc123"),
            ("GITHUB_REF", "refs/tags/v1.0.0"),
            ("GITHUB_EVENT_NAME", "release"),
            ("GITHUB_RUN_NUMBER", "42"),
            ("GITHUB_RUN_ID", "not-a-number"),
            ("GITHUB_ACTOR", ""),
        ]);
        let workflow = WorkflowContext::from_env(&env);

        assert_eq!(workflow.sha.as_deref(), Some("abc123"));
        assert_eq!(workflow.git_ref.as_deref(), Some("refs/tags/v1.0.0"));
        assert_eq!(workflow.event_name.as_deref(), Some("release"));
        assert_eq!(workflow.run_number, Some(42));
        assert_eq!(workflow.run_id, None);
        assert_eq!(workflow.actor, None);
    }

    #[test]
    fn workflow_reads_event_payload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("event.json");
        fs::write(&path, r#"{"release":{"tag_name":"v2.0.0"}}"#).unwrap();

        let env = env_of(&[("GITHUB_EVENT_PATH", path.to_str().unwrap())]);
        let workflow = WorkflowContext::from_env(&env);

        assert_eq!(workflow.payload["release"]["tag_name"], "v2.0.0");
    }

    #[test]
    fn unreadable_payload_is_empty_object() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.json");

        let env = env_of(&[("GITHUB_EVENT_PATH", path.to_str().unwrap())]);
        assert_eq!(WorkflowContext::from_env(&env).payload, json!({}));
    }

    #[test]
    fn context_serializes_flat_workflow_fields() {
        let context = TemplateContext {
            workflow: WorkflowContext {
                git_ref: Some("refs/heads/main".to_string()),
                event_name: Some("push".to_string()),
                ..WorkflowContext::default()
            },
            repo: RepoContext {
                owner: "octo".to_string(),
                repo: "hello".to_string(),
            },
            env: env_of(&[("VERSION", "1.2.3")]),
            date: 0,
        };
        let value = context.to_value().unwrap();

        assert_eq!(value["ref"], "refs/heads/main");
        assert_eq!(value["eventName"], "push");
        assert_eq!(value["repo"]["repo"], "hello");
        assert_eq!(value["env"]["VERSION"], "1.2.3");
        assert_eq!(value["date"], 0);
    }
}
