//! GitHub implementation of [`DiscussionPlatform`].

use super::graphql::GraphQlResponse;
use super::{
    CreatedDiscussion, DiscussionCategory, DiscussionPlatform, NewDiscussion, PlatformError,
    RepositoryRecord, CATEGORY_PAGE_SIZE,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, info_span, Instrument};
use url::Url;

const CATEGORIES_QUERY: &str = r#"
    query DiscussionCategories($owner: String!, $repo: String!, $first: Int!) {
        repository(owner: $owner, name: $repo) {
            discussionCategories(first: $first) {
                nodes {
                    id
                    name
                }
            }
        }
    }
"#;

// https://docs.github.com/en/graphql/guides/using-the-graphql-api-for-discussions#creatediscussion
const CREATE_DISCUSSION_MUTATION: &str = r#"
    mutation CreateDiscussion($repoNodeId: ID!, $categoryNodeId: ID!, $postBody: String!, $postTitle: String!) {
        createDiscussion(input: {repositoryId: $repoNodeId, categoryId: $categoryNodeId, body: $postBody, title: $postTitle}) {
            discussion {
                id
                number
                title
                url
            }
        }
    }
"#;

/// GraphQL endpoint of github.com.
const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// GitHub REST + GraphQL client for discussions.
#[derive(Debug, Clone)]
pub struct GitHubPlatform {
    octocrab: Octocrab,
    /// Client rooted at the origin of the GraphQL endpoint. Kept apart from
    /// the REST client so a base path such as `/api/v3` is not prepended.
    graphql_client: Octocrab,
    graphql_path: String,
}

impl GitHubPlatform {
    /// Builds an authenticated client.
    ///
    /// `api_url` overrides the REST base URI and `graphql_url` the GraphQL
    /// endpoint, for GitHub Enterprise Server. Without `graphql_url`, the
    /// endpoint is derived from `api_url` (see [`graphql_url_for`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built or an endpoint is not a valid URL.
    pub fn new(
        token: &str,
        api_url: Option<&str>,
        graphql_url: Option<&str>,
    ) -> Result<Self, PlatformError> {
        let graphql_url = match graphql_url {
            Some(url) => url.to_string(),
            None => api_url.map_or_else(|| DEFAULT_GRAPHQL_URL.to_string(), graphql_url_for),
        };
        let endpoint = Url::parse(&graphql_url).map_err(|source| PlatformError::InvalidEndpoint {
            url: graphql_url.clone(),
            source,
        })?;
        let origin = endpoint.join("/").map_err(|source| PlatformError::InvalidEndpoint {
            url: graphql_url.clone(),
            source,
        })?;

        let mut builder = Octocrab::builder().personal_token(token.to_string());
        if let Some(api_url) = api_url {
            builder = builder.base_uri(api_url)?;
        }
        let graphql_client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(origin.as_str())?
            .build()?;
        debug!(graphql_url = %endpoint, "GitHub client ready");

        Ok(Self {
            octocrab: builder.build()?,
            graphql_client,
            graphql_path: endpoint.path().to_string(),
        })
    }

    /// Sends a GraphQL request and unwraps its `{data, errors}` envelope.
    async fn graphql<T: DeserializeOwned>(
        &self,
        operation: &str,
        payload: &serde_json::Value,
    ) -> Result<T, PlatformError> {
        let response: GraphQlResponse<T> =
            self.graphql_client.post(&self.graphql_path, Some(payload)).await?;
        response.into_result(operation)
    }
}

/// GraphQL endpoint that belongs to a REST base URI.
///
/// GitHub Enterprise Server serves REST under `/api/v3` and GraphQL under
/// `/api/graphql`; elsewhere GraphQL sits at `/graphql` below the REST base.
#[must_use]
pub fn graphql_url_for(api_url: &str) -> String {
    let base = api_url.trim_end_matches('/');
    match base.strip_suffix("/v3") {
        Some(prefix) => format!("{prefix}/graphql"),
        None => format!("{base}/graphql"),
    }
}

/// Whether an error is GitHub's 404 response.
fn is_not_found(error: &octocrab::Error) -> bool {
    match error {
        octocrab::Error::GitHub { source, .. } => source.status_code.as_u16() == 404,
        _ => false,
    }
}

#[async_trait]
impl DiscussionPlatform for GitHubPlatform {
    async fn get_repository(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Option<RepositoryRecord>, PlatformError> {
        let span = info_span!("get_repository", owner, name);

        async {
            let repository = match self.octocrab.repos(owner, name).get().await {
                Ok(repository) => repository,
                Err(e) if is_not_found(&e) => return Ok(None),
                Err(e) => return Err(e.into()),
            };

            Ok(repository.node_id.map(|id| RepositoryRecord {
                id,
                owner: owner.to_string(),
                name: name.to_string(),
            }))
        }
        .instrument(span)
        .await
    }

    async fn list_discussion_categories(
        &self,
        owner: &str,
        name: &str,
    ) -> Result<Vec<DiscussionCategory>, PlatformError> {
        #[derive(Deserialize)]
        struct QueryResult {
            repository: Option<QueryRepository>,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct QueryRepository {
            discussion_categories: QueryCategories,
        }
        #[derive(Deserialize)]
        struct QueryCategories {
            nodes: Vec<Option<DiscussionCategory>>,
        }

        let span = info_span!("list_discussion_categories", owner, name);

        async {
            let payload = json!({
                "query": CATEGORIES_QUERY,
                "variables": {
                    "owner": owner,
                    "repo": name,
                    "first": CATEGORY_PAGE_SIZE,
                }
            });
            let result: QueryResult = self.graphql("discussionCategories", &payload).await?;

            let repository = result
                .repository
                .ok_or_else(|| PlatformError::RepoNotFound {
                    owner: owner.to_string(),
                    repo: name.to_string(),
                })?;

            let categories: Vec<DiscussionCategory> = repository
                .discussion_categories
                .nodes
                .into_iter()
                .flatten()
                .collect();
            debug!(count = categories.len(), "Fetched discussion categories");

            Ok(categories)
        }
        .instrument(span)
        .await
    }

    async fn create_discussion(
        &self,
        discussion: &NewDiscussion,
    ) -> Result<CreatedDiscussion, PlatformError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct QueryResult {
            create_discussion: QueryCreateDiscussion,
        }
        #[derive(Deserialize)]
        struct QueryCreateDiscussion {
            discussion: CreatedDiscussion,
        }

        let span = info_span!("create_discussion", title = %discussion.title);

        async {
            info!("Creating repo discussion...");

            let payload = json!({
                "query": CREATE_DISCUSSION_MUTATION,
                "variables": {
                    "repoNodeId": discussion.repository_id,
                    "categoryNodeId": discussion.category_id,
                    "postBody": discussion.body,
                    "postTitle": discussion.title,
                }
            });
            let result: QueryResult = self.graphql("createDiscussion", &payload).await?;

            let created = result.create_discussion.discussion;
            info!(number = created.number, "Successfully created the repo discussion.");

            Ok(created)
        }
        .instrument(span)
        .await
    }
}
