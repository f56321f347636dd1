use reqwest::{Client, Url};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::Value;
use shopit_core::RetryPolicy;
use shopit_core::payload::{MAX_VIDEOS, Video, VideoResults};
use shopit_core::tool::{Error as ToolError, Tool, ToolResult};

use crate::http::{HttpError, send_with_retry};

const SEARCH_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/search";
const NO_TITLE: &str = "No Title";
const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// Parameters of the video search.
#[derive(Deserialize, JsonSchema)]
pub struct VideoRecipeParameters {
    /// The recipe or dish name to search videos for (e.g., "chicken
    /// curry", "vegan lasagna").
    query: String,
}

/// A tool that searches YouTube for recipe videos.
///
/// The tool never fails: a missing API key or any API error yields an
/// empty video list.
pub struct VideoRecipeTool {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    retry_policy: RetryPolicy,
    parameter_schema: Value,
}

impl VideoRecipeTool {
    /// Creates a new video search tool.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: SEARCH_ENDPOINT.to_owned(),
            retry_policy: RetryPolicy::default(),
            parameter_schema: schema_for!(VideoRecipeParameters).to_value(),
        }
    }

    /// Sets the retry policy for rate-limited searches.
    #[inline]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets a custom search endpoint.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Tool for VideoRecipeTool {
    type Input = VideoRecipeParameters;

    fn name(&self) -> &str {
        "video_recipe"
    }

    fn description(&self) -> &str {
        "Searches YouTube for recipe videos based on a user query and returns \
         the top 6 results. Use this when a user asks for recipe videos."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: VideoRecipeParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let endpoint = self.endpoint.clone();
        let policy = self.retry_policy.clone();
        async move {
            info!("searching videos for {:?}", input.query);
            let videos = match api_key {
                Some(api_key) => {
                    let search = Search {
                        client: &client,
                        policy: &policy,
                        endpoint: &endpoint,
                        api_key: &api_key,
                    };
                    match search.run(&input.query).await {
                        Ok(videos) => videos,
                        Err(err) => {
                            error!("error calling YouTube API: {err}");
                            vec![]
                        }
                    }
                }
                None => {
                    error!("YouTube API key is missing");
                    vec![]
                }
            };
            debug!("found {} videos", videos.len());
            serde_json::to_value(VideoResults { videos }).map_err(|err| {
                ToolError::execution_error().with_reason(err.to_string())
            })
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum SearchError {
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("YouTube API answered with status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Body(#[from] reqwest::Error),
}

struct Search<'a> {
    client: &'a Client,
    policy: &'a RetryPolicy,
    endpoint: &'a str,
    api_key: &'a str,
}

impl Search<'_> {
    async fn run(&self, query: &str) -> Result<Vec<Video>, SearchError> {
        let q = format!("{query} recipe");
        let max_results = MAX_VIDEOS.to_string();
        let url = Url::parse_with_params(
            self.endpoint,
            [
                ("part", "snippet"),
                ("q", q.as_str()),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("videoEmbeddable", "true"),
                ("key", self.api_key),
            ],
        )
        .map_err(|err| SearchError::Endpoint(err.to_string()))?;

        let response =
            send_with_retry(self.policy, self.client.get(url)).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status(status.as_u16()));
        }
        let body: SearchListResponse = response.json().await?;
        Ok(videos_from_search(body))
    }
}

#[derive(Debug, Default, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    id: Option<ResourceId>,
    #[serde(default)]
    snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    channel_title: Option<String>,
    #[serde(default)]
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    #[serde(default)]
    medium: Option<Thumbnail>,
    #[serde(default)]
    default: Option<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnail {
    #[serde(default)]
    url: Option<String>,
}

/// Maps search hits to videos, dropping hits without a video id or a
/// thumbnail.
fn videos_from_search(response: SearchListResponse) -> Vec<Video> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item
                .id
                .and_then(|id| id.video_id)
                .filter(|id| !id.is_empty())?;
            let snippet = item.snippet.unwrap_or_default();
            let thumbnails = snippet.thumbnails.unwrap_or_default();
            let thumbnail_url = thumbnails
                .medium
                .and_then(|t| t.url)
                .filter(|url| !url.is_empty())
                .or_else(|| thumbnails.default.and_then(|t| t.url))
                .filter(|url| !url.is_empty())?;
            Some(Video {
                video_url: format!("https://www.youtube.com/watch?v={video_id}"),
                video_id,
                title: snippet
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| NO_TITLE.to_owned()),
                thumbnail_url,
                channel_title: snippet
                    .channel_title
                    .filter(|c| !c.is_empty())
                    .unwrap_or_else(|| UNKNOWN_CHANNEL.to_owned()),
            })
        })
        .take(MAX_VIDEOS)
        .collect()
}
