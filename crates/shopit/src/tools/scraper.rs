use std::fmt::Write as _;

use reqwest::{Client, Url, header};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};
use shopit_core::RetryPolicy;
use shopit_core::payload::ScrapedPage;
use shopit_core::tool::{Error as ToolError, Tool, ToolResult};

use crate::http::send_with_retry;

const SCRAPE_ENDPOINT: &str = "https://api.firecrawl.dev/v1/scrape";

/// Parameters of the scraper.
#[derive(Deserialize, JsonSchema)]
pub struct WebpageScraperParameters {
    /// The URL of the webpage to scrape and convert to Markdown.
    url: String,
}

/// A tool that converts a webpage to markdown with Firecrawl.
///
/// Failures don't surface as tool errors. They are described in the
/// markdown so that the model and the user can see what went wrong.
pub struct WebpageScraperTool {
    client: Client,
    api_key: Option<String>,
    endpoint: String,
    retry_policy: RetryPolicy,
    parameter_schema: Value,
}

impl WebpageScraperTool {
    /// Creates a new scraper tool.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            endpoint: SCRAPE_ENDPOINT.to_owned(),
            retry_policy: RetryPolicy::default(),
            parameter_schema: schema_for!(WebpageScraperParameters).to_value(),
        }
    }

    /// Sets the retry policy for rate-limited scrapes.
    #[inline]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets a custom scrape endpoint.
    #[inline]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Tool for WebpageScraperTool {
    type Input = WebpageScraperParameters;

    fn name(&self) -> &str {
        "webpage_scraper"
    }

    fn description(&self) -> &str {
        "Scrapes the given webpage URL using Firecrawl and returns Markdown \
         content. Use this when a user asks to analyze, summarize, or extract \
         content from a webpage or URL."
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: WebpageScraperParameters,
    ) -> impl Future<Output = ToolResult> + Send + 'static {
        let client = self.client.clone();
        let api_key = self.api_key.clone();
        let endpoint = self.endpoint.clone();
        let policy = self.retry_policy.clone();
        async move {
            let url = input.url;
            info!("scraping {url}");
            if let Err(err) = Url::parse(&url) {
                warn!("refusing to scrape invalid URL {url}: {err}");
                return page_value(exception_page(&url, "Invalid URL."));
            }
            let page = match api_key {
                Some(api_key) => {
                    scrape(&client, &policy, &endpoint, &api_key, &url).await
                }
                None => {
                    error!("Firecrawl API key is missing");
                    exception_page(&url, "FIRECRAWL_API_KEY is not set.")
                }
            };
            page_value(page)
        }
    }
}

fn page_value(page: ScrapedPage) -> ToolResult {
    serde_json::to_value(page).map_err(|err| {
        ToolError::execution_error().with_reason(err.to_string())
    })
}

async fn scrape(
    client: &Client,
    policy: &RetryPolicy,
    endpoint: &str,
    api_key: &str,
    url: &str,
) -> ScrapedPage {
    let request = client
        .post(endpoint)
        .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
        .json(&json!({ "url": url, "formats": ["markdown"] }));
    let response = match send_with_retry(policy, request).await {
        Ok(response) => response,
        Err(err) => {
            warn!("scrape request failed: {err}");
            return exception_page(url, &err.to_string());
        }
    };
    let status = response.status().as_u16();
    let body = response.json::<Value>().await.map_err(|err| err.to_string());
    page_from_response(endpoint, url, status, body)
}

fn exception_page(url: &str, reason: &str) -> ScrapedPage {
    ScrapedPage {
        markdown: format!("Exception thrown scraping URL: {url}. {reason}"),
        debug: Some(format!("Error: {reason}")),
    }
}

fn page_from_response(
    endpoint: &str,
    url: &str,
    status: u16,
    body: Result<Value, String>,
) -> ScrapedPage {
    let mut debug = format!(
        "Request: POST {endpoint} with body {{ url: {url} }}\n\
         Response status: {status}\n"
    );
    let body = match body {
        Ok(body) => {
            let _ = writeln!(debug, "Response body: {body}");
            body
        }
        Err(err) => {
            let _ = writeln!(debug, "Failed to parse JSON response: {err}");
            Value::Null
        }
    };

    let markdown = if !(200..300).contains(&status) {
        format!("Failed to scrape URL: {url}. Status: {status}\n{debug}")
    } else if let Some(error) = body.get("error").and_then(Value::as_str) {
        format!("Error scraping URL: {url}. {error}\n{debug}")
    } else {
        let markdown = body
            .pointer("/data/markdown")
            .or_else(|| body.get("markdown"))
            .and_then(Value::as_str)
            .filter(|markdown| !markdown.is_empty());
        match markdown {
            Some(markdown) => markdown.to_owned(),
            None => format!("No markdown returned for URL: {url}.\n{debug}"),
        }
    };
    ScrapedPage {
        markdown,
        debug: Some(debug),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/recipe";

    #[test]
    fn test_successful_scrape() {
        let page = page_from_response(
            SCRAPE_ENDPOINT,
            URL,
            200,
            Ok(json!({ "success": true, "data": { "markdown": "# Soup" } })),
        );
        assert_eq!(page.markdown, "# Soup");
        assert!(page.debug.unwrap().contains("Response status: 200"));
    }

    #[test]
    fn test_failures_are_described() {
        let page = page_from_response(SCRAPE_ENDPOINT, URL, 402, Ok(json!({})));
        assert!(page.markdown.starts_with(
            "Failed to scrape URL: https://example.com/recipe. Status: 402"
        ));

        let page = page_from_response(
            SCRAPE_ENDPOINT,
            URL,
            200,
            Ok(json!({ "success": false, "error": "blocked" })),
        );
        assert!(page.markdown.starts_with(
            "Error scraping URL: https://example.com/recipe. blocked"
        ));

        let page = page_from_response(
            SCRAPE_ENDPOINT,
            URL,
            200,
            Err("expected value".to_owned()),
        );
        assert!(page.markdown.starts_with("No markdown returned for URL"));
        assert!(page.markdown.contains("Failed to parse JSON response"));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let tool = WebpageScraperTool::new(None);
        let result = tool
            .execute(WebpageScraperParameters {
                url: URL.to_owned(),
            })
            .await
            .unwrap();
        let page: ScrapedPage = serde_json::from_value(result).unwrap();
        assert!(page.markdown.starts_with("Exception thrown scraping URL"));
    }

    #[tokio::test]
    async fn test_invalid_url_is_not_scraped() {
        // The endpoint is unroutable, so reaching it would fail differently.
        let tool = WebpageScraperTool::new(Some("key".to_owned()))
            .with_endpoint("http://127.0.0.1:1/scrape")
            .with_retry_policy(RetryPolicy::none());
        let result = tool
            .execute(WebpageScraperParameters {
                url: "not a url".to_owned(),
            })
            .await
            .unwrap();
        let page: ScrapedPage = serde_json::from_value(result).unwrap();
        assert_eq!(
            page.markdown,
            "Exception thrown scraping URL: not a url. Invalid URL."
        );
    }
}
