//! Remote descriptors: plain URLs and the image registry
//!
//! Every request is a single attempt. Non-2xx responses and transport
//! failures are returned to the caller as per-subject errors.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use super::errors::{AcquireError, AcquireResult};
use super::registry::{DockerfileContents, ImageSummary, SearchPage};

/// Default registry API endpoint
pub const DEFAULT_REGISTRY_URL: &str = "https://hub.docker.com";

const SEARCH_PAGE_SIZE: &str = "100";

/// Fetches descriptor text from an arbitrary URL.
#[allow(async_fn_in_trait)]
pub trait DescriptorFetcher {
    async fn fetch_url(&self, url: &str) -> AcquireResult<String>;
}

/// Searches an image registry and fetches the descriptors it publishes.
#[allow(async_fn_in_trait)]
pub trait ImageRegistry {
    /// Returns every search result for `pattern`, unfiltered.
    async fn search(&self, pattern: &str) -> AcquireResult<Vec<ImageSummary>>;

    /// Returns the descriptor text of an automated-build image.
    async fn fetch_descriptor(&self, image: &ImageSummary) -> AcquireResult<String>;
}

/// HTTP client for URLs and the Docker Hub API.
pub struct HubClient {
    client: Client,
    base_url: String,
    page_limit: usize,
}

impl HubClient {
    /// Creates a client against `base_url`, following at most `page_limit` search pages.
    pub fn new(base_url: impl Into<String>, page_limit: usize) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            page_limit,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> AcquireResult<Response> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| AcquireError::transport(url, e))?;

        if !response.status().is_success() {
            return Err(AcquireError::HttpStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> AcquireResult<T> {
        self.get(url, query)
            .await?
            .json::<T>()
            .await
            .map_err(|e| AcquireError::decode(url, e))
    }
}

impl DescriptorFetcher for HubClient {
    async fn fetch_url(&self, url: &str) -> AcquireResult<String> {
        self.get(url, &[])
            .await?
            .text()
            .await
            .map_err(|e| AcquireError::transport(url, e))
    }
}

impl ImageRegistry for HubClient {
    async fn search(&self, pattern: &str) -> AcquireResult<Vec<ImageSummary>> {
        let first = format!("{}/v2/search/repositories/", self.base_url);
        let mut page: SearchPage = self
            .get_json(&first, &[("query", pattern), ("page_size", SEARCH_PAGE_SIZE)])
            .await?;

        let mut results = std::mem::take(&mut page.results);
        let mut fetched = 1;

        // `next` already carries the query string.
        while let Some(next) = page.next.take() {
            if fetched >= self.page_limit {
                break;
            }
            page = self.get_json(&next, &[]).await?;
            results.append(&mut page.results);
            fetched += 1;
        }

        Ok(results)
    }

    async fn fetch_descriptor(&self, image: &ImageSummary) -> AcquireResult<String> {
        let url = format!(
            "{}/v2/repositories/{}/dockerfile/",
            self.base_url,
            image.repository_path()
        );
        let body: DockerfileContents = self.get_json(&url, &[]).await?;
        Ok(body.contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = HubClient::new("https://registry.example.com/", 3);
        assert_eq!(client.base_url(), "https://registry.example.com");
    }

    #[tokio::test]
    async fn test_unreachable_url_is_transport_error() {
        let client = HubClient::new(DEFAULT_REGISTRY_URL, 1);
        // Port 9 (discard) on localhost is not expected to speak HTTP.
        let err = client
            .fetch_url("http://127.0.0.1:9/Dockerfile")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "transport");
    }
}
