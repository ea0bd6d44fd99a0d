// src/api/client.rs
//! Thin HTTP client for the JIRA REST API.
//!
//! Handles authentication and the raw request/response exchange. Decoding
//! lives in `parser`; deciding what to fetch lives in `tracker`.

use super::responses::SearchResponse;
use super::{IssueSource, SearchQuery};
use crate::constants::{JIRA_API_PATH, JIRA_SEARCH_ENDPOINT};
use crate::error::AppError;
use crate::types::{BaseUrl, Credentials};
use reqwest::{header, Client, Response};

/// A thin wrapper around reqwest Client for JIRA requests.
#[derive(Clone)]
pub struct JiraHttpClient {
    client: Client,
    base_url: BaseUrl,
    credentials: Option<Credentials>,
}

impl JiraHttpClient {
    /// Creates a client for the instance at `base_url`.
    ///
    /// Without credentials every request is anonymous, which public
    /// instances such as the Apache JIRA allow for search.
    pub fn new(base_url: BaseUrl, credentials: Option<Credentials>) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers())
            .build()?;
        Ok(Self {
            client,
            base_url,
            credentials,
        })
    }

    fn create_headers() -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );
        headers
    }

    /// Full URL of an endpoint below the REST API root.
    pub fn url(&self, path: &str) -> String {
        self.base_url
            .endpoint(&format!("{}{}", JIRA_API_PATH, path))
    }

    /// Makes a GET request with URL-encoded query parameters.
    pub async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Response, AppError> {
        let url = self.url(path);
        log::debug!("GET {} {:?}", url, params);

        let mut request = self.client.get(&url).query(params);
        if let Some(credentials) = &self.credentials {
            request = request.basic_auth(&credentials.user, Some(credentials.token.as_str()));
        }

        let response = request.send().await?;
        log::debug!("{} -> {}", url, response.status());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl IssueSource for JiraHttpClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, AppError> {
        let response = self.get(JIRA_SEARCH_ENDPOINT, &query.to_params()).await?;
        let result = extract_response_text(response).await?;
        super::parser::parse_search_response(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
}

/// Extracts the response body as text along with status and URL metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
    })
}
