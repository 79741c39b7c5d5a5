use serde::{Deserialize, Serialize};

use crate::prompt::build_prompt;
use crate::{ApiError, ApiFailure};

/// Configuration snapshot for one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTarget {
    pub endpoint_url: String,
    pub model_name: String,
}

/// Per-trigger request data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub source_text: String,
    pub style: String,
}

#[async_trait::async_trait]
pub trait RewriteApi: Send + Sync {
    /// One-shot rewrite; success is the trimmed rewritten text.
    async fn rewrite(
        &self,
        target: &ApiTarget,
        request: &RewriteRequest,
    ) -> Result<String, ApiError>;

    /// Enumerate the model names available on the endpoint.
    async fn list_models(&self, endpoint_url: &str) -> Result<Vec<String>, ApiError>;
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateReply {
    response: String,
}

#[derive(Deserialize)]
struct TagsReply {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Deserialize)]
struct TagModel {
    name: String,
}

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
}

impl OllamaClient {
    /// No explicit request timeout is configured; the transport default is
    /// the only bound on a hung server.
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|err| ApiError::new(ApiFailure::Network, err.to_string()))?;
        Ok(Self { client })
    }
}

fn endpoint_join(endpoint_url: &str, path: &str) -> Result<reqwest::Url, ApiError> {
    let base = endpoint_url.trim_end_matches('/');
    reqwest::Url::parse(&format!("{base}{path}"))
        .map_err(|err| ApiError::new(ApiFailure::InvalidUrl, err.to_string()))
}

#[async_trait::async_trait]
impl RewriteApi for OllamaClient {
    async fn rewrite(
        &self,
        target: &ApiTarget,
        request: &RewriteRequest,
    ) -> Result<String, ApiError> {
        let url = endpoint_join(&target.endpoint_url, "/api/generate")?;
        let body = GenerateBody {
            model: &target.model_name,
            prompt: build_prompt(&request.style, &request.source_text),
            stream: false,
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                format!("API error: {status}"),
            ));
        }

        let reply: GenerateReply = response.json().await.map_err(|err| {
            ApiError::new(
                ApiFailure::MalformedResponse,
                format!("unexpected API response: {err}"),
            )
        })?;
        Ok(reply.response.trim().to_string())
    }

    async fn list_models(&self, endpoint_url: &str) -> Result<Vec<String>, ApiError> {
        let url = endpoint_join(endpoint_url, "/api/tags")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::new(
                ApiFailure::HttpStatus(status.as_u16()),
                format!("API returned status {}", status.as_u16()),
            ));
        }

        let reply: TagsReply = response.json().await.map_err(|err| {
            ApiError::new(
                ApiFailure::MalformedResponse,
                format!("unexpected API response: {err}"),
            )
        })?;
        Ok(reply.models.into_iter().map(|model| model.name).collect())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(ApiFailure::Timeout, err.to_string());
    }
    ApiError::new(
        ApiFailure::Network,
        format!("could not reach the API: {err}"),
    )
}
