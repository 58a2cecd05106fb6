use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::job::{CoverLetterRequest, CoverLetterResponse, SearchResponse};
use crate::resume::ResumeFile;

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

const SEARCH_PATH: &str = "/api/parse-and-search";
const COVER_LETTER_PATH: &str = "/api/generate-cover-letter";

/// Client for the resume parsing / job matching backend.
#[derive(Clone, Debug)]
pub struct JobSearchClient {
    client: Client,
    base_url: String,
}

impl JobSearchClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Like [`JobSearchClient::new`] but with an overall per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Self {
        let client = match timeout {
            Some(timeout) => Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "falling back to client without timeout");
                    Client::new()
                }),
            None => Client::new(),
        };

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn parse_and_search(&self, file: &ResumeFile) -> Result<SearchResponse, ApiError> {
        let url = format!("{}{}", self.base_url, SEARCH_PATH);

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(file.mime_type())
            .map_err(|err| ApiError::Request {
                endpoint: SEARCH_PATH,
                message: err.to_string(),
            })?;
        let form = Form::new().part("file", part);

        tracing::info!(file = %file.name, bytes = file.bytes.len(), "submitting resume");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: SEARCH_PATH,
                source,
            })?;

        let body: SearchResponse = decode(SEARCH_PATH, response).await?;
        tracing::info!(jobs = body.results.len(), "search finished");
        Ok(body)
    }

    pub async fn generate_cover_letter(
        &self,
        request: &CoverLetterRequest,
    ) -> Result<CoverLetterResponse, ApiError> {
        let url = format!("{}{}", self.base_url, COVER_LETTER_PATH);

        tracing::info!(company = %request.company, position = %request.position, "requesting cover letter");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                endpoint: COVER_LETTER_PATH,
                source,
            })?;

        decode(COVER_LETTER_PATH, response).await
    }
}

async fn decode<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(endpoint, %status, "backend rejected request");
        return Err(ApiError::Status {
            endpoint,
            status,
            body,
        });
    }

    response
        .json::<T>()
        .await
        .map_err(|source| ApiError::Decode { endpoint, source })
}
