use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the job search backend.
///
/// Every variant is terminal for the action that triggered it; callers never
/// retry on their own.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not decode response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid request to {endpoint}: {message}")]
    Request {
        endpoint: &'static str,
        message: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please upload a resume")]
    NoResumeSelected,
    #[error("a search is already running")]
    SearchInProgress,
}

#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} has no file name")]
    NoFileName(String),
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard mechanism is available")]
    Unavailable,
    #[error("clipboard command {command} failed: {reason}")]
    Command { command: String, reason: String },
    #[error("failed to write clipboard escape sequence: {0}")]
    Terminal(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
