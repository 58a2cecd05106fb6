pub mod client;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod job;
pub mod resume;
pub mod state;
pub mod view;

// Re-export main types for convenience
pub use client::{JobSearchClient, DEFAULT_BASE_URL};
pub use clipboard::{Clipboard, SystemClipboard};
pub use config::Config;
pub use error::{ApiError, ClipboardError, ConfigError, ResumeError, ValidationError};
pub use job::{CoverLetterRequest, CoverLetterResponse, Job, JobId, SearchResponse};
pub use resume::{ResumeFile, ACCEPTED_EXTENSIONS};
pub use state::{LetterState, Notification, RequestToken, SearchState, Severity};
pub use view::{CopyOutcome, JobSearchView, LetterTicket, SearchTicket};
