//! UI-agnostic state types
//!
//! One tagged state per concern, so that combinations such as "loading while
//! showing stale results" cannot be represented.

use std::time::{Duration, Instant};

use crate::job::{Job, JobId};

/// How long the "copied" indicator and notifications stay visible.
pub const TRANSIENT_DURATION: Duration = Duration::from_secs(2);

/// Monotonically increasing request token used to discard stale responses.
pub type RequestToken = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<Job>),
    Failed(String),
}

impl SearchState {
    pub fn jobs(&self) -> &[Job] {
        match self {
            SearchState::Loaded(jobs) => jobs,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading)
    }
}

/// Per-job cover letter state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LetterState {
    #[default]
    NotGenerated,
    /// A request is in flight. `previous` is restored if it fails.
    Generating {
        token: RequestToken,
        previous: Option<String>,
    },
    Ready(String),
}

impl LetterState {
    /// Text to show for this job. While regenerating, the previous letter
    /// remains visible.
    pub fn text(&self) -> Option<&str> {
        match self {
            LetterState::Ready(text) => Some(text),
            LetterState::Generating {
                previous: Some(text),
                ..
            } => Some(text),
            _ => None,
        }
    }

    pub fn is_generating(&self) -> bool {
        matches!(self, LetterState::Generating { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Transient message shown to the user (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

impl Notification {
    pub fn info(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
            shown_at: now,
        }
    }

    pub fn error(message: impl Into<String>, now: Instant) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
            shown_at: now,
        }
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < TRANSIENT_DURATION
    }
}

/// The "Copied!" marker for one job's copy button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedIndicator {
    pub job_id: JobId,
    pub copied_at: Instant,
}

impl CopiedIndicator {
    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.copied_at) < TRANSIENT_DURATION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generating_keeps_previous_text_visible() {
        let state = LetterState::Generating {
            token: 3,
            previous: Some("old".to_string()),
        };
        assert_eq!(state.text(), Some("old"));
        assert!(state.is_generating());
        assert_eq!(LetterState::NotGenerated.text(), None);
    }

    #[test]
    fn test_notification_expires_after_two_seconds() {
        let now = Instant::now();
        let note = Notification::info("copied", now);
        assert!(note.is_visible(now + Duration::from_millis(1999)));
        assert!(!note.is_visible(now + TRANSIENT_DURATION));
    }

    #[test]
    fn test_only_loaded_state_has_jobs() {
        assert!(SearchState::Loading.jobs().is_empty());
        assert!(SearchState::Failed("x".into()).jobs().is_empty());
        assert!(SearchState::Loading.is_loading());
    }
}
