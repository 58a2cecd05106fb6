//! The job search view: everything the user sees, independent of how it is
//! drawn.
//!
//! Network work is split into `begin_*` (returns a ticket describing the
//! request to make) and `complete_*` (applies the response). Every ticket
//! carries a token; a response whose token is no longer current is dropped,
//! so a slow reply can never overwrite state for a newer file or request.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::clipboard::Clipboard;
use crate::error::{ApiError, ValidationError};
use crate::job::{CoverLetterRequest, CoverLetterResponse, Job, JobId, SearchResponse};
use crate::resume::ResumeFile;
use crate::state::{CopiedIndicator, LetterState, Notification, RequestToken, SearchState};

pub const SEARCH_FAILED_MESSAGE: &str = "Failed to parse resume";
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate cover letter";
pub const COPIED_MESSAGE: &str = "Cover letter copied!";
pub const COPY_FAILED_MESSAGE: &str = "Failed to copy cover letter";

/// A search the caller should now perform.
#[derive(Debug, Clone)]
pub struct SearchTicket {
    pub token: RequestToken,
    pub file: ResumeFile,
}

/// A cover letter generation the caller should now perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterTicket {
    pub job_id: JobId,
    pub token: RequestToken,
    pub request: CoverLetterRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    NothingToCopy,
    Copied,
    Failed,
}

#[derive(Debug, Default)]
pub struct JobSearchView {
    selected_file: Option<ResumeFile>,
    search: SearchState,
    resume_text: String,
    letters: HashMap<JobId, LetterState>,
    expanded: HashSet<JobId>,
    latest_generation: Option<JobId>,
    copied: Option<CopiedIndicator>,
    error: Option<String>,
    notification: Option<Notification>,
    search_token: RequestToken,
    next_token: RequestToken,
}

impl JobSearchView {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        self.next_token
    }

    /// Drop everything derived from the previous file. Any search still in
    /// flight is invalidated.
    fn reset_results(&mut self) {
        self.search = SearchState::Idle;
        self.search_token = self.issue_token();
        self.letters.clear();
        self.expanded.clear();
        self.latest_generation = None;
        self.copied = None;
    }

    pub fn select_file(&mut self, file: ResumeFile) {
        tracing::info!(file = %file.name, "resume selected");
        self.reset_results();
        self.selected_file = Some(file);
    }

    pub fn remove_file(&mut self) {
        tracing::info!("resume removed");
        self.reset_results();
        self.selected_file = None;
    }

    pub fn begin_search(&mut self) -> Result<SearchTicket, ValidationError> {
        let Some(file) = self.selected_file.clone() else {
            let err = ValidationError::NoResumeSelected;
            self.error = Some(err.to_string());
            return Err(err);
        };
        if self.search.is_loading() {
            return Err(ValidationError::SearchInProgress);
        }

        self.error = None;
        self.search = SearchState::Loading;
        self.search_token = self.issue_token();

        Ok(SearchTicket {
            token: self.search_token,
            file,
        })
    }

    /// Apply a search response. Returns false when the response was stale
    /// and ignored.
    pub fn complete_search(
        &mut self,
        token: RequestToken,
        result: Result<SearchResponse, ApiError>,
    ) -> bool {
        if token != self.search_token || !self.search.is_loading() {
            tracing::debug!(token, current = self.search_token, "discarding stale search response");
            return false;
        }

        match result {
            Ok(response) => {
                let unique: HashSet<&JobId> = response.results.iter().map(|j| &j.id).collect();
                if unique.len() != response.results.len() {
                    tracing::warn!(
                        jobs = response.results.len(),
                        unique = unique.len(),
                        "search returned duplicate job ids"
                    );
                }
                self.resume_text = response.resume_text;
                self.search = SearchState::Loaded(response.results);
            }
            Err(err) => {
                tracing::warn!(error = %err, "search failed");
                let message = match err {
                    ApiError::Status { .. } => SEARCH_FAILED_MESSAGE.to_string(),
                    other => other.to_string(),
                };
                self.error = Some(message.clone());
                self.search = SearchState::Failed(message);
            }
        }
        true
    }

    pub fn toggle_expand(&mut self, job_id: &JobId) {
        if !self.expanded.remove(job_id) {
            self.expanded.insert(job_id.clone());
        }
    }

    /// Start generating a letter for `job_id`. Returns `None` when the job is
    /// not in the current results or its letter is already being generated.
    pub fn begin_cover_letter(&mut self, job_id: &JobId) -> Option<LetterTicket> {
        let request = {
            let job = self.job(job_id)?;
            CoverLetterRequest::for_job(&self.resume_text, job)
        };
        if self.letters.get(job_id).is_some_and(LetterState::is_generating) {
            return None;
        }

        let token = self.issue_token();
        let previous = self
            .letters
            .get(job_id)
            .and_then(LetterState::text)
            .map(str::to_string);
        self.letters
            .insert(job_id.clone(), LetterState::Generating { token, previous });
        self.latest_generation = Some(job_id.clone());

        Some(LetterTicket {
            job_id: job_id.clone(),
            token,
            request,
        })
    }

    /// Apply a cover letter response. A failure leaves the job's previous
    /// letter (or lack of one) in place. Returns false for stale responses.
    pub fn complete_cover_letter(
        &mut self,
        job_id: &JobId,
        token: RequestToken,
        result: Result<CoverLetterResponse, ApiError>,
    ) -> bool {
        let previous = match self.letters.get(job_id) {
            Some(LetterState::Generating {
                token: current,
                previous,
            }) if *current == token => previous.clone(),
            _ => {
                tracing::debug!(job = %job_id, token, "discarding stale cover letter response");
                return false;
            }
        };

        match result {
            Ok(response) => {
                self.letters
                    .insert(job_id.clone(), LetterState::Ready(response.cover_letter));
            }
            Err(err) => {
                tracing::warn!(job = %job_id, error = %err, "cover letter generation failed");
                match previous {
                    Some(text) => {
                        self.letters.insert(job_id.clone(), LetterState::Ready(text));
                    }
                    None => {
                        self.letters.remove(job_id);
                    }
                }
                self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
            }
        }

        if self.latest_generation.as_ref() == Some(job_id) {
            self.latest_generation = None;
        }
        true
    }

    pub fn copy_cover_letter(
        &mut self,
        job_id: &JobId,
        clipboard: &mut dyn Clipboard,
        now: Instant,
    ) -> CopyOutcome {
        let Some(text) = self.cover_letter(job_id) else {
            return CopyOutcome::NothingToCopy;
        };

        match clipboard.set_text(text) {
            Ok(()) => {
                self.copied = Some(CopiedIndicator {
                    job_id: job_id.clone(),
                    copied_at: now,
                });
                self.notification = Some(Notification::info(COPIED_MESSAGE, now));
                CopyOutcome::Copied
            }
            Err(err) => {
                tracing::warn!(job = %job_id, error = %err, "failed to copy cover letter");
                self.notification = Some(Notification::error(COPY_FAILED_MESSAGE, now));
                CopyOutcome::Failed
            }
        }
    }

    /// Expire transient indicators.
    pub fn tick(&mut self, now: Instant) {
        if self.copied.as_ref().is_some_and(|c| !c.is_visible(now)) {
            self.copied = None;
        }
        if self.notification.as_ref().is_some_and(|n| !n.is_visible(now)) {
            self.notification = None;
        }
    }

    /// Show a transient message that is not tied to a view operation.
    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn selected_file(&self) -> Option<&ResumeFile> {
        self.selected_file.as_ref()
    }

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    pub fn jobs(&self) -> &[Job] {
        self.search.jobs()
    }

    pub fn job(&self, job_id: &JobId) -> Option<&Job> {
        self.jobs().iter().find(|job| &job.id == job_id)
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn letter_state(&self, job_id: &JobId) -> &LetterState {
        static NOT_GENERATED: LetterState = LetterState::NotGenerated;
        self.letters.get(job_id).unwrap_or(&NOT_GENERATED)
    }

    pub fn cover_letter(&self, job_id: &JobId) -> Option<&str> {
        self.letters.get(job_id).and_then(LetterState::text)
    }

    pub fn has_cover_letters(&self) -> bool {
        self.letters.values().any(|state| state.text().is_some())
    }

    pub fn is_expanded(&self, job_id: &JobId) -> bool {
        self.expanded.contains(job_id)
    }

    pub fn expanded_count(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_submitting(&self) -> bool {
        self.search.is_loading()
    }

    pub fn can_submit(&self) -> bool {
        self.selected_file.is_some() && !self.is_submitting()
    }

    /// Most recently started generation that is still in flight.
    pub fn generating_letter(&self) -> Option<&JobId> {
        self.latest_generation.as_ref()
    }

    pub fn is_generating(&self, job_id: &JobId) -> bool {
        self.letter_state(job_id).is_generating()
    }

    pub fn copied_letter(&self) -> Option<&JobId> {
        self.copied.as_ref().map(|c| &c.job_id)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// A search completed and matched nothing.
    pub fn is_empty_result(&self) -> bool {
        matches!(&self.search, SearchState::Loaded(jobs) if jobs.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClipboardError;
    use crate::state::{Severity, TRANSIENT_DURATION};
    use std::time::Duration;

    #[derive(Default)]
    struct FakeClipboard {
        contents: Option<String>,
        fail: bool,
    }

    impl Clipboard for FakeClipboard {
        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable);
            }
            self.contents = Some(text.to_string());
            Ok(())
        }
    }

    fn job(id: &str) -> Job {
        Job {
            id: JobId::new(id),
            title: format!("Title {}", id),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: format!("Description {}", id),
            degree_requirements: None,
        }
    }

    fn loaded_view(ids: &[&str]) -> JobSearchView {
        let mut view = JobSearchView::new();
        view.select_file(ResumeFile::new("cv.pdf", b"pdf".to_vec()));
        let ticket = view.begin_search().unwrap();
        let response = SearchResponse {
            results: ids.iter().map(|id| job(id)).collect(),
            resume_text: "R".to_string(),
        };
        assert!(view.complete_search(ticket.token, Ok(response)));
        view
    }

    fn letter(text: &str) -> Result<CoverLetterResponse, ApiError> {
        Ok(CoverLetterResponse {
            cover_letter: text.to_string(),
        })
    }

    fn failure() -> Result<CoverLetterResponse, ApiError> {
        Err(ApiError::Request {
            endpoint: "/api/generate-cover-letter",
            message: "boom".to_string(),
        })
    }

    #[test]
    fn test_submit_without_file_sets_validation_error() {
        let mut view = JobSearchView::new();
        let err = view.begin_search().unwrap_err();
        assert_eq!(err, ValidationError::NoResumeSelected);
        assert_eq!(view.error(), Some("Please upload a resume"));
        assert!(!view.is_submitting());
    }

    #[test]
    fn test_begin_search_sets_loading_and_clears_error() {
        let mut view = JobSearchView::new();
        let _ = view.begin_search();
        view.select_file(ResumeFile::new("cv.pdf", vec![1]));
        let ticket = view.begin_search().unwrap();
        assert_eq!(ticket.file.name, "cv.pdf");
        assert!(view.is_submitting());
        assert!(!view.can_submit());
        assert_eq!(view.error(), None);
        assert_eq!(view.begin_search().unwrap_err(), ValidationError::SearchInProgress);
    }

    #[test]
    fn test_successful_search_loads_jobs_and_resume_text() {
        let view = loaded_view(&["1"]);
        assert_eq!(view.jobs().len(), 1);
        assert_eq!(view.resume_text(), "R");
        assert!(!view.is_submitting());
        assert!(!view.is_empty_result());
    }

    #[test]
    fn test_empty_results_state() {
        let view = loaded_view(&[]);
        assert!(view.jobs().is_empty());
        assert!(view.is_empty_result());
    }

    #[test]
    fn test_failed_search_sets_error_and_empties_jobs() {
        let mut view = JobSearchView::new();
        view.select_file(ResumeFile::new("cv.pdf", vec![1]));
        let ticket = view.begin_search().unwrap();
        let applied = view.complete_search(
            ticket.token,
            Err(ApiError::Request {
                endpoint: "/api/parse-and-search",
                message: "bad".to_string(),
            }),
        );
        assert!(applied);
        assert!(view.jobs().is_empty());
        assert!(!view.is_submitting());
        assert!(view.error().is_some_and(|e| !e.is_empty()));
        assert!(matches!(view.search_state(), SearchState::Failed(_)));
    }

    #[test]
    fn test_selecting_file_resets_results() {
        let mut view = loaded_view(&["1", "2"]);
        let id = JobId::new("1");
        view.toggle_expand(&id);
        let ticket = view.begin_cover_letter(&id).unwrap();
        view.complete_cover_letter(&id, ticket.token, letter("L"));
        assert!(view.has_cover_letters());

        view.select_file(ResumeFile::new("other.docx", vec![2]));
        assert!(view.jobs().is_empty());
        assert!(!view.has_cover_letters());
        assert_eq!(view.expanded_count(), 0);
        assert_eq!(view.selected_file().map(|f| f.name.as_str()), Some("other.docx"));
    }

    #[test]
    fn test_remove_file_resets_results() {
        let mut view = loaded_view(&["1"]);
        view.remove_file();
        assert!(view.selected_file().is_none());
        assert!(view.jobs().is_empty());
        assert!(!view.can_submit());
    }

    #[test]
    fn test_stale_search_response_is_discarded() {
        let mut view = JobSearchView::new();
        view.select_file(ResumeFile::new("first.pdf", vec![1]));
        let stale = view.begin_search().unwrap();
        view.select_file(ResumeFile::new("second.pdf", vec![2]));

        let applied = view.complete_search(
            stale.token,
            Ok(SearchResponse {
                results: vec![job("old")],
                resume_text: "old".to_string(),
            }),
        );
        assert!(!applied);
        assert!(view.jobs().is_empty());
        assert_eq!(view.resume_text(), "");
        assert!(!view.is_submitting());
    }

    #[test]
    fn test_toggle_expand_twice_restores_state() {
        let mut view = loaded_view(&["1"]);
        let id = JobId::new("1");
        assert!(!view.is_expanded(&id));
        view.toggle_expand(&id);
        assert!(view.is_expanded(&id));
        view.toggle_expand(&id);
        assert!(!view.is_expanded(&id));
    }

    #[test]
    fn test_generate_letter_stores_text_and_clears_flag() {
        let mut view = loaded_view(&["1"]);
        let id = JobId::new("1");
        let ticket = view.begin_cover_letter(&id).unwrap();
        assert_eq!(view.generating_letter(), Some(&id));
        assert_eq!(ticket.request.resume_text, "R");
        assert_eq!(ticket.request.position, "Title 1");
        assert_eq!(ticket.request.description, "Description 1");

        assert!(view.complete_cover_letter(&id, ticket.token, letter("L")));
        assert_eq!(view.cover_letter(&id), Some("L"));
        assert_eq!(view.generating_letter(), None);
    }

    #[test]
    fn test_regenerate_overwrites_letter() {
        let mut view = loaded_view(&["1"]);
        let id = JobId::new("1");
        let first = view.begin_cover_letter(&id).unwrap();
        view.complete_cover_letter(&id, first.token, letter("first"));
        let second = view.begin_cover_letter(&id).unwrap();
        assert_eq!(view.cover_letter(&id), Some("first"));
        view.complete_cover_letter(&id, second.token, letter("second"));
        assert_eq!(view.cover_letter(&id), Some("second"));
    }

    #[test]
    fn test_generate_disabled_while_in_flight() {
        let mut view = loaded_view(&["1"]);
        let id = JobId::new("1");
        assert!(view.begin_cover_letter(&id).is_some());
        assert!(view.begin_cover_letter(&id).is_none());
        assert!(view.begin_cover_letter(&JobId::new("missing")).is_none());
    }

    #[test]
    fn test_failed_generation_leaves_previous_letter() {
        let mut view = loaded_view(&["1", "2"]);
        let one = JobId::new("1");
        let two = JobId::new("2");

        let ticket = view.begin_cover_letter(&one).unwrap();
        view.complete_cover_letter(&one, ticket.token, letter("kept"));
        let ticket = view.begin_cover_letter(&one).unwrap();
        view.complete_cover_letter(&one, ticket.token, failure());
        assert_eq!(view.cover_letter(&one), Some("kept"));
        assert_eq!(view.error(), Some(GENERATION_FAILED_MESSAGE));

        let ticket = view.begin_cover_letter(&two).unwrap();
        view.complete_cover_letter(&two, ticket.token, failure());
        assert_eq!(view.cover_letter(&two), None);
        assert_eq!(view.letter_state(&two), &LetterState::NotGenerated);
        assert_eq!(view.generating_letter(), None);
    }

    #[test]
    fn test_concurrent_generations_complete_independently() {
        let mut view = loaded_view(&["1", "2"]);
        let one = JobId::new("1");
        let two = JobId::new("2");
        let first = view.begin_cover_letter(&one).unwrap();
        let second = view.begin_cover_letter(&two).unwrap();
        assert_eq!(view.generating_letter(), Some(&two));

        view.complete_cover_letter(&two, second.token, letter("B"));
        assert_eq!(view.generating_letter(), None);
        assert!(view.is_generating(&one));
        view.complete_cover_letter(&one, first.token, letter("A"));
        assert_eq!(view.cover_letter(&one), Some("A"));
        assert_eq!(view.cover_letter(&two), Some("B"));
    }

    #[test]
    fn test_letter_for_previous_file_is_discarded() {
        let mut view = loaded_view(&["1"]);
        let id = JobId::new("1");
        let ticket = view.begin_cover_letter(&id).unwrap();
        view.select_file(ResumeFile::new("new.pdf", vec![9]));
        assert!(!view.complete_cover_letter(&id, ticket.token, letter("stale")));
        assert_eq!(view.cover_letter(&id), None);
    }

    #[test]
    fn test_copy_sets_indicator_then_expires() {
        let mut view = loaded_view(&["1"]);
        let id = JobId::new("1");
        let ticket = view.begin_cover_letter(&id).unwrap();
        view.complete_cover_letter(&id, ticket.token, letter("L"));

        let mut clipboard = FakeClipboard::default();
        let now = Instant::now();
        assert_eq!(view.copy_cover_letter(&id, &mut clipboard, now), CopyOutcome::Copied);
        assert_eq!(clipboard.contents.as_deref(), Some("L"));
        assert_eq!(view.copied_letter(), Some(&id));
        assert_eq!(view.notification().map(|n| n.severity), Some(Severity::Info));

        view.tick(now + Duration::from_millis(500));
        assert_eq!(view.copied_letter(), Some(&id));
        view.tick(now + TRANSIENT_DURATION);
        assert_eq!(view.copied_letter(), None);
        assert!(view.notification().is_none());
    }

    #[test]
    fn test_copy_failure_notifies_without_touching_state() {
        let mut view = loaded_view(&["1"]);
        let id = JobId::new("1");
        let ticket = view.begin_cover_letter(&id).unwrap();
        view.complete_cover_letter(&id, ticket.token, letter("L"));

        let mut clipboard = FakeClipboard {
            fail: true,
            ..Default::default()
        };
        let outcome = view.copy_cover_letter(&id, &mut clipboard, Instant::now());
        assert_eq!(outcome, CopyOutcome::Failed);
        assert_eq!(view.copied_letter(), None);
        assert_eq!(view.cover_letter(&id), Some("L"));
        let note = view.notification().unwrap();
        assert_eq!(note.severity, Severity::Error);
        assert_eq!(note.message, COPY_FAILED_MESSAGE);
    }

    #[test]
    fn test_copy_with_no_clipboard_available_fails() {
        let mut view = loaded_view(&["1"]);
        let id = JobId::new("1");
        let ticket = view.begin_cover_letter(&id).unwrap();
        view.complete_cover_letter(&id, ticket.token, letter("L"));

        let mut clipboard = crate::clipboard::SystemClipboard::unavailable();
        let outcome = view.copy_cover_letter(&id, &mut clipboard, Instant::now());
        assert_eq!(outcome, CopyOutcome::Failed);
        assert_eq!(view.copied_letter(), None);
        assert_eq!(view.notification().map(|n| n.message.as_str()), Some(COPY_FAILED_MESSAGE));
    }

    #[test]
    fn test_copy_without_letter_is_noop() {
        let mut view = loaded_view(&["1"]);
        let mut clipboard = FakeClipboard::default();
        let outcome = view.copy_cover_letter(&JobId::new("1"), &mut clipboard, Instant::now());
        assert_eq!(outcome, CopyOutcome::NothingToCopy);
        assert!(clipboard.contents.is_none());
        assert!(view.notification().is_none());
    }
}
