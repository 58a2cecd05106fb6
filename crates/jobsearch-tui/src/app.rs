use std::path::PathBuf;
use std::time::Instant;

use jobsearch_core::{Job, JobId, JobSearchClient, JobSearchView, SystemClipboard};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;

use crate::picker::FilePicker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Jobs,
    Detail,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,
    pub view: JobSearchView,

    // Collaborators
    pub client: JobSearchClient,
    pub clipboard: SystemClipboard,

    // Job list / detail state
    pub job_state: ListState,
    pub detail_scroll: u16,
    pub detail_height: u16,
    pub total_detail_lines: u16,

    // File picker popup
    pub picker: Option<FilePicker>,
    pub picker_dir: PathBuf,
    pub loading_file: bool,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Panel areas for mouse hit-testing (updated during render)
    pub jobs_area: Option<Rect>,
    pub detail_area: Option<Rect>,
}

impl App {
    pub fn new(client: JobSearchClient, picker_dir: PathBuf) -> Self {
        Self {
            should_quit: false,
            focus: FocusPane::Jobs,
            view: JobSearchView::new(),

            client,
            clipboard: SystemClipboard::new(),

            job_state: ListState::default(),
            detail_scroll: 0,
            detail_height: 0,
            total_detail_lines: 0,

            picker: None,
            picker_dir,
            loading_file: false,

            animation_frame: 0,

            jobs_area: None,
            detail_area: None,
        }
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.job_state
            .selected()
            .and_then(|i| self.view.jobs().get(i))
    }

    pub fn selected_job_id(&self) -> Option<JobId> {
        self.selected_job().map(|job| job.id.clone())
    }

    /// Re-sync the list selection after the job list was replaced.
    pub fn reset_job_selection(&mut self) {
        let selection = if self.view.jobs().is_empty() { None } else { Some(0) };
        self.job_state.select(selection);
        self.detail_scroll = 0;
    }

    // Job list navigation
    pub fn job_nav_down(&mut self) {
        let len = self.view.jobs().len();
        if len > 0 {
            let i = self.job_state.selected().unwrap_or(0);
            self.job_state.select(Some((i + 1).min(len - 1)));
            self.detail_scroll = 0;
        }
    }

    pub fn job_nav_up(&mut self) {
        if !self.view.jobs().is_empty() {
            let i = self.job_state.selected().unwrap_or(0);
            self.job_state.select(Some(i.saturating_sub(1)));
            self.detail_scroll = 0;
        }
    }

    pub fn job_nav_first(&mut self) {
        if !self.view.jobs().is_empty() {
            self.job_state.select(Some(0));
            self.detail_scroll = 0;
        }
    }

    pub fn job_nav_last(&mut self) {
        let len = self.view.jobs().len();
        if len > 0 {
            self.job_state.select(Some(len - 1));
            self.detail_scroll = 0;
        }
    }

    // Detail scrolling
    pub fn scroll_down(&mut self) {
        if self.detail_scroll < self.total_detail_lines.saturating_sub(self.detail_height) {
            self.detail_scroll = self.detail_scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_job_id() {
            self.view.toggle_expand(&id);
        }
    }

    pub fn open_picker(&mut self) {
        self.picker = Some(FilePicker::open(&self.picker_dir));
    }

    pub fn close_picker(&mut self) {
        if let Some(picker) = self.picker.take() {
            self.picker_dir = picker.dir;
        }
    }

    pub fn remove_file(&mut self) {
        self.view.remove_file();
        self.reset_job_selection();
    }

    pub fn is_busy(&self) -> bool {
        self.view.is_submitting() || self.view.generating_letter().is_some() || self.loading_file
    }

    /// Tick animation frame and expire transient indicators (called by Tick event)
    pub fn tick(&mut self, now: Instant) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
        self.view.tick(now);
    }

    pub fn ellipsis(&self) -> &'static str {
        match self.animation_frame {
            0 => ".",
            1 => "..",
            _ => "...",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobsearch_core::{ResumeFile, SearchResponse};

    fn job(id: &str) -> Job {
        Job {
            id: JobId::new(id),
            title: format!("Job {}", id),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: "desc".to_string(),
            degree_requirements: None,
        }
    }

    fn app_with_jobs(ids: &[&str]) -> App {
        let mut app = App::new(JobSearchClient::new("http://localhost:4000"), PathBuf::from("."));
        app.view.select_file(ResumeFile::new("cv.pdf", vec![1]));
        let ticket = app.view.begin_search().unwrap();
        app.view.complete_search(
            ticket.token,
            Ok(SearchResponse {
                results: ids.iter().map(|id| job(id)).collect(),
                resume_text: "R".to_string(),
            }),
        );
        app.reset_job_selection();
        app
    }

    #[test]
    fn test_navigation_is_clamped() {
        let mut app = app_with_jobs(&["1", "2", "3"]);
        assert_eq!(app.selected_job_id(), Some(JobId::new("1")));
        app.job_nav_up();
        assert_eq!(app.job_state.selected(), Some(0));
        app.job_nav_last();
        app.job_nav_down();
        assert_eq!(app.selected_job_id(), Some(JobId::new("3")));
        app.job_nav_first();
        assert_eq!(app.job_state.selected(), Some(0));
    }

    #[test]
    fn test_toggle_selected_expands_current_job() {
        let mut app = app_with_jobs(&["1", "2"]);
        app.job_nav_down();
        app.toggle_selected();
        assert!(app.view.is_expanded(&JobId::new("2")));
        assert!(!app.view.is_expanded(&JobId::new("1")));
    }

    #[test]
    fn test_remove_file_clears_selection() {
        let mut app = app_with_jobs(&["1"]);
        app.remove_file();
        assert_eq!(app.job_state.selected(), None);
        assert!(app.selected_job().is_none());
    }

    #[test]
    fn test_animation_only_advances_while_busy() {
        let mut app = app_with_jobs(&["1"]);
        app.tick(Instant::now());
        assert_eq!(app.animation_frame, 0);
        app.view.begin_cover_letter(&JobId::new("1"));
        app.tick(Instant::now());
        assert_eq!(app.animation_frame, 1);
    }
}
