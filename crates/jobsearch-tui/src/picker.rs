//! Directory browser used in place of a native file dialog. Only
//! directories and files with an accepted resume extension are listed.

use std::path::{Path, PathBuf};

use jobsearch_core::ResumeFile;
use ratatui::widgets::ListState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEntry {
    Parent,
    Dir(PathBuf),
    File(PathBuf),
}

impl PickerEntry {
    pub fn label(&self) -> String {
        match self {
            PickerEntry::Parent => "../".to_string(),
            PickerEntry::Dir(path) => format!("{}/", file_name(path)),
            PickerEntry::File(path) => file_name(path),
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub struct FilePicker {
    pub dir: PathBuf,
    pub entries: Vec<PickerEntry>,
    pub state: ListState,
    pub error: Option<String>,
}

impl FilePicker {
    pub fn open(dir: &Path) -> Self {
        let mut picker = Self {
            dir: dir.to_path_buf(),
            entries: Vec::new(),
            state: ListState::default(),
            error: None,
        };
        picker.refresh();
        picker
    }

    fn refresh(&mut self) {
        match read_entries(&self.dir) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(dir = %self.dir.display(), error = %err, "could not list directory");
                self.entries = if self.dir.parent().is_some() {
                    vec![PickerEntry::Parent]
                } else {
                    Vec::new()
                };
                self.error = Some(err.to_string());
            }
        }
        self.state
            .select(if self.entries.is_empty() { None } else { Some(0) });
    }

    pub fn nav_down(&mut self) {
        let len = self.entries.len();
        if len > 0 {
            let i = self.state.selected().unwrap_or(0);
            self.state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn nav_up(&mut self) {
        let i = self.state.selected().unwrap_or(0);
        self.state.select(Some(i.saturating_sub(1)));
    }

    pub fn go_parent(&mut self) {
        if let Some(parent) = self.dir.parent() {
            self.dir = parent.to_path_buf();
            self.refresh();
        }
    }

    /// Descend into the selected directory, or return the selected file.
    pub fn enter(&mut self) -> Option<PathBuf> {
        let entry = self.state.selected().and_then(|i| self.entries.get(i)).cloned()?;
        match entry {
            PickerEntry::Parent => {
                self.go_parent();
                None
            }
            PickerEntry::Dir(path) => {
                self.dir = path;
                self.refresh();
                None
            }
            PickerEntry::File(path) => Some(path),
        }
    }
}

fn read_entries(dir: &Path) -> std::io::Result<Vec<PickerEntry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            dirs.push(path);
        } else if ResumeFile::is_accepted(&path) {
            files.push(path);
        }
    }

    dirs.sort();
    files.sort();

    let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
    if dir.parent().is_some() {
        entries.push(PickerEntry::Parent);
    }
    entries.extend(dirs.into_iter().map(PickerEntry::Dir));
    entries.extend(files.into_iter().map(PickerEntry::File));
    Ok(entries)
}
