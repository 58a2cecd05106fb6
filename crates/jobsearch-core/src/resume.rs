use std::path::Path;

use crate::error::ResumeError;

/// Extensions offered by the file picker. Content is never inspected.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// The resume the user picked, held in memory until removed or replaced.
#[derive(Clone, PartialEq, Eq)]
pub struct ResumeFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ResumeFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumeFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ResumeFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ResumeError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| ResumeError::NoFileName(path.display().to_string()))?;

        let bytes = tokio::fs::read(path).await.map_err(|source| ResumeError::Read {
            path: path.display().to_string(),
            source,
        })?;

        tracing::debug!(file = %name, bytes = bytes.len(), "loaded resume");
        Ok(Self { name, bytes })
    }

    /// Picker filter: true when the path ends in one of [`ACCEPTED_EXTENSIONS`].
    pub fn is_accepted(path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                ACCEPTED_EXTENSIONS
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("pdf") => "application/pdf",
            Some("doc") => "application/msword",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            _ => "application/octet-stream",
        }
    }
}
