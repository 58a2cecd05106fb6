//! Wire types exchanged with the job search backend.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier of a job within one result set.
///
/// The backend is expected to send strings, but numeric ids are accepted and
/// normalised to their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for JobId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Int(i64),
            Uint(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => JobId(s),
            RawId::Int(n) => JobId(n.to_string()),
            RawId::Uint(n) => JobId(n.to_string()),
        })
    }
}

/// A matched job posting. Immutable once received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "non_empty_string")]
    pub degree_requirements: Option<String>,
}

/// Body of a successful `/api/parse-and-search` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<Job>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resume_text: String,
}

/// Body sent to `/api/generate-cover-letter`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverLetterRequest {
    pub resume_text: String,
    pub description: String,
    pub company: String,
    pub position: String,
}

impl CoverLetterRequest {
    pub fn for_job(resume_text: &str, job: &Job) -> Self {
        Self {
            resume_text: resume_text.to_string(),
            description: job.description.clone(),
            company: job.company.clone(),
            position: job.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CoverLetterResponse {
    pub cover_letter: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.trim().is_empty()))
}
