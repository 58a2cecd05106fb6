//! Sequential drivers that run a view operation end to end against the
//! backend. The TUI spawns the request half itself instead.

use crate::client::JobSearchClient;
use crate::error::ValidationError;
use crate::job::JobId;
use crate::view::JobSearchView;

/// Submit the selected resume and apply the response.
pub async fn search(
    view: &mut JobSearchView,
    client: &JobSearchClient,
) -> Result<(), ValidationError> {
    let ticket = view.begin_search()?;
    let result = client.parse_and_search(&ticket.file).await;
    view.complete_search(ticket.token, result);
    Ok(())
}

/// Generate (or regenerate) the cover letter for `job_id`. Returns false when
/// nothing was started because the job is unknown or already generating.
pub async fn generate_cover_letter(
    view: &mut JobSearchView,
    client: &JobSearchClient,
    job_id: &JobId,
) -> bool {
    let Some(ticket) = view.begin_cover_letter(job_id) else {
        return false;
    };
    let result = client.generate_cover_letter(&ticket.request).await;
    view.complete_cover_letter(&ticket.job_id, ticket.token, result);
    true
}
