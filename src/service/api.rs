use std::path::Path;

use crate::error::AppResult;
use crate::model::{CaptureStatus, JobRecord, JobRef, JobSummary};

/// Backend Job Service operations consumed by the controller.
///
/// Implementations are called from short-lived dispatch threads, so they must
/// be shareable. Mutating calls return the server's view; the controller
/// re-polls rather than trusting locally computed transitions.
pub trait JobService: Send + Sync {
    fn capture_status(&self) -> AppResult<CaptureStatus>;
    fn list_jobs(&self) -> AppResult<Vec<JobSummary>>;
    fn get_job(&self, id: &str) -> AppResult<JobRecord>;

    fn start_capture(&self, title: Option<&str>) -> AppResult<JobRef>;
    fn stop_capture(&self) -> AppResult<JobRef>;
    fn import_file(&self, path: &Path) -> AppResult<JobRef>;

    fn rename_job(&self, id: &str, title: &str) -> AppResult<()>;
    fn transcribe(&self, id: &str) -> AppResult<()>;
    fn summarize(&self, id: &str) -> AppResult<()>;
    fn process(&self, id: &str) -> AppResult<()>;
    fn delete_job(&self, id: &str) -> AppResult<()>;
}
