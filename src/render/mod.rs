pub mod escape;
pub mod markdown;
pub mod text;

use crate::model::{ActionGates, CaptureStatus, JobRecord, JobSummary};

pub use text::ConsoleRenderer;

/// Display interface fed by the controller. Implementations must not mutate
/// their input and must neutralize untrusted text before embedding it.
pub trait RenderSink {
    fn render_list(&self, capture: &CaptureStatus, jobs: &[JobSummary]);
    fn render_detail(&self, record: &JobRecord, gates: &ActionGates);

    /// Failure of a user-initiated action, shown before control returns.
    fn show_error(&self, message: &str);

    /// Informational message (rejected input, rename failure notice).
    fn show_notice(&self, message: &str);
}
