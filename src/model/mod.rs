pub mod record;

pub use record::{ActionGates, CaptureStatus, JobRecord, JobRef, JobStatus, JobSummary};
