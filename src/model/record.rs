use serde::{Deserialize, Serialize};

/// Lifecycle status as reported by the server. The client never advances a
/// status locally; it only classifies the reported one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Recording,
    Stopped,
    Transcribing,
    Transcribed,
    Summarizing,
    Completed,
    #[serde(rename = "error")]
    Failed,
}

impl JobStatus {
    /// A job in one of these states is still being worked on server-side and
    /// is worth polling. Every other status is terminal for polling purposes.
    pub fn is_in_progress(self) -> bool {
        matches!(
            self,
            JobStatus::Recording | JobStatus::Transcribing | JobStatus::Summarizing
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Recording => "recording",
            JobStatus::Stopped => "stopped",
            JobStatus::Transcribing => "transcribing",
            JobStatus::Transcribed => "transcribed",
            JobStatus::Summarizing => "summarizing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "error",
        }
    }
}

/// Slim row returned by the collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSummary {
    pub id: String,
    pub title: String,
    pub started_at: Option<String>,
    pub duration_secs: Option<u64>,
    pub status: JobStatus,
}

/// Full snapshot returned by the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub title: String,
    pub status: JobStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub ended_at: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u64>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub transcript_text: Option<String>,
    #[serde(default)]
    pub summary_markdown: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Minimal reference returned by mutating endpoints (start/stop/import).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRef {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub duration_secs: Option<u64>,
}

/// Capture status summary polled alongside the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureStatus {
    pub is_recording: bool,
    #[serde(rename = "current_recording_id")]
    pub current_job_id: Option<String>,
    #[serde(rename = "whisper_model_loaded", default)]
    pub engine_ready: bool,
}

/// Derived booleans gating the per-job actions. Pure functions of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionGates {
    pub in_progress: bool,
    pub can_transcribe: bool,
    pub can_summarize: bool,
    pub can_process: bool,
    pub can_delete: bool,
}

impl JobRecord {
    pub fn is_in_progress(&self) -> bool {
        self.status.is_in_progress()
    }

    pub fn can_transcribe(&self) -> bool {
        !self.is_in_progress() && self.audio_url.is_some() && self.transcript_text.is_none()
    }

    pub fn can_summarize(&self) -> bool {
        !self.is_in_progress() && self.transcript_text.is_some() && self.summary_markdown.is_none()
    }

    pub fn can_process(&self) -> bool {
        !self.is_in_progress() && self.audio_url.is_some()
    }

    pub fn can_delete(&self) -> bool {
        self.status != JobStatus::Recording
    }

    pub fn action_gates(&self) -> ActionGates {
        ActionGates {
            in_progress: self.is_in_progress(),
            can_transcribe: self.can_transcribe(),
            can_summarize: self.can_summarize(),
            can_process: self.can_process(),
            can_delete: self.can_delete(),
        }
    }
}
