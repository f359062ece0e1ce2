use std::path::PathBuf;

use crate::model::{CaptureStatus, JobRecord, JobSummary};
use crate::poll::LoopKind;

/// User-initiated mutations, as accepted by the controller.
#[derive(Debug, Clone)]
pub enum UserAction {
    Start,
    Stop,
    Import(PathBuf),
    Rename(String),
    Transcribe,
    Summarize,
    Process,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Start,
    Stop,
    Import,
    Rename,
    Transcribe,
    Summarize,
    Process,
    Delete,
}

impl UserAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            UserAction::Start => ActionKind::Start,
            UserAction::Stop => ActionKind::Stop,
            UserAction::Import(_) => ActionKind::Import,
            UserAction::Rename(_) => ActionKind::Rename,
            UserAction::Transcribe => ActionKind::Transcribe,
            UserAction::Summarize => ActionKind::Summarize,
            UserAction::Process => ActionKind::Process,
            UserAction::Delete => ActionKind::Delete,
        }
    }

    /// Actions scoped to the focused job; the rest act on the capture session
    /// or the collection.
    pub fn needs_focus(&self) -> bool {
        matches!(
            self,
            UserAction::Rename(_)
                | UserAction::Transcribe
                | UserAction::Summarize
                | UserAction::Process
                | UserAction::Delete
        )
    }
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Start => "start",
            ActionKind::Stop => "stop",
            ActionKind::Import => "import",
            ActionKind::Rename => "rename",
            ActionKind::Transcribe => "transcribe",
            ActionKind::Summarize => "summarize",
            ActionKind::Process => "process",
            ActionKind::Delete => "delete",
        }
    }
}

/// What a list-loop tick fetches: the capture status summary plus the
/// collection, delivered to the sink together.
#[derive(Debug, Clone)]
pub struct ListSnapshot {
    pub capture: CaptureStatus,
    pub jobs: Vec<JobSummary>,
}

/// Everything the controller reacts to. Ticker threads, fetch threads, and
/// the front end all feed this one channel; the controller thread is the only
/// place view state is mutated.
#[derive(Debug)]
pub enum ControllerEvent {
    Tick(LoopKind),
    Focus(String),
    Unfocus,
    Action(UserAction),
    ListFetched(Result<ListSnapshot, String>),
    DetailFetched {
        /// Focused id captured at dispatch time; compared against the current
        /// focus before rendering.
        job_id: String,
        result: Result<JobRecord, String>,
    },
    ActionFinished {
        kind: ActionKind,
        job_id: Option<String>,
        result: Result<(), String>,
    },
    Shutdown,
}
