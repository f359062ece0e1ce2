pub mod scheduler;

pub use scheduler::{LoopKind, PollScheduler};
