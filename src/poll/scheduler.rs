use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;

/// Named polling loops. At most one loop per kind is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    List,
    Detail,
}

impl LoopKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LoopKind::List => "list",
            LoopKind::Detail => "detail",
        }
    }
}

struct LoopHandle {
    stop_tx: Sender<()>,
    join: thread::JoinHandle<()>,
}

/// Owns the ticker threads behind the periodic polling loops.
///
/// A ticker only fires `on_tick`; fetching and result handling happen in the
/// controller, so stopping a loop cancels future ticks without aborting an
/// in-flight request.
#[derive(Default)]
pub struct PollScheduler {
    loops: HashMap<LoopKind, LoopHandle>,
}

impl PollScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a repeating timer for `kind`, superseding any active loop of the
    /// same kind. The first tick fires after one full interval; callers wanting
    /// an immediate fetch issue it themselves.
    pub fn start_loop<F>(&mut self, kind: LoopKind, interval: Duration, on_tick: F)
    where
        F: Fn() + Send + 'static,
    {
        self.stop_loop(kind);

        let (stop_tx, stop_rx) = crossbeam_channel::bounded::<()>(1);
        let ticker = crossbeam_channel::tick(interval);

        let spawned = thread::Builder::new()
            .name(format!("actas-poll-{}", kind.as_str()))
            .spawn(move || loop {
                crossbeam_channel::select! {
                    recv(ticker) -> _ => on_tick(),
                    recv(stop_rx) -> _ => break,
                }
            });

        match spawned {
            Ok(join) => {
                self.loops.insert(kind, LoopHandle { stop_tx, join });
            }
            Err(error) => {
                tracing::warn!(
                    loop_kind = kind.as_str(),
                    "failed to spawn poll ticker: {error}"
                );
            }
        }
    }

    /// Cancels the named loop if active. Idempotent.
    pub fn stop_loop(&mut self, kind: LoopKind) {
        if let Some(handle) = self.loops.remove(&kind) {
            let _ = handle.stop_tx.send(());
            drop(handle.stop_tx);
            let _ = handle.join.join();
            tracing::debug!(loop_kind = kind.as_str(), "poll loop stopped");
        }
    }

    pub fn stop_all(&mut self) {
        for kind in [LoopKind::List, LoopKind::Detail] {
            self.stop_loop(kind);
        }
    }

    pub fn is_active(&self, kind: LoopKind) -> bool {
        self.loops.contains_key(&kind)
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop_all();
    }
}
