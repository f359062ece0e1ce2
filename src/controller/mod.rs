pub mod events;

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::config::PollingConfig;
use crate::controller::events::{
    ActionKind, ControllerEvent, ListSnapshot, UserAction,
};
use crate::error::{AppError, AppResult};
use crate::model::JobRecord;
use crate::poll::{LoopKind, PollScheduler};
use crate::render::RenderSink;
use crate::service::JobService;

#[derive(Debug, PartialEq, Eq)]
pub enum ControllerFlow {
    Continue,
    Stopped,
}

/// Synchronization controller: owns the focus, the cached detail snapshot,
/// the busy flag, and the poll loops. All of it is mutated on the thread that
/// runs [`Controller::run`]; other threads only feed the event channel.
pub struct Controller<R: RenderSink> {
    service: Arc<dyn JobService>,
    sink: R,
    polling: PollingConfig,
    scheduler: PollScheduler,
    event_tx: Sender<ControllerEvent>,
    focused_id: Option<String>,
    cached_detail: Option<JobRecord>,
    action_in_flight: Option<ActionKind>,
    list_in_flight: bool,
    detail_in_flight: usize,
}

impl<R: RenderSink> Controller<R> {
    pub fn new(
        service: Arc<dyn JobService>,
        sink: R,
        polling: PollingConfig,
        event_tx: Sender<ControllerEvent>,
    ) -> Self {
        Self {
            service,
            sink,
            polling,
            scheduler: PollScheduler::new(),
            event_tx,
            focused_id: None,
            cached_detail: None,
            action_in_flight: None,
            list_in_flight: false,
            detail_in_flight: 0,
        }
    }

    /// Initial list refresh plus the list loop, which stays active for the
    /// lifetime of the controller.
    pub fn start(&mut self) {
        self.refresh_list();
        let tx = self.event_tx.clone();
        self.scheduler.start_loop(
            LoopKind::List,
            Duration::from_millis(self.polling.list_interval_ms),
            move || {
                let _ = tx.send(ControllerEvent::Tick(LoopKind::List));
            },
        );
    }

    pub fn dispose(&mut self) {
        self.scheduler.stop_all();
    }

    pub fn run(&mut self, event_rx: Receiver<ControllerEvent>) -> AppResult<()> {
        self.start();
        loop {
            let event = event_rx.recv().map_err(|_| {
                AppError::ChannelClosed("controller event channel closed".to_owned())
            })?;
            if self.handle_event(event) == ControllerFlow::Stopped {
                return Ok(());
            }
        }
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused_id.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.action_in_flight.is_some()
    }

    pub fn loop_active(&self, kind: LoopKind) -> bool {
        self.scheduler.is_active(kind)
    }

    pub fn handle_event(&mut self, event: ControllerEvent) -> ControllerFlow {
        match event {
            ControllerEvent::Tick(LoopKind::List) => self.refresh_list(),
            ControllerEvent::Tick(LoopKind::Detail) => {
                if let Some(id) = self.focused_id.clone() {
                    if self.detail_in_flight == 0 {
                        self.fetch_detail(id);
                    }
                }
            }
            ControllerEvent::Focus(id) => self.focus(id),
            ControllerEvent::Unfocus => self.unfocus(),
            ControllerEvent::Action(action) => self.apply_action(action),
            ControllerEvent::ListFetched(result) => self.on_list_fetched(result),
            ControllerEvent::DetailFetched { job_id, result } => {
                self.on_detail_fetched(job_id, result)
            }
            ControllerEvent::ActionFinished {
                kind,
                job_id,
                result,
            } => self.on_action_finished(kind, job_id, result),
            ControllerEvent::Shutdown => {
                self.dispose();
                return ControllerFlow::Stopped;
            }
        }
        ControllerFlow::Continue
    }

    fn focus(&mut self, id: String) {
        self.scheduler.stop_loop(LoopKind::Detail);
        self.focused_id = Some(id.clone());
        self.cached_detail = None;
        self.fetch_detail(id);
        self.start_detail_loop();
    }

    fn unfocus(&mut self) {
        self.scheduler.stop_loop(LoopKind::Detail);
        self.focused_id = None;
        self.cached_detail = None;
        self.refresh_list();
    }

    fn start_detail_loop(&mut self) {
        let tx = self.event_tx.clone();
        self.scheduler.start_loop(
            LoopKind::Detail,
            Duration::from_millis(self.polling.detail_interval_ms),
            move || {
                let _ = tx.send(ControllerEvent::Tick(LoopKind::Detail));
            },
        );
    }

    /// Best-effort background refresh; a refresh already in flight is not
    /// doubled up, the running one will deliver.
    fn refresh_list(&mut self) {
        if self.list_in_flight {
            return;
        }
        self.list_in_flight = true;

        let service = self.service.clone();
        let tx = self.event_tx.clone();
        if let Err(error) = spawn_named("actas-fetch-list", move || {
            let result = service
                .capture_status()
                .and_then(|capture| {
                    let jobs = service.list_jobs()?;
                    Ok(ListSnapshot { capture, jobs })
                })
                .map_err(|error| error.to_string());
            let _ = tx.send(ControllerEvent::ListFetched(result));
        }) {
            self.list_in_flight = false;
            tracing::warn!("failed to spawn list fetch: {error}");
        }
    }

    fn fetch_detail(&mut self, id: String) {
        self.detail_in_flight += 1;

        let service = self.service.clone();
        let tx = self.event_tx.clone();
        if let Err(error) = spawn_named("actas-fetch-detail", move || {
            let result = service.get_job(&id).map_err(|error| error.to_string());
            let _ = tx.send(ControllerEvent::DetailFetched { job_id: id, result });
        }) {
            self.detail_in_flight -= 1;
            tracing::warn!("failed to spawn detail fetch: {error}");
        }
    }

    fn on_list_fetched(&mut self, result: Result<ListSnapshot, String>) {
        self.list_in_flight = false;
        match result {
            Ok(snapshot) => self.sink.render_list(&snapshot.capture, &snapshot.jobs),
            Err(error) => tracing::debug!("list poll failed, retrying next tick: {error}"),
        }
    }

    fn on_detail_fetched(&mut self, job_id: String, result: Result<JobRecord, String>) {
        self.detail_in_flight = self.detail_in_flight.saturating_sub(1);

        if self.focused_id.as_deref() != Some(job_id.as_str()) {
            tracing::debug!(job_id, "discarding stale detail snapshot");
            return;
        }

        match result {
            Ok(record) => {
                self.sink.render_detail(&record, &record.action_gates());
                let terminal = !record.is_in_progress();
                self.cached_detail = Some(record);
                if terminal {
                    self.scheduler.stop_loop(LoopKind::Detail);
                }
            }
            Err(error) => tracing::debug!(job_id, "detail poll failed, retrying next tick: {error}"),
        }
    }

    fn apply_action(&mut self, action: UserAction) {
        if self.action_in_flight.is_some() {
            self.sink.show_notice("Hay una accion en curso");
            return;
        }

        let job_id = self.focused_id.clone();
        if action.needs_focus() && job_id.is_none() {
            self.sink.show_notice("No hay grabacion abierta");
            return;
        }
        if let Some(rejection) = self.local_gate_rejection(&action) {
            self.sink.show_error(rejection);
            return;
        }
        if let UserAction::Rename(title) = &action {
            if title.trim().is_empty() {
                return;
            }
        }

        let kind = action.kind();
        self.action_in_flight = Some(kind);

        let service = self.service.clone();
        let tx = self.event_tx.clone();
        let dispatched_id = job_id.clone();
        if let Err(error) = spawn_named("actas-action", move || {
            let result = perform_action(service.as_ref(), &action, dispatched_id.as_deref());
            let _ = tx.send(ControllerEvent::ActionFinished {
                kind,
                job_id: dispatched_id,
                result,
            });
        }) {
            self.action_in_flight = None;
            self.sink.show_error("No se pudo iniciar la accion");
            tracing::warn!("failed to spawn action dispatch: {error}");
        }
    }

    /// Gate checks against the cached snapshot; without a cache the server is
    /// the authority and the call goes through.
    fn local_gate_rejection(&self, action: &UserAction) -> Option<&'static str> {
        let record = self.cached_detail.as_ref()?;
        match action {
            UserAction::Transcribe if !record.can_transcribe() => {
                Some("La grabacion no se puede transcribir ahora")
            }
            UserAction::Summarize if !record.can_summarize() => {
                Some("La grabacion no se puede resumir ahora")
            }
            UserAction::Process if !record.can_process() => {
                Some("La grabacion no se puede procesar ahora")
            }
            UserAction::Delete if !record.can_delete() => {
                Some("Hay que detener la grabacion antes de eliminarla")
            }
            _ => None,
        }
    }

    fn on_action_finished(
        &mut self,
        kind: ActionKind,
        job_id: Option<String>,
        result: Result<(), String>,
    ) {
        self.action_in_flight = None;

        if let Err(detail) = result {
            if kind == ActionKind::Rename {
                self.sink
                    .show_notice(&format!("No se pudo renombrar: {detail}"));
            } else {
                self.sink.show_error(&detail);
            }
            return;
        }

        let still_focused = job_id.is_some() && job_id == self.focused_id;
        match kind {
            ActionKind::Start | ActionKind::Stop | ActionKind::Import => {
                self.refresh_list();
            }
            ActionKind::Delete => {
                if still_focused {
                    self.scheduler.stop_loop(LoopKind::Detail);
                    self.focused_id = None;
                    self.cached_detail = None;
                }
                self.refresh_list();
            }
            ActionKind::Transcribe | ActionKind::Summarize | ActionKind::Process => {
                // The job just left a terminal status; polling must resume.
                if still_focused {
                    self.start_detail_loop();
                    if let Some(id) = job_id {
                        self.fetch_detail(id);
                    }
                }
            }
            ActionKind::Rename => {
                if still_focused {
                    if let Some(id) = job_id {
                        self.fetch_detail(id);
                    }
                }
            }
        }
    }
}

fn perform_action(
    service: &dyn JobService,
    action: &UserAction,
    job_id: Option<&str>,
) -> Result<(), String> {
    let outcome = match action {
        UserAction::Start => service.start_capture(None).map(|_| ()),
        UserAction::Stop => service.stop_capture().map(|_| ()),
        UserAction::Import(path) => service.import_file(path).map(|_| ()),
        UserAction::Rename(title) => match job_id {
            Some(id) => service.rename_job(id, title.trim()),
            None => return Err("No hay grabacion abierta".to_owned()),
        },
        UserAction::Transcribe => match job_id {
            Some(id) => service.transcribe(id),
            None => return Err("No hay grabacion abierta".to_owned()),
        },
        UserAction::Summarize => match job_id {
            Some(id) => service.summarize(id),
            None => return Err("No hay grabacion abierta".to_owned()),
        },
        UserAction::Process => match job_id {
            Some(id) => service.process(id),
            None => return Err("No hay grabacion abierta".to_owned()),
        },
        UserAction::Delete => match job_id {
            Some(id) => service.delete_job(id),
            None => return Err("No hay grabacion abierta".to_owned()),
        },
    };

    outcome.map_err(|error| error.user_detail())
}

fn spawn_named<F>(name: &str, body: F) -> std::io::Result<()>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name(name.to_owned())
        .spawn(body)
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::{Controller, ControllerFlow};
    use crate::config::PollingConfig;
    use crate::controller::events::{ControllerEvent, UserAction};
    use crate::error::{AppError, AppResult};
    use crate::model::{ActionGates, CaptureStatus, JobRecord, JobRef, JobStatus, JobSummary};
    use crate::poll::LoopKind;
    use crate::render::RenderSink;
    use crate::service::JobService;
    use crossbeam_channel::{Receiver, Sender};
    use std::collections::{HashMap, VecDeque};
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum SinkEvent {
        List(usize),
        Detail(String, ActionGates),
        Error(String),
        Notice(String),
    }

    #[derive(Clone, Default)]
    struct SpySink {
        events: Arc<Mutex<Vec<SinkEvent>>>,
    }

    impl SpySink {
        fn take(&self) -> Vec<SinkEvent> {
            self.events.lock().expect("lock sink").drain(..).collect()
        }
    }

    impl RenderSink for SpySink {
        fn render_list(&self, _capture: &CaptureStatus, jobs: &[JobSummary]) {
            self.events
                .lock()
                .expect("lock sink")
                .push(SinkEvent::List(jobs.len()));
        }

        fn render_detail(&self, record: &JobRecord, gates: &ActionGates) {
            self.events
                .lock()
                .expect("lock sink")
                .push(SinkEvent::Detail(record.id.clone(), *gates));
        }

        fn show_error(&self, message: &str) {
            self.events
                .lock()
                .expect("lock sink")
                .push(SinkEvent::Error(message.to_owned()));
        }

        fn show_notice(&self, message: &str) {
            self.events
                .lock()
                .expect("lock sink")
                .push(SinkEvent::Notice(message.to_owned()));
        }
    }

    #[derive(Default)]
    struct FakeService {
        calls: Mutex<Vec<String>>,
        details: Mutex<HashMap<String, VecDeque<AppResult<JobRecord>>>>,
        action_failure: Mutex<Option<AppError>>,
    }

    impl FakeService {
        fn queue_detail(&self, id: &str, result: AppResult<JobRecord>) {
            self.details
                .lock()
                .expect("lock details")
                .entry(id.to_owned())
                .or_default()
                .push_back(result);
        }

        fn fail_next_action(&self, error: AppError) {
            *self.action_failure.lock().expect("lock failure") = Some(error);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("lock calls").clone()
        }

        fn record_call(&self, call: &str) {
            self.calls.lock().expect("lock calls").push(call.to_owned());
        }

        fn action_outcome(&self) -> AppResult<()> {
            match self.action_failure.lock().expect("lock failure").take() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }
    }

    fn stopped_record(id: &str) -> JobRecord {
        JobRecord {
            id: id.to_owned(),
            title: format!("Grabacion {id}"),
            status: JobStatus::Stopped,
            started_at: None,
            ended_at: None,
            duration_secs: Some(5),
            audio_url: Some(format!("/api/recordings/{id}/audio")),
            transcript_text: None,
            summary_markdown: None,
            error_message: None,
        }
    }

    impl JobService for FakeService {
        fn capture_status(&self) -> AppResult<CaptureStatus> {
            self.record_call("status");
            Ok(CaptureStatus {
                is_recording: false,
                current_job_id: None,
                engine_ready: true,
            })
        }

        fn list_jobs(&self) -> AppResult<Vec<JobSummary>> {
            self.record_call("list");
            Ok(Vec::new())
        }

        fn get_job(&self, id: &str) -> AppResult<JobRecord> {
            self.record_call(&format!("get:{id}"));
            self.details
                .lock()
                .expect("lock details")
                .get_mut(id)
                .and_then(VecDeque::pop_front)
                .unwrap_or_else(|| Ok(stopped_record(id)))
        }

        fn start_capture(&self, _title: Option<&str>) -> AppResult<JobRef> {
            self.record_call("start");
            self.action_outcome().map(|_| JobRef {
                id: "rec-new".to_owned(),
                status: JobStatus::Recording,
                duration_secs: None,
            })
        }

        fn stop_capture(&self) -> AppResult<JobRef> {
            self.record_call("stop");
            self.action_outcome().map(|_| JobRef {
                id: "rec-new".to_owned(),
                status: JobStatus::Stopped,
                duration_secs: Some(5),
            })
        }

        fn import_file(&self, path: &Path) -> AppResult<JobRef> {
            self.record_call(&format!("import:{}", path.display()));
            self.action_outcome().map(|_| JobRef {
                id: "rec-imported".to_owned(),
                status: JobStatus::Stopped,
                duration_secs: None,
            })
        }

        fn rename_job(&self, id: &str, title: &str) -> AppResult<()> {
            self.record_call(&format!("rename:{id}:{title}"));
            self.action_outcome()
        }

        fn transcribe(&self, id: &str) -> AppResult<()> {
            self.record_call(&format!("transcribe:{id}"));
            self.action_outcome()
        }

        fn summarize(&self, id: &str) -> AppResult<()> {
            self.record_call(&format!("summarize:{id}"));
            self.action_outcome()
        }

        fn process(&self, id: &str) -> AppResult<()> {
            self.record_call(&format!("process:{id}"));
            self.action_outcome()
        }

        fn delete_job(&self, id: &str) -> AppResult<()> {
            self.record_call(&format!("delete:{id}"));
            self.action_outcome()
        }
    }

    fn quiet_polling() -> PollingConfig {
        // Long intervals so timers never fire during a test.
        PollingConfig {
            list_interval_ms: 600_000,
            detail_interval_ms: 600_000,
        }
    }

    fn harness() -> (
        Controller<SpySink>,
        Arc<FakeService>,
        SpySink,
        Sender<ControllerEvent>,
        Receiver<ControllerEvent>,
    ) {
        let (tx, rx) = crossbeam_channel::unbounded();
        let service = Arc::new(FakeService::default());
        let sink = SpySink::default();
        let controller = Controller::new(
            service.clone(),
            sink.clone(),
            quiet_polling(),
            tx.clone(),
        );
        (controller, service, sink, tx, rx)
    }

    fn recv_event(rx: &Receiver<ControllerEvent>) -> ControllerEvent {
        rx.recv_timeout(Duration::from_secs(2))
            .expect("timed out waiting for controller event")
    }

    /// Drives one dispatched completion back into the controller.
    fn pump(controller: &mut Controller<SpySink>, rx: &Receiver<ControllerEvent>) {
        let event = recv_event(rx);
        assert_eq!(controller.handle_event(event), ControllerFlow::Continue);
    }

    #[test]
    fn focus_fetches_and_renders_detail() {
        let (mut controller, service, sink, _tx, rx) = harness();
        service.queue_detail("rec-1", Ok(stopped_record("rec-1")));

        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        assert!(controller.loop_active(LoopKind::Detail));
        pump(&mut controller, &rx);

        let events = sink.take();
        assert!(matches!(&events[..], [SinkEvent::Detail(id, _)] if id == "rec-1"));
        assert_eq!(controller.focused(), Some("rec-1"));
    }

    #[test]
    fn terminal_snapshot_stops_detail_loop() {
        let (mut controller, service, _sink, _tx, rx) = harness();
        service.queue_detail("rec-1", Ok(stopped_record("rec-1")));

        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        pump(&mut controller, &rx);

        assert!(!controller.loop_active(LoopKind::Detail));
    }

    #[test]
    fn in_progress_snapshot_keeps_detail_loop_running() {
        let (mut controller, service, _sink, _tx, rx) = harness();
        let mut record = stopped_record("rec-1");
        record.status = JobStatus::Transcribing;
        service.queue_detail("rec-1", Ok(record));

        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        pump(&mut controller, &rx);

        assert!(controller.loop_active(LoopKind::Detail));
    }

    #[test]
    fn stale_detail_snapshot_is_discarded_after_refocus() {
        let (mut controller, service, sink, _tx, rx) = harness();
        service.queue_detail("rec-a", Ok(stopped_record("rec-a")));
        service.queue_detail("rec-b", Ok(stopped_record("rec-b")));

        controller.handle_event(ControllerEvent::Focus("rec-a".to_owned()));
        controller.handle_event(ControllerEvent::Focus("rec-b".to_owned()));

        // Both in-flight responses arrive; only the one matching the current
        // focus may render.
        pump(&mut controller, &rx);
        pump(&mut controller, &rx);

        let rendered: Vec<_> = sink
            .take()
            .into_iter()
            .filter(|event| matches!(event, SinkEvent::Detail(_, _)))
            .collect();
        assert_eq!(rendered.len(), 1);
        assert!(matches!(&rendered[0], SinkEvent::Detail(id, _) if id == "rec-b"));
    }

    #[test]
    fn stale_detail_snapshot_is_discarded_after_unfocus() {
        let (mut controller, service, sink, _tx, rx) = harness();
        service.queue_detail("rec-a", Ok(stopped_record("rec-a")));

        controller.handle_event(ControllerEvent::Focus("rec-a".to_owned()));
        controller.handle_event(ControllerEvent::Unfocus);
        assert!(!controller.loop_active(LoopKind::Detail));

        // Unfocus triggered a list refresh and the detail response is still
        // in flight; drain both, the detail one must not render.
        pump(&mut controller, &rx);
        pump(&mut controller, &rx);

        assert!(sink
            .take()
            .iter()
            .all(|event| !matches!(event, SinkEvent::Detail(_, _))));
    }

    #[test]
    fn busy_flag_rejects_second_action_and_is_released() {
        let (mut controller, service, sink, _tx, rx) = harness();
        service.queue_detail("rec-1", Ok(stopped_record("rec-1")));
        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        pump(&mut controller, &rx);
        sink.take();

        controller.handle_event(ControllerEvent::Action(UserAction::Transcribe));
        assert!(controller.is_busy());
        controller.handle_event(ControllerEvent::Action(UserAction::Process));
        assert_eq!(
            sink.take(),
            vec![SinkEvent::Notice("Hay una accion en curso".to_owned())]
        );

        pump(&mut controller, &rx);
        assert!(!controller.is_busy());
        assert_eq!(
            service
                .calls()
                .iter()
                .filter(|call| call.starts_with("transcribe"))
                .count(),
            1
        );
    }

    #[test]
    fn busy_flag_is_released_after_failure_and_detail_is_surfaced() {
        let (mut controller, service, sink, _tx, rx) = harness();
        service.queue_detail("rec-1", Ok(stopped_record("rec-1")));
        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        pump(&mut controller, &rx);
        sink.take();

        service.fail_next_action(AppError::Service {
            status: 400,
            detail: "No hay archivo de audio".to_owned(),
        });
        controller.handle_event(ControllerEvent::Action(UserAction::Transcribe));
        pump(&mut controller, &rx);

        assert!(!controller.is_busy());
        assert_eq!(
            sink.take(),
            vec![SinkEvent::Error("No hay archivo de audio".to_owned())]
        );
    }

    #[test]
    fn transcribe_restarts_detail_loop_after_success() {
        let (mut controller, service, _sink, _tx, rx) = harness();
        service.queue_detail("rec-1", Ok(stopped_record("rec-1")));
        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        pump(&mut controller, &rx);
        assert!(!controller.loop_active(LoopKind::Detail), "terminal stop");

        controller.handle_event(ControllerEvent::Action(UserAction::Transcribe));
        let mut record = stopped_record("rec-1");
        record.status = JobStatus::Transcribing;
        service.queue_detail("rec-1", Ok(record));
        pump(&mut controller, &rx); // ActionFinished
        assert!(controller.loop_active(LoopKind::Detail));
        pump(&mut controller, &rx); // refreshed detail

        assert!(controller.loop_active(LoopKind::Detail));
    }

    #[test]
    fn local_gates_reject_impossible_actions_without_calling_server() {
        let (mut controller, service, sink, _tx, rx) = harness();
        let mut record = stopped_record("rec-1");
        record.audio_url = None;
        service.queue_detail("rec-1", Ok(record));
        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        pump(&mut controller, &rx);
        sink.take();

        controller.handle_event(ControllerEvent::Action(UserAction::Transcribe));

        assert!(!controller.is_busy());
        assert_eq!(
            sink.take(),
            vec![SinkEvent::Error(
                "La grabacion no se puede transcribir ahora".to_owned()
            )]
        );
        assert!(service
            .calls()
            .iter()
            .all(|call| !call.starts_with("transcribe")));
    }

    #[test]
    fn delete_unfocuses_and_refreshes_list() {
        let (mut controller, service, sink, _tx, rx) = harness();
        service.queue_detail("rec-1", Ok(stopped_record("rec-1")));
        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        pump(&mut controller, &rx);
        sink.take();

        controller.handle_event(ControllerEvent::Action(UserAction::Delete));
        pump(&mut controller, &rx); // ActionFinished
        assert_eq!(controller.focused(), None);
        assert!(!controller.loop_active(LoopKind::Detail));
        pump(&mut controller, &rx); // ListFetched

        assert_eq!(sink.take(), vec![SinkEvent::List(0)]);
        assert!(service.calls().contains(&"delete:rec-1".to_owned()));
    }

    #[test]
    fn rename_failure_is_reported_as_notice() {
        let (mut controller, service, sink, _tx, rx) = harness();
        service.queue_detail("rec-1", Ok(stopped_record("rec-1")));
        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        pump(&mut controller, &rx);
        sink.take();

        service.fail_next_action(AppError::Service {
            status: 404,
            detail: "Grabacion no encontrada".to_owned(),
        });
        controller.handle_event(ControllerEvent::Action(UserAction::Rename(
            "Nuevo titulo".to_owned(),
        )));
        pump(&mut controller, &rx);

        assert_eq!(
            sink.take(),
            vec![SinkEvent::Notice(
                "No se pudo renombrar: Grabacion no encontrada".to_owned()
            )]
        );
    }

    #[test]
    fn blank_rename_is_a_no_op() {
        let (mut controller, service, sink, _tx, rx) = harness();
        service.queue_detail("rec-1", Ok(stopped_record("rec-1")));
        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        pump(&mut controller, &rx);
        sink.take();

        controller.handle_event(ControllerEvent::Action(UserAction::Rename("  ".to_owned())));

        assert!(!controller.is_busy());
        assert!(sink.take().is_empty());
        assert!(service.calls().iter().all(|call| !call.starts_with("rename")));
    }

    #[test]
    fn focus_scoped_action_without_focus_is_rejected() {
        let (mut controller, _service, sink, _tx, _rx) = harness();
        controller.handle_event(ControllerEvent::Action(UserAction::Summarize));
        assert_eq!(
            sink.take(),
            vec![SinkEvent::Notice("No hay grabacion abierta".to_owned())]
        );
    }

    #[test]
    fn list_tick_failure_is_swallowed() {
        let (mut controller, _service, sink, _tx, _rx) = harness();
        controller.handle_event(ControllerEvent::ListFetched(Err(
            "connection refused".to_owned()
        )));
        assert!(sink.take().is_empty());
    }

    #[test]
    fn list_tick_skips_when_refresh_still_in_flight() {
        let (mut controller, service, sink, _tx, rx) = harness();

        controller.handle_event(ControllerEvent::Tick(LoopKind::List));
        controller.handle_event(ControllerEvent::Tick(LoopKind::List));
        pump(&mut controller, &rx); // ListFetched from the first tick

        assert_eq!(
            service.calls(),
            vec!["status".to_owned(), "list".to_owned()],
            "second tick must not double up the in-flight refresh"
        );
        assert_eq!(sink.take(), vec![SinkEvent::List(0)]);

        // With the refresh settled the next tick fetches again.
        controller.handle_event(ControllerEvent::Tick(LoopKind::List));
        pump(&mut controller, &rx);
        assert_eq!(service.calls().len(), 4);
    }

    #[test]
    fn detail_tick_skips_when_fetch_still_in_flight() {
        let (mut controller, service, _sink, _tx, rx) = harness();
        service.queue_detail("rec-1", Ok(stopped_record("rec-1")));

        controller.handle_event(ControllerEvent::Focus("rec-1".to_owned()));
        controller.handle_event(ControllerEvent::Tick(LoopKind::Detail));
        pump(&mut controller, &rx);

        let gets = service
            .calls()
            .iter()
            .filter(|call| call.starts_with("get:"))
            .count();
        assert_eq!(gets, 1, "tick must not overlap the in-flight fetch");
    }

    #[test]
    fn shutdown_stops_loops_and_ends_the_run() {
        let (mut controller, _service, _sink, _tx, _rx) = harness();
        controller.start();
        assert!(controller.loop_active(LoopKind::List));

        let flow = controller.handle_event(ControllerEvent::Shutdown);
        assert_eq!(flow, ControllerFlow::Stopped);
        assert!(!controller.loop_active(LoopKind::List));
    }
}
