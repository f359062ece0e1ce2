use std::io::BufRead;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Sender;

use crate::bootstrap::AppPaths;
use crate::config::AppConfig;
use crate::controller::events::{ControllerEvent, UserAction};
use crate::controller::Controller;
use crate::error::{AppError, AppResult};
use crate::render::text::{duration_label, timestamp_label};
use crate::render::ConsoleRenderer;
use crate::runtime::console::{command_event, help_text, parse_line, ConsoleCommand};
use crate::service::{HttpJobService, JobService};

fn build_service(config: &AppConfig) -> AppResult<HttpJobService> {
    HttpJobService::new(
        &config.server.base_url,
        Duration::from_secs(config.server.request_timeout_seconds),
    )
}

pub fn run_app(config: AppConfig, paths: AppPaths) -> AppResult<()> {
    paths.ensure_dirs()?;

    let service = Arc::new(build_service(&config)?);
    let sink = ConsoleRenderer::stdout();
    let (event_tx, event_rx) = crossbeam_channel::unbounded();
    let mut controller = Controller::new(service, sink, config.polling.clone(), event_tx.clone());

    let shutdown_tx = event_tx.clone();
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(ControllerEvent::Shutdown);
    })
    .map_err(|error| AppError::Controller(format!("failed to register ctrl-c handler: {error}")))?;

    spawn_input_reader(event_tx)?;

    println!("actas-console conectado a {}", config.server.base_url);
    println!("{}", help_text());

    let result = controller.run(event_rx);
    controller.dispose();
    result
}

fn spawn_input_reader(tx: Sender<ControllerEvent>) -> AppResult<()> {
    thread::Builder::new()
        .name("actas-console-input".to_owned())
        .spawn(move || {
            let stdin = std::io::stdin();
            let mut lines = stdin.lock().lines();

            loop {
                let line = match lines.next() {
                    Some(Ok(line)) => line,
                    Some(Err(_)) | None => {
                        let _ = tx.send(ControllerEvent::Shutdown);
                        return;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match parse_line(&line) {
                    Some(ConsoleCommand::Quit) => {
                        let _ = tx.send(ControllerEvent::Shutdown);
                        return;
                    }
                    Some(ConsoleCommand::Help) | None => println!("{}", help_text()),
                    Some(ConsoleCommand::Delete) => {
                        println!("Eliminar esta grabacion y todos sus archivos? (s/N)");
                        match lines.next() {
                            Some(Ok(answer)) if is_affirmative(&answer) => {
                                let _ = tx.send(ControllerEvent::Action(UserAction::Delete));
                            }
                            Some(Ok(_)) => println!("cancelado"),
                            Some(Err(_)) | None => {
                                let _ = tx.send(ControllerEvent::Shutdown);
                                return;
                            }
                        }
                    }
                    Some(command) => {
                        if let Some(event) = command_event(command) {
                            if tx.send(event).is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        })
        .map_err(|error| AppError::Controller(format!("failed to spawn input reader: {error}")))?;
    Ok(())
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "s" | "si" | "y" | "yes")
}

/// One-shot `status` subcommand body.
pub fn status_report(config: &AppConfig, json: bool) -> AppResult<String> {
    let service = build_service(config)?;
    let status = service.capture_status()?;

    if json {
        return Ok(serde_json::to_string_pretty(&status)?);
    }

    let mut report = String::new();
    if status.is_recording {
        match &status.current_job_id {
            Some(id) => report.push_str(&format!("captura: grabando ({id})\n")),
            None => report.push_str("captura: grabando\n"),
        }
    } else {
        report.push_str("captura: inactiva\n");
    }
    report.push_str(if status.engine_ready {
        "motor de transcripcion: listo"
    } else {
        "motor de transcripcion: cargando"
    });
    Ok(report)
}

/// One-shot `list` subcommand body.
pub fn list_report(config: &AppConfig, json: bool) -> AppResult<String> {
    let service = build_service(config)?;
    let jobs = service.list_jobs()?;

    if json {
        return Ok(serde_json::to_string_pretty(&jobs)?);
    }

    if jobs.is_empty() {
        return Ok("(sin grabaciones)".to_owned());
    }

    let rows: Vec<String> = jobs
        .iter()
        .map(|job| {
            format!(
                "{}  {:16}  {:>8}  [{}]  {}",
                job.id,
                timestamp_label(job.started_at.as_deref()),
                duration_label(job.duration_secs),
                job.status.as_str(),
                job.title,
            )
        })
        .collect();
    Ok(rows.join("\n"))
}
