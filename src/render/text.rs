use std::io::Write;
use std::sync::Mutex;

use chrono::{DateTime, Local};

use crate::model::{ActionGates, CaptureStatus, JobRecord, JobSummary};
use crate::render::escape::{sanitize_block, sanitize_inline};
use crate::render::markdown::render_markdown;
use crate::render::RenderSink;

/// Terminal renderer. Write failures are ignored; display is best-effort and
/// must never take the controller down.
pub struct ConsoleRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn write_lines(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }
}

pub fn format_duration(secs: u64) -> String {
    let h = secs / 3600;
    let m = (secs % 3600) / 60;
    let s = secs % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

pub fn duration_label(duration_secs: Option<u64>) -> String {
    duration_secs.map(format_duration).unwrap_or_else(|| "--:--".to_owned())
}

/// RFC 3339 timestamps become local `YYYY-MM-DD HH:MM`; anything unparsable is
/// shown as-is after sanitizing.
pub fn timestamp_label(raw: Option<&str>) -> String {
    match raw {
        None => String::new(),
        Some(raw) => match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => parsed
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string(),
            Err(_) => sanitize_inline(raw),
        },
    }
}

impl<W: Write + Send> RenderSink for ConsoleRenderer<W> {
    fn render_list(&self, capture: &CaptureStatus, jobs: &[JobSummary]) {
        let mut text = String::new();
        text.push_str("== Grabaciones ==\n");

        if capture.is_recording {
            match &capture.current_job_id {
                Some(id) => text.push_str(&format!(
                    "captura: grabando ({})\n",
                    sanitize_inline(id)
                )),
                None => text.push_str("captura: grabando\n"),
            }
        } else {
            text.push_str("captura: inactiva\n");
        }
        if !capture.engine_ready {
            text.push_str("motor de transcripcion: cargando\n");
        }

        if jobs.is_empty() {
            text.push_str("(sin grabaciones)");
        } else {
            for job in jobs {
                text.push_str(&format!(
                    "  {}  {:16}  {:>8}  [{}]  {}\n",
                    sanitize_inline(&job.id),
                    timestamp_label(job.started_at.as_deref()),
                    duration_label(job.duration_secs),
                    job.status.as_str(),
                    sanitize_inline(&job.title),
                ));
            }
            text.pop();
        }

        self.write_lines(&text);
    }

    fn render_detail(&self, record: &JobRecord, gates: &ActionGates) {
        let mut text = String::new();
        text.push_str(&format!("== {} ==\n", sanitize_inline(&record.title)));
        text.push_str(&format!("id: {}\n", sanitize_inline(&record.id)));
        text.push_str(&format!("estado: {}\n", record.status.as_str()));
        text.push_str(&format!(
            "fecha: {}  duracion: {}\n",
            timestamp_label(record.started_at.as_deref()),
            duration_label(record.duration_secs),
        ));

        if let Some(error) = &record.error_message {
            text.push_str(&format!("fallo: {}\n", sanitize_block(error)));
        }
        if let Some(audio) = &record.audio_url {
            text.push_str(&format!("audio: {}\n", sanitize_inline(audio)));
        }

        text.push_str(&format!(
            "acciones: transcribir[{}] resumir[{}] procesar[{}] eliminar[{}]{}\n",
            yes_no(gates.can_transcribe),
            yes_no(gates.can_summarize),
            yes_no(gates.can_process),
            yes_no(gates.can_delete),
            if gates.in_progress { "  (en curso)" } else { "" },
        ));

        if let Some(transcript) = &record.transcript_text {
            text.push_str("--- transcripcion ---\n");
            text.push_str(&sanitize_block(transcript));
            text.push('\n');
        }
        if let Some(summary) = &record.summary_markdown {
            text.push_str("--- resumen ---\n");
            text.push_str(&sanitize_block(&render_markdown(summary)));
            text.push('\n');
        }
        text.pop();

        self.write_lines(&text);
    }

    fn show_error(&self, message: &str) {
        self.write_lines(&format!("Error: {}", sanitize_block(message)));
    }

    fn show_notice(&self, message: &str) {
        self.write_lines(&sanitize_block(message));
    }
}

fn yes_no(enabled: bool) -> &'static str {
    if enabled {
        "si"
    } else {
        "no"
    }
}
