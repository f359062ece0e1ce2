use std::path::PathBuf;

use crate::controller::events::{ControllerEvent, UserAction};
use crate::poll::LoopKind;

/// One line of console input, parsed. `Delete` is confirmed by the input
/// reader before it reaches the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Open(String),
    Back,
    Start,
    Stop,
    Import(PathBuf),
    Rename(String),
    Transcribe,
    Summarize,
    Process,
    Delete,
    Refresh,
    Help,
    Quit,
}

pub fn parse_line(line: &str) -> Option<ConsoleCommand> {
    let trimmed = line.trim();
    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (trimmed, ""),
    };

    match (word.to_ascii_lowercase().as_str(), rest) {
        ("open", id) if !id.is_empty() => Some(ConsoleCommand::Open(id.to_owned())),
        ("back", "") => Some(ConsoleCommand::Back),
        ("start", "") => Some(ConsoleCommand::Start),
        ("stop", "") => Some(ConsoleCommand::Stop),
        ("import", path) if !path.is_empty() => {
            Some(ConsoleCommand::Import(PathBuf::from(path)))
        }
        ("rename", title) if !title.is_empty() => {
            Some(ConsoleCommand::Rename(title.to_owned()))
        }
        ("transcribe", "") => Some(ConsoleCommand::Transcribe),
        ("summarize", "") => Some(ConsoleCommand::Summarize),
        ("process", "") => Some(ConsoleCommand::Process),
        ("delete", "") => Some(ConsoleCommand::Delete),
        ("refresh", "") => Some(ConsoleCommand::Refresh),
        ("help", "") => Some(ConsoleCommand::Help),
        ("quit", "") | ("exit", "") => Some(ConsoleCommand::Quit),
        _ => None,
    }
}

/// Event the command maps to; `Help` and `Quit` are handled by the reader.
pub fn command_event(command: ConsoleCommand) -> Option<ControllerEvent> {
    match command {
        ConsoleCommand::Open(id) => Some(ControllerEvent::Focus(id)),
        ConsoleCommand::Back => Some(ControllerEvent::Unfocus),
        ConsoleCommand::Start => Some(ControllerEvent::Action(UserAction::Start)),
        ConsoleCommand::Stop => Some(ControllerEvent::Action(UserAction::Stop)),
        ConsoleCommand::Import(path) => Some(ControllerEvent::Action(UserAction::Import(path))),
        ConsoleCommand::Rename(title) => Some(ControllerEvent::Action(UserAction::Rename(title))),
        ConsoleCommand::Transcribe => Some(ControllerEvent::Action(UserAction::Transcribe)),
        ConsoleCommand::Summarize => Some(ControllerEvent::Action(UserAction::Summarize)),
        ConsoleCommand::Process => Some(ControllerEvent::Action(UserAction::Process)),
        ConsoleCommand::Delete => Some(ControllerEvent::Action(UserAction::Delete)),
        ConsoleCommand::Refresh => Some(ControllerEvent::Tick(LoopKind::List)),
        ConsoleCommand::Help | ConsoleCommand::Quit => None,
    }
}

pub fn help_text() -> &'static str {
    "comandos: open <id> | back | start | stop | import <ruta> | rename <titulo> | \
     transcribe | summarize | process | delete | refresh | help | quit"
}
