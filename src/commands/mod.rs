mod handlers;
mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation};

use crate::core::catalog::ModelCatalog;
use crate::core::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    ProcessAsMessage(String),
    Quit,
}

/// Classify one input line and run it if it is a command.
///
/// Lines that do not start with the session's command marker are handed back
/// as messages. Command output goes to the session outbox.
pub fn process_input(session: &mut Session, input: &str) -> CommandResult {
    let trimmed = input.trim();
    let marker = session.command_marker();

    let Some(rest) = trimmed.strip_prefix(marker) else {
        return CommandResult::ProcessAsMessage(trimmed.to_string());
    };

    let rest = rest.trim_start();
    let (command_name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    match find_command(command_name) {
        Some(command) => {
            tracing::debug!(command = command.name, args, "Dispatching command");
            let invocation = CommandInvocation {
                marker,
                input: trimmed,
                args,
            };
            (command.handler)(session, invocation)
        }
        None => {
            let usages: Vec<String> = all_commands()
                .iter()
                .map(|command| command.usage(marker))
                .collect();
            session.emit(format!(
                "Unknown command. Available commands:\n{}",
                usages.join(", ")
            ));
            session.emit(format!("\nSee {marker}help for details."));
            CommandResult::Continue
        }
    }
}

/// Grouped provider/model listing followed by usage hints.
pub fn model_listing(catalog: &ModelCatalog, marker: char) -> Vec<String> {
    let mut lines = vec!["\nAvailable models:".to_string()];
    for group in catalog.providers() {
        lines.push(format!("\n{}:", group.provider));
        lines.extend(group.model_names().map(|name| format!("  - {name}")));
    }
    lines.push(format!(
        "\nTo switch models: {marker}model <provider> <model_name>"
    ));
    lines.push(format!("Example: {marker}model openai gpt-4"));
    lines.push(format!("To list models: {marker}models"));
    lines.push(format!("To check the current model: {marker}current"));
    lines.push(format!("To quit: {marker}quit\n"));
    lines
}
