use crate::commands::registry::CommandInvocation;
use crate::commands::{all_commands, CommandResult};
use crate::core::session::Session;

pub(crate) fn handle_help(session: &mut Session, invocation: CommandInvocation<'_>) -> CommandResult {
    let mut help = String::from("Available commands:");
    for command in all_commands() {
        help.push_str(&format!("\n{} - {}", command.usage(invocation.marker), command.help));
    }
    session.emit(help);
    CommandResult::Continue
}

pub(crate) fn handle_quit(session: &mut Session, _invocation: CommandInvocation<'_>) -> CommandResult {
    session.log_notice("Chat session ended");
    CommandResult::Quit
}
