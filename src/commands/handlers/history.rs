use super::{report, require_arity};
use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::session::Session;

pub(crate) fn handle_history_size(
    session: &mut Session,
    invocation: CommandInvocation<'_>,
) -> CommandResult {
    if let Err(err) = require_arity(&invocation, 1, "history_size", "<number>") {
        report(session, &err);
        session.emit(format!("Example: {}history_size 10", invocation.marker));
        return CommandResult::Continue;
    }
    let Some(size) = invocation.arg(0) else {
        return CommandResult::Continue;
    };

    match session.set_history_limit(size) {
        Ok(limit) => session.emit(format!("History size set to {limit}.")),
        Err(err) => {
            report(session, &err);
        }
    }
    CommandResult::Continue
}

pub(crate) fn handle_history_info(
    session: &mut Session,
    _invocation: CommandInvocation<'_>,
) -> CommandResult {
    let conversation = session.conversation();
    let info = format!(
        "Current settings:\n- History size: {}\n- Current history length: {}",
        conversation.limit(),
        conversation.len()
    );
    session.emit(info);
    CommandResult::Continue
}
