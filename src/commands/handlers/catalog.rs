use super::{report, require_arity};
use crate::commands::registry::CommandInvocation;
use crate::commands::{model_listing, CommandResult};
use crate::core::session::Session;

pub(crate) fn handle_models(session: &mut Session, invocation: CommandInvocation<'_>) -> CommandResult {
    emit_listing(session, invocation.marker);
    CommandResult::Continue
}

pub(crate) fn handle_model(session: &mut Session, invocation: CommandInvocation<'_>) -> CommandResult {
    if let Err(err) = require_arity(&invocation, 2, "model", "<provider> <model_name>") {
        return report(session, &err);
    }
    let (Some(provider), Some(model)) = (invocation.arg(0), invocation.arg(1)) else {
        return CommandResult::Continue;
    };

    match session.set_selection(provider, model) {
        Ok(()) => {
            let notice = format!("Switched model to {}", session.selection());
            session.emit(notice.clone());
            session.log_notice(notice);
        }
        Err(err) => {
            report(session, &err);
            emit_listing(session, invocation.marker);
        }
    }
    CommandResult::Continue
}

pub(crate) fn handle_current(session: &mut Session, _invocation: CommandInvocation<'_>) -> CommandResult {
    let selection = session.selection().to_string();
    session.emit(format!("Current model: {selection}"));
    session.log_notice(format!("Checked current model: {selection}"));
    CommandResult::Continue
}

fn emit_listing(session: &mut Session, marker: char) {
    let lines = model_listing(session.catalog(), marker);
    for line in lines {
        session.emit(line);
    }
}
