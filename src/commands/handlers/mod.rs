pub(super) mod catalog;
pub(super) mod core;
pub(super) mod history;

use crate::commands::registry::CommandInvocation;
use crate::commands::CommandResult;
use crate::core::error::SessionError;
use crate::core::session::Session;

/// Print a failure and carry on; state is left untouched.
pub(super) fn report(session: &mut Session, err: &SessionError) -> CommandResult {
    session.emit(format!("❌ {err}"));
    CommandResult::Continue
}

/// Reject the invocation unless it has exactly `expected` arguments.
pub(super) fn require_arity(
    invocation: &CommandInvocation<'_>,
    expected: usize,
    command: &str,
    usage_args: &str,
) -> Result<(), SessionError> {
    if invocation.arg_count() == expected {
        return Ok(());
    }
    Err(SessionError::BadArity {
        usage: format!("{}{command} {usage_args}", invocation.marker),
    })
}
