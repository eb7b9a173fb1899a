use super::CommandResult;
use crate::core::session::Session;

pub type CommandHandler = fn(&mut Session, CommandInvocation<'_>) -> CommandResult;

pub struct Command {
    pub name: &'static str,
    pub usage_args: Option<&'static str>,
    pub help: &'static str,
    pub handler: CommandHandler,
}

impl Command {
    /// Usage line rendered with the session's command marker.
    pub fn usage(&self, marker: char) -> String {
        match self.usage_args {
            Some(args) => format!("{marker}{} {args}", self.name),
            None => format!("{marker}{}", self.name),
        }
    }
}

#[derive(Clone, Copy)]
pub struct CommandInvocation<'a> {
    pub marker: char,
    pub input: &'a str,
    pub args: &'a str,
}

impl<'a> CommandInvocation<'a> {
    pub fn arg(&self, index: usize) -> Option<&'a str> {
        self.args.split_whitespace().nth(index)
    }

    pub fn arg_count(&self) -> usize {
        self.args.split_whitespace().count()
    }
}

pub fn all_commands() -> &'static [Command] {
    COMMANDS
}

pub fn find_command(name: &str) -> Option<&'static Command> {
    all_commands()
        .iter()
        .find(|command| command.name.eq_ignore_ascii_case(name))
}

const COMMANDS: &[Command] = &[
    Command {
        name: "models",
        usage_args: None,
        help: "List every provider and its models.",
        handler: super::handlers::catalog::handle_models,
    },
    Command {
        name: "model",
        usage_args: Some("<provider> <model_name>"),
        help: "Switch to another provider and model.",
        handler: super::handlers::catalog::handle_model,
    },
    Command {
        name: "current",
        usage_args: None,
        help: "Show the current model.",
        handler: super::handlers::catalog::handle_current,
    },
    Command {
        name: "history_size",
        usage_args: Some("<number>"),
        help: "Set how many turns of history are kept.",
        handler: super::handlers::history::handle_history_size,
    },
    Command {
        name: "history_info",
        usage_args: None,
        help: "Show the history settings.",
        handler: super::handlers::history::handle_history_info,
    },
    Command {
        name: "help",
        usage_args: None,
        help: "Show this help.",
        handler: super::handlers::core::handle_help,
    },
    Command {
        name: "quit",
        usage_args: None,
        help: "End the chat.",
        handler: super::handlers::core::handle_quit,
    },
];
