//! multichat is a line-oriented console chat client that talks to several LLM
//! providers and lets the user switch between them mid-conversation.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session: model catalog and backends, the bounded
//!   conversation history, the message-turn protocol, and configuration.
//! - [`commands`] implements slash-command parsing and the command table.
//! - [`ui`] runs the session loop over a line-oriented console.
//! - [`api`] defines the request/response payloads of each provider API.
//! - [`utils`] holds the audit logger plus URL, auth header, and input helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which prepares a [`core::session::Session`]
//! and drives it with [`ui::chat_loop::run_chat`].

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
