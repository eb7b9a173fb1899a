//! Console layer for interactive chat sessions.
//!
//! [`chat_loop`] reads lines, dispatches them to [`crate::commands`] or the
//! session's message-turn protocol, and writes everything the session queued
//! for display. Domain logic stays in [`crate::core`].

pub mod chat_loop;
