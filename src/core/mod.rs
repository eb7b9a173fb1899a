pub mod backends;
pub mod builtin_providers;
pub mod catalog;
pub mod config;
pub mod conversation;
pub mod error;
pub mod measured;
pub mod message;
pub mod session;
