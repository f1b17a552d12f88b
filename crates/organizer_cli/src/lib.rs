//! github-organizer CLI library exports for testing.

pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
