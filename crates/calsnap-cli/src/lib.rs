//! calsnap CLI: extraction commands, stored events, calendar export.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod store;
