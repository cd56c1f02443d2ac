//! sistation library - parameterized SQL execution over a single-file database
//!
//! Provides connection provisioning, command execution with result strategies,
//! JSON and worksheet bridges, and output formatting for the `sistation` CLI.

pub mod bridge;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod output;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
