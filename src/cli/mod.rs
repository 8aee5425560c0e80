//! CLI module for reactloop - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
