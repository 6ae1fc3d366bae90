//! Tessera CLI - inspect and probe connection settings.
//!
//! This crate provides the `tessera` binary, which derives the connection
//! URI from a `tessera.toml` settings file and can check that the database
//! answers.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
