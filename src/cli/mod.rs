//! CLI module for ParentBuddy
//!
//! Handles command-line argument parsing and flag overrides.

pub mod args;

pub use args::{Args, Commands, Verbosity};
