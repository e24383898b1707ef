//! Defines the command-line arguments and subcommands for the unexpect CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "unexpect",
    version,
    about = "Migrates declarative exception-expectation test annotations to explicit throw assertions."
)]
pub struct UnexpectArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute rewrite plans for a migration request and emit them as JSON.
    Plan {
        /// A request file, or a directory searched for *.json request files.
        #[arg(required = true)]
        path: PathBuf,
        /// Only process test methods whose name matches this regex.
        #[arg(long)]
        filter: Option<String>,
        /// Pretty-print the emitted JSON.
        #[arg(long)]
        pretty: bool,
    },
    /// Show each rewrite as a colored before/after diff.
    Preview {
        /// A request file, or a directory searched for *.json request files.
        #[arg(required = true)]
        path: PathBuf,
        /// Only process test methods whose name matches this regex.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Validate a request without rewriting; report errors and warnings.
    Check {
        /// A request file, or a directory searched for *.json request files.
        #[arg(required = true)]
        path: PathBuf,
        /// Only process test methods whose name matches this regex.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Parse attribute text and print the extracted argument model.
    Args {
        /// Attribute section text, e.g. '[Test, ExpectedException(typeof(X))]'.
        #[arg(required = true)]
        attribute: String,
    },
}
