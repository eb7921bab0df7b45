//! CLI argument definitions for the Vista tool.

use clap::{Parser, Subcommand};

/// Command-line interface for inspecting installed renderer plugins.
#[derive(Parser, Debug)]
#[command(name = "vista", disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// The operation to run.
    #[command(subcommand)]
    pub(crate) command: CliCommand,
}

/// Operations supported by the CLI.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub(crate) enum CliCommand {
    /// Lists every loaded plugin.
    List,
    /// Prints one plugin's descriptor as JSON.
    Show {
        /// Plugin name.
        name: String,
    },
    /// Reports plugins that failed to load; exits non-zero when any did.
    Check,
}
