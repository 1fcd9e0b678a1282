use clap::{Parser, Subcommand};

use crate::subsystem::Backend;

// ///////////// //
// CLI interface //
// ///////////// //

/// cupsfix - Checks the CUPS printers, reports which ones are paused and enables them again.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// How to reach CUPS. Overrides CUPSFIX_BACKEND.
    #[arg(long, value_enum, global = true)]
    pub backend: Option<Backend>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Checks every printer and enables the paused ones. This is the default.
    Fix {
        /// Only report paused printers, do not enable them.
        #[arg(long)]
        dry_run: bool,
    },
    /// Lists the printers without changing anything.
    List {
        /// Only USB attached printers.
        #[arg(long)]
        usb_only: bool,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Enables a single printer.
    Enable {
        /// Queue name as known to CUPS.
        name: String,
    },
}

impl Cli {
    pub fn resolved_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Fix { dry_run: false })
    }
}
