use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use snafu::{Report, ResultExt, Snafu};

use crate::cli::{Cli, Commands};
use crate::config::models::Settings;
use crate::cups_client::client::{IppSubsystem, SetupError};
use crate::fixer::{FixError, FixOptions, PrinterOutcome};
use crate::lpstat_client::client::CommandSubsystem;
use crate::subsystem::{Backend, EnableError, ListError, PrintSubsystem};

mod cli;
mod config;
mod cups_client;
mod fixer;
mod lpstat_client;
mod subsystem;

fn main() -> ExitCode {
    colog::init();
    let cli = Cli::parse();

    let settings = match config::loading::load_config() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Could not load configuration: {}", Report::from_error(e));
            return ExitCode::FAILURE;
        }
    };
    let _sentry = init_sentry(&settings);

    match run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            sentry::capture_error(&e);
            error!("{}", Report::from_error(e));
            ExitCode::FAILURE
        }
    }
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    settings.sentry_dsn().map(|dsn| {
        sentry::init((dsn, sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        }))
    })
}

fn build_subsystem(backend: Backend, settings: &Settings) -> Result<Box<dyn PrintSubsystem>, SetupError> {
    Ok(match backend {
        Backend::Ipp => Box::new(IppSubsystem::new(&settings.cups)?),
        Backend::Command => Box::new(CommandSubsystem::new()),
    })
}

fn run(cli: &Cli, settings: &Settings) -> Result<(), AppError> {
    let backend = cli.backend.unwrap_or(settings.backend);
    let subsystem = build_subsystem(backend, settings).context(SetupSnafu)?;
    let mut stdout = io::stdout().lock();

    match cli.resolved_command() {
        Commands::Fix { dry_run } => {
            let fix_report = fixer::fix_printers(subsystem.as_ref(), &mut stdout, FixOptions { dry_run }).context(FixSnafu)?;
            let enabled = fix_report.printers.iter().filter(|(_, o)| matches!(o, PrinterOutcome::Enabled)).count();
            let problems: Vec<&str> = fix_report
                .printers
                .iter()
                .filter_map(|(_, o)| match o {
                    PrinterOutcome::EnableFailed(e) => Some(e.printer_name()),
                    PrinterOutcome::LookupFailed(e) => Some(e.printer_name()),
                    _ => None,
                })
                .collect();
            info!(
                "Checked {} printer(s): {} enabled, {} with problems {:?}.",
                fix_report.printers.len(),
                enabled,
                problems.len(),
                problems
            );
        }
        Commands::List { usb_only, json } => {
            let printers = if usb_only {
                subsystem.list_usb_printers()
            } else {
                subsystem.list_all_printers()
            }
            .context(ListSnafu)?;

            if json {
                serde_json::to_writer_pretty(&mut stdout, &printers).context(JsonSnafu)?;
                writeln!(stdout).context(OutputSnafu)?;
            } else {
                fixer::report::write_table(&mut stdout, &printers).context(OutputSnafu)?;
            }
        }
        Commands::Enable { name } => {
            subsystem.enable(&name).context(EnableSnafu)?;
            writeln!(stdout, "Printer {name} has been enabled.").context(OutputSnafu)?;
        }
    }

    Ok(())
}

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu)]
enum AppError {
    #[snafu(display("Could not set up the CUPS connection"))]
    Setup { source: SetupError },
    #[snafu(display("Checking printers failed"))]
    Fix { source: FixError },
    #[snafu(display("Could not list printers"))]
    List { source: ListError },
    #[snafu(display("Could not enable printer {}", source.printer_name()))]
    Enable { source: EnableError },
    #[snafu(display("Could not encode printers as JSON"))]
    Json { source: serde_json::Error },
    #[snafu(display("Could not write to stdout"))]
    Output { source: io::Error },
}
