use std::io::Write;

use log::{debug, info, warn};
use snafu::{ResultExt, Snafu};

use crate::subsystem::models::Printer;
use crate::subsystem::{EnableError, ListError, LookupError, PrintSubsystem};

pub mod report;

#[derive(Debug, Clone, Copy, Default)]
pub struct FixOptions {
    /// Report paused printers without enabling them.
    pub dry_run: bool,
}

/// What happened to one printer during the main pass.
#[derive(Debug)]
pub enum PrinterOutcome {
    Ready,
    Enabled,
    Skipped,
    EnableFailed(EnableError),
    LookupFailed(LookupError),
}

#[derive(Debug, Default)]
pub struct FixReport {
    pub printers: Vec<(Printer, PrinterOutcome)>,
    /// USB printers with their state at summary time; `None` when it could not be read.
    pub usb_summary: Vec<(Printer, Option<bool>)>,
}

/// Checks every printer, enables the paused ones and writes the report to `out`.
///
/// Problems with a single printer are written into the report and do not stop
/// the pass. Only a failing listing ends it early.
pub fn fix_printers<S, W>(subsystem: &S, out: &mut W, options: FixOptions) -> Result<FixReport, FixError>
where
    S: PrintSubsystem + ?Sized,
    W: Write,
{
    let printers = subsystem.list_all_printers().context(ListSnafu)?;
    let mut fix_report = FixReport::default();

    if printers.is_empty() {
        info!("CUPS has no printers configured.");
        report::write_no_printers(out).context(OutputSnafu)?;
        return Ok(fix_report);
    }

    report::write_found(out, printers.len()).context(OutputSnafu)?;
    for printer in printers {
        report::write_printer(out, &printer).context(OutputSnafu)?;
        let outcome = check_printer(subsystem, out, &printer, options)?;
        writeln!(out).context(OutputSnafu)?;
        fix_report.printers.push((printer, outcome));
    }

    let usb_printers = subsystem.list_usb_printers().context(ListSnafu)?;
    if !usb_printers.is_empty() {
        for printer in usb_printers {
            let enabled = match subsystem.is_enabled(&printer.name) {
                Ok(enabled) => Some(enabled),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            };
            fix_report.usb_summary.push((printer, enabled));
        }
        report::write_usb_summary(out, &fix_report.usb_summary).context(OutputSnafu)?;
    }

    report::write_tip(out).context(OutputSnafu)?;
    Ok(fix_report)
}

fn check_printer<S, W>(subsystem: &S, out: &mut W, printer: &Printer, options: FixOptions) -> Result<PrinterOutcome, FixError>
where
    S: PrintSubsystem + ?Sized,
    W: Write,
{
    let enabled = match subsystem.is_enabled(&printer.name) {
        Ok(enabled) => enabled,
        Err(e) => {
            warn!("{}", e);
            report::write_lookup_failed(out, &e).context(OutputSnafu)?;
            return Ok(PrinterOutcome::LookupFailed(e));
        }
    };

    if enabled {
        report::write_ready(out).context(OutputSnafu)?;
        return Ok(PrinterOutcome::Ready);
    }

    report::write_paused(out, options.dry_run).context(OutputSnafu)?;
    if options.dry_run {
        return Ok(PrinterOutcome::Skipped);
    }

    debug!("Enabling printer {}", printer.name);
    match subsystem.enable(&printer.name) {
        Ok(()) => {
            info!("Enabled printer {}", printer.name);
            report::write_enabled(out).context(OutputSnafu)?;
            Ok(PrinterOutcome::Enabled)
        }
        Err(e) => {
            warn!("Could not enable printer {}: {}", printer.name, e);
            report::write_enable_failed(out, &e).context(OutputSnafu)?;
            Ok(PrinterOutcome::EnableFailed(e))
        }
    }
}

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu)]
pub enum FixError {
    #[snafu(display("Could not list printers"))]
    List { source: ListError },
    #[snafu(display("Could not write the report"))]
    Output { source: std::io::Error },
}
