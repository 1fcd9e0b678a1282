use std::io::{self, Write};

use crate::subsystem::models::Printer;
use crate::subsystem::{EnableError, LookupError};

pub const TIP_COMMAND: &str = "lpadmin -p YourPrinterName -o printer-error-policy=retry-job";

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

pub fn write_no_printers(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "No printers found")
}

pub fn write_found(out: &mut impl Write, count: usize) -> io::Result<()> {
    writeln!(out, "Found {count} printer(s):")?;
    writeln!(out)
}

pub fn write_printer(out: &mut impl Write, printer: &Printer) -> io::Result<()> {
    writeln!(out, "{}", printer.name)?;
    writeln!(out, "   URI: {}", printer.uri)?;
    writeln!(out, "   Status: {}", printer.status)?;
    writeln!(out, "   USB: {}", yes_no(printer.is_usb))
}

pub fn write_ready(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "   Printer is ready and accepting jobs")
}

pub fn write_paused(out: &mut impl Write, dry_run: bool) -> io::Result<()> {
    writeln!(out, "   Printer is PAUSED/DISABLED")?;
    if dry_run {
        writeln!(out, "   Dry run, leaving it paused")
    } else {
        writeln!(out, "   Attempting to enable...")
    }
}

pub fn write_enabled(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "   Printer has been ENABLED successfully")
}

pub fn write_enable_failed(out: &mut impl Write, error: &EnableError) -> io::Result<()> {
    writeln!(out, "   Failed to enable {}: {}", error.printer_name(), error.message())
}

pub fn write_lookup_failed(out: &mut impl Write, error: &LookupError) -> io::Result<()> {
    writeln!(out, "   Could not read the state of {}: {}", error.printer_name(), error)
}

pub fn write_usb_summary(out: &mut impl Write, rows: &[(Printer, Option<bool>)]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "USB printer summary:")?;
    for (printer, enabled) in rows {
        let verdict = match enabled {
            Some(true) => "Ready  ",
            Some(false) => "Paused ",
            None => "Unknown",
        };
        writeln!(out, "   {verdict} - {}", printer.name)?;
    }
    Ok(())
}

pub fn write_tip(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Tip: to keep printers from pausing themselves after an error, run:")?;
    writeln!(out, "   {TIP_COMMAND}")
}

/// One line per printer, for the `list` command.
pub fn write_table(out: &mut impl Write, printers: &[Printer]) -> io::Result<()> {
    if printers.is_empty() {
        return write_no_printers(out);
    }
    let width = printers.iter().map(|p| p.name.len()).max().unwrap_or_default();
    for printer in printers {
        let usb = if printer.is_usb { "usb" } else { "" };
        writeln!(out, "{:width$}  {:10}  {:3}  {}", printer.name, printer.status, usb, printer.uri)?;
    }
    Ok(())
}
