use clap::ValueEnum;
use serde_derive::Deserialize;
use snafu::Snafu;

pub mod models;

#[cfg(test)]
pub mod fake;

use models::Printer;

/// Which way of reaching the CUPS scheduler to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Talk IPP to the scheduler directly.
    Ipp,
    /// Run the `lpstat`, `cupsenable` and `cupsaccept` tools.
    Command,
}

/// The three things we need from the printing subsystem.
///
/// Every call goes to the subsystem; nothing is cached between calls, so
/// two consecutive listings may disagree if printers were added or removed
/// in the meantime.
pub trait PrintSubsystem {
    /// Every configured printer, in the order the subsystem reports them.
    fn list_all_printers(&self) -> Result<Vec<Printer>, ListError>;

    /// The USB attached printers. Queries the subsystem again.
    fn list_usb_printers(&self) -> Result<Vec<Printer>, ListError> {
        Ok(self.list_all_printers()?.into_iter().filter(|p| p.is_usb).collect())
    }

    /// Whether the printer is started and accepting jobs.
    fn is_enabled(&self, name: &str) -> Result<bool, LookupError>;

    /// Resumes the printer and makes it accept jobs again.
    fn enable(&self, name: &str) -> Result<(), EnableError>;
}

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ListError {
    #[snafu(display("Could not run `{command}`"))]
    ListSpawn {
        command: String,
        source: std::io::Error,
    },
    #[snafu(display("`{command}` failed: {message}"))]
    ListCommand { command: String, message: String },
    #[snafu(display("Could not list printers over IPP"))]
    ListIpp {
        source: crate::cups_client::client::RequestError,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LookupError {
    #[snafu(display("Printer {name} is unknown to CUPS"))]
    UnknownPrinter { name: String },
    #[snafu(display("Could not query printer {name}: {message}"))]
    Query { name: String, message: String },
}

impl LookupError {
    pub fn printer_name(&self) -> &str {
        match self {
            LookupError::UnknownPrinter { name } | LookupError::Query { name, .. } => name,
        }
    }
}

/// Enabling a printer failed; `message` is what the subsystem said about it.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)), display("{message}"))]
pub struct EnableError {
    name: String,
    message: String,
}

impl EnableError {
    pub fn printer_name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
