use std::cell::RefCell;

use super::models::Printer;
use super::{EnableError, ListError, LookupError, PrintSubsystem};

struct FakePrinter {
    printer: Printer,
    enabled: bool,
    enable_failure: Option<String>,
    vanished: bool,
}

/// In-memory printing subsystem that records what was asked of it.
#[derive(Default)]
pub struct FakeSubsystem {
    printers: RefCell<Vec<FakePrinter>>,
    list_failure: Option<String>,
    pub lookups: RefCell<Vec<String>>,
    pub enables: RefCell<Vec<String>>,
}

impl FakeSubsystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable(message: &str) -> Self {
        FakeSubsystem {
            list_failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn with_printer(self, name: &str, uri: &str, status: &str, enabled: bool) -> Self {
        self.printers.borrow_mut().push(FakePrinter {
            printer: Printer::new(name, uri, status),
            enabled,
            enable_failure: None,
            vanished: false,
        });
        self
    }

    /// Makes `enable` for the given printer fail with `message`.
    pub fn failing_enable(self, name: &str, message: &str) -> Self {
        if let Some(p) = self.printers.borrow_mut().iter_mut().find(|p| p.printer.name == name) {
            p.enable_failure = Some(message.to_string());
        }
        self
    }

    /// Keeps the printer in listings but makes status lookups fail.
    pub fn vanishing(self, name: &str) -> Self {
        if let Some(p) = self.printers.borrow_mut().iter_mut().find(|p| p.printer.name == name) {
            p.vanished = true;
        }
        self
    }
}

impl PrintSubsystem for FakeSubsystem {
    fn list_all_printers(&self) -> Result<Vec<Printer>, ListError> {
        if let Some(message) = &self.list_failure {
            return Err(ListError::ListCommand {
                command: "lpstat -v".to_string(),
                message: message.clone(),
            });
        }
        Ok(self.printers.borrow().iter().map(|p| p.printer.clone()).collect())
    }

    fn is_enabled(&self, name: &str) -> Result<bool, LookupError> {
        self.lookups.borrow_mut().push(name.to_string());
        self.printers
            .borrow()
            .iter()
            .find(|p| p.printer.name == name && !p.vanished)
            .map(|p| p.enabled)
            .ok_or_else(|| LookupError::UnknownPrinter { name: name.to_string() })
    }

    fn enable(&self, name: &str) -> Result<(), EnableError> {
        self.enables.borrow_mut().push(name.to_string());
        let mut printers = self.printers.borrow_mut();
        let Some(p) = printers.iter_mut().find(|p| p.printer.name == name) else {
            return Err(EnableError {
                name: name.to_string(),
                message: format!("cupsenable: Invalid destination name \"{name}\""),
            });
        };
        if let Some(message) = &p.enable_failure {
            return Err(EnableError {
                name: name.to_string(),
                message: message.clone(),
            });
        }
        p.enabled = true;
        Ok(())
    }
}
