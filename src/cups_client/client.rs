use std::collections::HashMap;

use ipp::model::StatusCode;
use ipp::prelude::*;
use log::debug;
use snafu::{ensure, ResultExt, Snafu};
use url::Url;

use crate::config::models::Cups;
use crate::subsystem::models::Printer;
use crate::subsystem::{
    EnableError, EnableSnafu, ListError, ListIppSnafu, LookupError, PrintSubsystem, QuerySnafu,
    UnknownPrinterSnafu,
};

/// Builds the scheduler URL from the settings, with credentials filled in
/// when both a username and a password are configured.
pub fn build_cups_url(cups_settings: &Cups) -> Result<Url, SetupError> {
    let mut cups_url = Url::parse(&cups_settings.uri).context(InvalidUrlSnafu { uri: &cups_settings.uri })?;
    ensure!(!cups_url.cannot_be_a_base(), NotABaseSnafu { uri: &cups_settings.uri });

    if !cups_settings.username.is_empty() && !cups_settings.password.is_empty() {
        let with_credentials = cups_url
            .set_username(&cups_settings.username)
            .and_then(|_| cups_url.set_password(Some(&cups_settings.password)));
        ensure!(with_credentials.is_ok(), NotABaseSnafu { uri: &cups_settings.uri });
    }

    Ok(cups_url)
}

/// URL of a single print queue below the scheduler URL (`.../printers/<queue>`).
pub fn queue_url(server: &Url, queue: &str) -> Url {
    let mut url = server.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push("printers").push(queue);
    }
    url
}

/// The URL as it may appear in logs and error messages: without password.
pub fn redacted(url: &Url) -> String {
    let mut url = url.clone();
    let _ = url.set_password(None);
    url.to_string()
}

/// Reaches CUPS over IPP.
pub struct IppSubsystem {
    server: Url,
    ignore_tls_errors: bool,
    /// The password as typed and as it appears inside the URL.
    secrets: Vec<String>,
}

impl IppSubsystem {
    pub fn new(cups_settings: &Cups) -> Result<Self, SetupError> {
        let server = build_cups_url(cups_settings)?;
        let secrets = [Some(cups_settings.password.as_str()), server.password()]
            .into_iter()
            .flatten()
            .filter(|secret| !secret.is_empty())
            .map(str::to_string)
            .collect();
        Ok(IppSubsystem {
            server,
            ignore_tls_errors: cups_settings.ignore_tls_errors,
            secrets,
        })
    }

    /// Masks the configured password in text coming back from the transport.
    fn scrub(&self, text: &str) -> String {
        self.secrets.iter().fold(text.to_string(), |text, secret| text.replace(secret.as_str(), "***"))
    }

    /// Send an IPP request to do `op` to the given `uri` and get the response.
    ///
    /// Responses with an unsuccessful status code are turned into errors.
    /// Errors only ever mention the redacted URL.
    fn send_ipp_request(&self, uri: &Url, op: Operation) -> Result<IppRequestResponse, RequestError> {
        let shown = redacted(uri);
        let uri_p = uri.as_str().parse::<Uri>().map_err(|e| RequestError::InvalidUri {
            uri: shown.clone(),
            message: self.scrub(&e.to_string()),
        })?;
        debug!("Sending {:?} to {}", op, shown);

        let req = IppRequestResponse::new(IppVersion::v1_1(), op, Some(uri_p.clone()));
        let client = IppClient::builder(uri_p).ignore_tls_errors(self.ignore_tls_errors).build();
        let resp = client.send(req).map_err(|e| RequestError::Transport {
            uri: shown.clone(),
            message: self.scrub(&e.to_string()),
        })?;

        let status = resp.header().status_code();
        ensure!(
            status.is_success(),
            StatusSnafu { uri: shown, status: format!("{:?}", status), not_found: status == StatusCode::ClientErrorNotFound }
        );
        Ok(resp)
    }
}

impl PrintSubsystem for IppSubsystem {
    fn list_all_printers(&self) -> Result<Vec<Printer>, ListError> {
        let resp = self.send_ipp_request(&self.server, Operation::CupsGetPrinters).context(ListIppSnafu)?;

        let printers = resp
            .attributes()
            .groups_of(DelimiterTag::PrinterAttributes)
            .map(|group| printer_from_attributes(group.attributes()))
            .collect();
        Ok(printers)
    }

    fn is_enabled(&self, name: &str) -> Result<bool, LookupError> {
        let uri = queue_url(&self.server, name);
        let resp = match self.send_ipp_request(&uri, Operation::GetPrinterAttributes) {
            Ok(resp) => resp,
            Err(RequestError::Status { not_found: true, .. }) => return UnknownPrinterSnafu { name }.fail(),
            Err(e) => return QuerySnafu { name, message: e.to_string() }.fail(),
        };

        let group = resp
            .attributes()
            .groups_of(DelimiterTag::PrinterAttributes)
            .next()
            .ok_or_else(|| LookupError::Query {
                name: name.to_string(),
                message: "CUPS returned no printer attributes".to_string(),
            })?;
        Ok(is_enabled_from_attributes(group.attributes()))
    }

    fn enable(&self, name: &str) -> Result<(), EnableError> {
        let uri = queue_url(&self.server, name);
        for op in [Operation::ResumePrinter, Operation::CupsAcceptJobs] {
            self.send_ipp_request(&uri, op)
                .map_err(|e| e.to_string())
                .map_err(|message| EnableSnafu { name, message }.build())?;
        }
        Ok(())
    }
}

fn attribute_string(attributes: &HashMap<String, IppAttribute>, key: &str) -> String {
    attributes.get(key).map(|a| a.value().to_string()).unwrap_or_default()
}

fn printer_state(attributes: &HashMap<String, IppAttribute>) -> Option<PrinterState> {
    attributes
        .get("printer-state")
        .and_then(|a| a.value().as_enum())
        .and_then(|v| PrinterState::from_i32(*v))
}

fn printer_from_attributes(attributes: &HashMap<String, IppAttribute>) -> Printer {
    let status = match printer_state(attributes) {
        Some(PrinterState::Idle) => "idle",
        Some(PrinterState::Processing) => "printing",
        Some(PrinterState::Stopped) => "stopped",
        None => "unknown",
    };
    Printer::new(
        attribute_string(attributes, "printer-name"),
        attribute_string(attributes, "device-uri"),
        status,
    )
}

/// Started and accepting jobs. A missing accepting flag counts as accepting.
fn is_enabled_from_attributes(attributes: &HashMap<String, IppAttribute>) -> bool {
    let stopped = matches!(printer_state(attributes), Some(PrinterState::Stopped));
    let accepting = match attributes.get("printer-is-accepting-jobs").map(|a| a.value()) {
        Some(IppValue::Boolean(accepting)) => *accepting,
        _ => true,
    };
    !stopped && accepting
}

// ////// //
// Errors //
// ////// //

#[derive(Debug, Snafu)]
pub enum SetupError {
    #[snafu(display("Invalid CUPS URI {uri}"))]
    InvalidUrl { uri: String, source: url::ParseError },
    #[snafu(display("CUPS URI {uri} cannot hold printer paths or credentials"))]
    NotABase { uri: String },
}

#[derive(Debug, Snafu)]
pub enum RequestError {
    #[snafu(display("Invalid URI {uri}: {message}"))]
    InvalidUri { uri: String, message: String },
    #[snafu(display("IPP request to {uri} failed: {message}"))]
    Transport { uri: String, message: String },
    #[snafu(display("CUPS answered {status} for {uri}"))]
    Status { uri: String, status: String, not_found: bool },
}
