use serde_derive::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Printer {
    pub name: String,
    pub uri: String,
    pub status: String,
    pub is_usb: bool,
}

impl Printer {
    pub fn new(name: impl Into<String>, uri: impl Into<String>, status: impl Into<String>) -> Self {
        let uri = uri.into();
        Printer {
            name: name.into(),
            is_usb: is_usb_uri(&uri),
            uri,
            status: status.into(),
        }
    }
}

/// A device URI points at a USB printer when its scheme is `usb`.
pub fn is_usb_uri(uri: &str) -> bool {
    match uri.split_once(':') {
        Some((scheme, _)) => scheme.eq_ignore_ascii_case("usb"),
        None => false,
    }
}
