use serde_derive::Deserialize;

use crate::subsystem::Backend;

// When changing anything here, make sure to add
// #[serde(alias = "ihavenounderscores")]
// where needed, so it can be read from the ENV vars.

#[derive(Debug, Clone, Deserialize)]
pub struct Cups {
    pub uri: String,
    #[serde(alias = "ignoretlserrors")]
    pub ignore_tls_errors: bool,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub backend: Backend,
    pub cups: Cups,
    #[serde(alias = "sentrydsn")]
    pub sentry_dsn: Option<String>,
}

impl Settings {
    /// The configured DSN, unless it was left empty.
    pub fn sentry_dsn(&self) -> Option<&str> {
        self.sentry_dsn.as_deref().filter(|dsn| !dsn.is_empty())
    }
}
