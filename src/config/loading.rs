use config::{Config, ConfigError, Environment};
use log::debug;

use super::models::Settings;

pub const ENV_PREFIX: &str = "CUPSFIX";

pub fn load_config() -> Result<Settings, ConfigError> {
    // As Rust has no native support for .env files,
    // we use the dotenv_flow crate to import to actual ENV vars.
    if let Ok(dotenv_path) = dotenv_flow::dotenv_flow() {
        debug!("Loaded dotenv file: {:?}", dotenv_path);
    }

    build_config(Environment::default())
}

fn build_config(environment: Environment) -> Result<Settings, ConfigError> {
    Config::builder()
        .add_source(environment
            .prefix(ENV_PREFIX)
            .separator("_")
            .prefix_separator("_")
            .try_parsing(true))
        .set_default("backend", "command")?
        .set_default("cups.uri", "ipp://localhost:631/")?
        .set_default("cups.ignoretlserrors", "false")?
        .set_default("cups.username", "")?
        .set_default("cups.password", "")?
        .set_default("sentrydsn", "")?
        .build()?
        .try_deserialize()
}
