use config::{
    builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File, FileFormat,
};
use serde::Deserialize;
use storage::{normalize_database_url, DEFAULT_DATABASE_URL};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
const SETTINGS_FILE: &str = "contacts";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub bind_addr: String,
    pub database_url: String,
    pub seed_demo_contacts: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            database_url: DEFAULT_DATABASE_URL.into(),
            seed_demo_contacts: false,
        }
    }
}

/// Defaults, then `contacts.toml` in the working directory, then `APP__*`
/// variables. Plain `SERVER_BIND`/`DATABASE_URL` apply only when the
/// matching `APP__` variable is unset.
pub fn load_settings() -> anyhow::Result<Settings> {
    let config = defaults()?
        .add_source(File::with_name(SETTINGS_FILE).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;
    let mut settings: Settings = config.try_deserialize()?;

    if std::env::var("APP__BIND_ADDR").is_err() {
        if let Ok(v) = std::env::var("SERVER_BIND") {
            settings.bind_addr = v;
        }
    }
    if std::env::var("APP__DATABASE_URL").is_err() {
        if let Ok(v) = std::env::var("DATABASE_URL") {
            settings.database_url = v;
        }
    }

    settings.database_url = normalize_database_url(&settings.database_url);
    Ok(settings)
}

#[cfg(test)]
fn settings_from_toml(raw: &str) -> anyhow::Result<Settings> {
    let config = defaults()?
        .add_source(File::from_str(raw, FileFormat::Toml))
        .build()?;
    let mut settings: Settings = config.try_deserialize()?;
    settings.database_url = normalize_database_url(&settings.database_url);
    Ok(settings)
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let defaults = Settings::default();
    Config::builder()
        .set_default("bind_addr", defaults.bind_addr)?
        .set_default("database_url", defaults.database_url)?
        .set_default("seed_demo_contacts", defaults.seed_demo_contacts)
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
