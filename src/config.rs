use crate::error::Error;
use crate::fingerprint::FingerprintAlgorithm;
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::env;

pub const DEFAULT_DATABASE_URL: &str = "pdf_duper.db";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    #[serde(default)]
    pub fingerprint: FingerprintAlgorithm,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_pool_size() -> u32 {
    4
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// Config for a given database with every other field at its default.
    pub fn with_database_url(database_url: &str) -> Self {
        AppConfig {
            database_url: database_url.to_string(),
            fingerprint: FingerprintAlgorithm::default(),
            pool_size: default_pool_size(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }

    /// Database URL with any password replaced, for display.
    pub fn masked_database_url(&self) -> String {
        mask_password(&self.database_url)
    }
}

/// Layering, lowest first: built-in defaults, `Config.toml`, `PDF_DUPER_*`
/// variables, then `DATABASE_URL`.
pub fn load_configuration() -> Result<AppConfig, Error> {
    load_configuration_from("Config")
}

/// As `load_configuration`, reading the optional config file at `file`.
pub fn load_configuration_from(file: &str) -> Result<AppConfig, Error> {
    let builder = Config::builder()
        .set_default("database_url", DEFAULT_DATABASE_URL)?
        .add_source(ConfigFile::with_name(file).required(false))
        .add_source(Environment::with_prefix("PDF_DUPER").try_parsing(true))
        .set_override_option("database_url", env::var("DATABASE_URL").ok())?
        .build()?;
    Ok(builder.try_deserialize::<AppConfig>()?)
}

fn mask_password(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    let Some((userinfo, host)) = rest.rsplit_once('@') else {
        return url.to_string();
    };
    match userinfo.split_once(':') {
        Some((user, _)) => format!("{}://{}:****@{}", scheme, user, host),
        None => url.to_string(),
    }
}
