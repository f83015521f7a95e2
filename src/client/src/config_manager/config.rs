use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use config::{Config as RConfig, Environment, File};
use forwarder_common::constants::{DEFAULT_PORT, DEFAULT_TRANSPORT, DEFAULT_TTL};

const ENV_PREFIX: &str = "RIEMANN";

/// Process-wide publishing options; per-destination descriptors may override
/// `port` and `transport`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct PublisherDefaults {
    pub port: u16,
    pub transport: String,
    pub default_ttl: u64,
}

impl Default for PublisherDefaults {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            transport: DEFAULT_TRANSPORT.to_string(),
            default_ttl: DEFAULT_TTL,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn load_default_config() -> Result<PublisherDefaults> {
        Self::load_config(None)
    }

    /// Defaults, then the optional TOML file, then `RIEMANN_*` environment variables.
    pub fn load_config(path: Option<&str>) -> Result<PublisherDefaults> {
        let mut builder = RConfig::builder()
            .set_default("port", DEFAULT_PORT as i64)?
            .set_default("transport", DEFAULT_TRANSPORT)?
            .set_default("default_ttl", DEFAULT_TTL as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: PublisherDefaults = builder
            .build()?
            .try_deserialize()
            .context("failed to parse publisher configuration")?;

        Ok(config)
    }
}
