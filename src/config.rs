// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Configuration
//!
//! The consumer is configured from an INI file with the sections `rabbitmq`,
//! `prefetch`, `exchange`, `queuesettings` and `logs`. Every section and key is
//! optional. Booleans accept `On`/`Off` as well as `true`/`false`.
//!
//! Environment overrides are applied by [`override_from_env`], a pure function
//! over an explicit snapshot of variables, so callers decide where the
//! variables come from (`std::env::vars()` in the binary, literals in tests).

use crate::errors::ConfigError;
use ::config::{File, FileFormat};
use serde::Deserialize;
use std::{ffi::OsString, path::Path};

pub const ENV_HOST: &str = "RMQ_HOST";
pub const ENV_USER: &str = "RMQ_USER";
pub const ENV_PASSWORD: &str = "RMQ_PASSWORD";
pub const ENV_PORT: &str = "RMQ_PORT";
pub const ENV_VHOST: &str = "RMQ_VHOST";
pub const ENV_QUEUE: &str = "RMQ_QUEUE";
pub const ENV_EXCHANGE: &str = "RMQ_EXCHANGE";
pub const ENV_ROUTING_KEY: &str = "RMQ_ROUTING_KEY";
pub const ENV_LOG_INFO: &str = "RMQ_LOG_INFO";
pub const ENV_LOG_ERR: &str = "RMQ_LOG_ERR";

/// Complete runtime configuration, immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rabbitmq: RabbitMqConfig,
    pub prefetch: PrefetchConfig,
    pub exchange: ExchangeConfig,
    pub queuesettings: QueueSettingsConfig,
    pub logs: LogsConfig,
}

/// Broker credentials, location and the queue to consume.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RabbitMqConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub port: u16,
    pub vhost: String,
    pub queue: String,
    pub compression: bool,
}

impl Default for RabbitMqConfig {
    fn default() -> Self {
        RabbitMqConfig {
            host: "localhost".to_owned(),
            username: String::new(),
            password: String::new(),
            port: 5672,
            vhost: "/".to_owned(),
            queue: String::new(),
            compression: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PrefetchConfig {
    pub count: u16,
    pub global: bool,
}

/// Exchange to declare and bind the queue to. An empty name skips both steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub durable: bool,
    pub autodelete: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QueueSettingsConfig {
    pub routingkey: String,
}

/// Paths of the error and info log files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogsConfig {
    pub error: String,
    pub info: String,
}

impl Config {
    /// Loads the configuration from an INI file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let display = path.display().to_string();

        let settings = ::config::Config::builder()
            .add_source(File::new(&display, FileFormat::Ini).required(true))
            .build()
            .map_err(|err| ConfigError::FileError {
                path: display.clone(),
                reason: err.to_string(),
            })?;

        settings
            .try_deserialize()
            .map_err(|err| ConfigError::FileError {
                path: display,
                reason: err.to_string(),
            })
    }

    /// Parses the configuration from INI text.
    pub fn from_ini_str(content: &str) -> Result<Config, ConfigError> {
        ::config::Config::builder()
            .add_source(File::from_str(content, FileFormat::Ini))
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|err| ConfigError::FileError {
                path: "<inline>".to_owned(),
                reason: err.to_string(),
            })
    }
}

/// Applies the `RMQ_*` environment overrides to `cfg`.
///
/// A variable only overrides its field when it is set to a non-empty value.
/// Unrelated variables are ignored.
pub fn override_from_env<I, K, V>(mut cfg: Config, vars: I) -> Result<Config, ConfigError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    for (name, value) in vars {
        let value: String = value.into();
        if value.is_empty() {
            continue;
        }

        match name.as_ref() {
            ENV_HOST => cfg.rabbitmq.host = value,
            ENV_USER => cfg.rabbitmq.username = value,
            ENV_PASSWORD => cfg.rabbitmq.password = value,
            ENV_PORT => {
                cfg.rabbitmq.port = value.parse().map_err(|_| ConfigError::InvalidEnv {
                    name: ENV_PORT.to_owned(),
                    value: value.clone(),
                })?
            }
            ENV_VHOST => cfg.rabbitmq.vhost = value,
            ENV_QUEUE => cfg.rabbitmq.queue = value,
            ENV_EXCHANGE => cfg.exchange.name = value,
            ENV_ROUTING_KEY => cfg.queuesettings.routingkey = value,
            ENV_LOG_INFO => cfg.logs.info = value,
            ENV_LOG_ERR => cfg.logs.error = value,
            _ => {}
        }
    }

    Ok(cfg)
}

/// Keeps the variables whose name and value are both valid UTF-8.
///
/// Feed it `std::env::vars_os()`: unlike `std::env::vars()` it does not panic
/// when an unrelated variable holds arbitrary bytes.
pub fn utf8_vars<I>(vars: I) -> impl Iterator<Item = (String, String)>
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    vars.into_iter()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
}
