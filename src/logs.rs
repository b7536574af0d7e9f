// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Log Sinks
//!
//! Installs the global `tracing` subscriber. Two files receive the events:
//! the info log gets everything from INFO up, the error log only ERROR.
//! In verbose mode the same lines are mirrored to stdout.

use crate::{config::LogsConfig, errors::ConfigError};
use std::{
    fs::{File, OpenOptions},
    sync::Arc,
};
use tracing::{level_filters::LevelFilter, Subscriber};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, Layer, Registry,
};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Options for building the subscriber.
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub verbose: bool,
    pub no_datetime: bool,
}

/// Opens `path` for appending, creating it when missing.
pub fn open_sink(path: &str) -> Result<File, ConfigError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| ConfigError::LogSinkError {
            path: path.to_owned(),
            reason: err.to_string(),
        })
}

fn sink_layer<S>(file: File, level: LevelFilter, opts: &LogOptions) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_writer(Arc::new(file));

    if opts.no_datetime {
        layer.without_time().with_filter(level).boxed()
    } else {
        layer.with_filter(level).boxed()
    }
}

fn stdout_layer<S>(opts: &LogOptions) -> BoxedLayer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    let layer = fmt::layer().with_target(false);

    if opts.no_datetime {
        layer.without_time().with_filter(LevelFilter::INFO).boxed()
    } else {
        layer.with_filter(LevelFilter::INFO).boxed()
    }
}

/// Builds the layers for the configured sinks without installing them.
pub fn layers(cfg: &LogsConfig, opts: &LogOptions) -> Result<Vec<BoxedLayer<Registry>>, ConfigError> {
    let mut layers = vec![
        sink_layer(open_sink(&cfg.info)?, LevelFilter::INFO, opts),
        sink_layer(open_sink(&cfg.error)?, LevelFilter::ERROR, opts),
    ];

    if opts.verbose {
        layers.push(stdout_layer(opts));
    }

    Ok(layers)
}

/// Installs the global subscriber.
pub fn init(cfg: &LogsConfig, opts: &LogOptions) -> Result<(), ConfigError> {
    tracing_subscriber::registry()
        .with(layers(cfg, opts)?)
        .try_init()
        .map_err(|_| ConfigError::LoggerAlreadySet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tracing::{error, info};

    #[test]
    fn routes_levels_to_their_sinks() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = LogsConfig {
            info: dir.path().join("info.log").display().to_string(),
            error: dir.path().join("error.log").display().to_string(),
        };
        let opts = LogOptions {
            verbose: false,
            no_datetime: true,
        };

        let subscriber = tracing_subscriber::registry().with(layers(&cfg, &opts).unwrap());
        tracing::subscriber::with_default(subscriber, || {
            info!("processing message...");
            error!("failed: exit status 1");
        });

        let info = fs::read_to_string(&cfg.info).unwrap();
        let error = fs::read_to_string(&cfg.error).unwrap();
        assert!(info.contains("processing message..."));
        assert!(info.contains("failed: exit status 1"));
        assert!(!error.contains("processing message..."));
        assert!(error.contains("failed: exit status 1"));
    }

    #[test]
    fn appends_to_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("info.log");
        fs::write(&path, "previous line\n").unwrap();

        let mut file = open_sink(&path.display().to_string()).unwrap();
        std::io::Write::write_all(&mut file, b"next line\n").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "previous line\nnext line\n"
        );
    }

    #[test]
    fn unwritable_sink_is_an_error() {
        let err = open_sink("/nonexistent/dir/info.log").unwrap_err();

        assert!(matches!(err, ConfigError::LogSinkError { .. }));
    }
}
