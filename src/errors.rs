// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Error Types
//!
//! `AmqpError` covers everything that can go wrong while talking to the broker:
//! connecting, opening a channel, configuring it and starting consumption.
//! `ConfigError` covers the startup inputs: the configuration file, environment
//! overrides, the executable flag and the log sinks.
//!
//! Per-message failures (decompression, command execution, ack/nack) never
//! surface as errors to the caller; they are logged with the broker's own
//! `lapin::Error` and expressed through the delivery's disposition.

use thiserror::Error;

/// Represents errors that can occur during AMQP/RabbitMQ operations.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmqpError {
    /// Error establishing a connection to the RabbitMQ server
    #[error("failure to connect")]
    ConnectionError,

    /// Error creating a channel from an established connection
    #[error("failure to create a channel")]
    ChannelError,

    /// Error configuring Quality of Service parameters
    #[error("failure to configure qos `{0}`")]
    QoSDeclarationError(String),

    /// Error declaring a queue with the given name
    #[error("failure to declare a queue `{0}`: {1}")]
    DeclareQueueError(String, String),

    /// Error declaring an exchange with the given name
    #[error("failure to declare an exchange `{0}`: {1}")]
    DeclareExchangeError(String, String),

    /// Error binding a queue to an exchange
    #[error("failure to bind queue `{0}` to exchange `{1}`: {2}")]
    BindingExchangeToQueueError(String, String, String),

    /// Error registering a consumer on a queue
    #[error("failure to declare consumer `{0}`")]
    BindingConsumerError(String),

    /// The broker closed the delivery stream of a queue
    #[error("consumer stream closed for queue `{0}`")]
    ConsumerClosed(String),
}

/// Errors raised while assembling the runtime inputs before any broker call.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failure to read configuration `{path}`: {reason}")]
    FileError { path: String, reason: String },

    #[error("invalid value `{value}` for environment variable `{name}`")]
    InvalidEnv { name: String, value: String },

    #[error("executable must not be empty")]
    EmptyExecutable,

    #[error("failure to open log file `{path}`: {reason}")]
    LogSinkError { path: String, reason: String },

    #[error("logger already installed")]
    LoggerAlreadySet,
}
