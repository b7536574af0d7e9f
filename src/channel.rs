// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # AMQP Channel Management
//!
//! This module opens the connection and the single channel the consumer works
//! on, and defines `SetupChannel`: the narrow set of broker operations the
//! initializer needs. `lapin::Channel` implements it for production; tests
//! substitute a mock.

use crate::{config::Config, errors::AmqpError, exchange::ExchangeKind, uri::build_uri};
use async_trait::async_trait;
use lapin::{
    options::{BasicQosOptions, ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions},
    types::{FieldTable, LongString},
    Channel, Connection, ConnectionProperties,
};
use std::sync::Arc;
use tracing::{debug, error};

/// Name the connection is registered under on the broker side.
pub const CONNECTION_NAME: &str = "rabbitmq-cli-consumer";

/// Broker operations used to prepare a channel for consumption.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SetupChannel: Send + Sync {
    /// Limits the number of unacknowledged deliveries.
    async fn qos(
        &self,
        prefetch_count: u16,
        prefetch_size: u32,
        global: bool,
    ) -> Result<(), lapin::Error>;

    async fn queue_declare(
        &self,
        name: &str,
        options: QueueDeclareOptions,
        arguments: FieldTable,
    ) -> Result<(), lapin::Error>;

    async fn exchange_declare(
        &self,
        name: &str,
        kind: &ExchangeKind,
        options: ExchangeDeclareOptions,
        arguments: FieldTable,
    ) -> Result<(), lapin::Error>;

    async fn queue_bind(
        &self,
        queue: &str,
        exchange: &str,
        routing_key: &str,
        options: QueueBindOptions,
        arguments: FieldTable,
    ) -> Result<(), lapin::Error>;
}

#[async_trait]
impl SetupChannel for Channel {
    // lapin only exposes the prefetch count; the size always goes out as 0.
    async fn qos(
        &self,
        prefetch_count: u16,
        _prefetch_size: u32,
        global: bool,
    ) -> Result<(), lapin::Error> {
        self.basic_qos(prefetch_count, BasicQosOptions { global })
            .await
    }

    async fn queue_declare(
        &self,
        name: &str,
        options: QueueDeclareOptions,
        arguments: FieldTable,
    ) -> Result<(), lapin::Error> {
        Channel::queue_declare(self, name, options, arguments)
            .await
            .map(|_| ())
    }

    async fn exchange_declare(
        &self,
        name: &str,
        kind: &ExchangeKind,
        options: ExchangeDeclareOptions,
        arguments: FieldTable,
    ) -> Result<(), lapin::Error> {
        Channel::exchange_declare(self, name, kind.into(), options, arguments).await
    }

    async fn queue_bind(
        &self,
        queue: &str,
        exchange: &str,
        routing_key: &str,
        options: QueueBindOptions,
        arguments: FieldTable,
    ) -> Result<(), lapin::Error> {
        Channel::queue_bind(self, queue, exchange, routing_key, options, arguments).await
    }
}

/// Connects to the broker described by `cfg` and opens a channel.
///
/// Both the connection and channel are wrapped in Arc for sharing with the
/// dispatcher. The connection must be kept alive for as long as the channel
/// is in use.
pub async fn new_amqp_channel(cfg: &Config) -> Result<(Arc<Connection>, Arc<Channel>), AmqpError> {
    debug!("creating amqp connection...");
    let options =
        ConnectionProperties::default().with_connection_name(LongString::from(CONNECTION_NAME));

    let uri = build_uri(
        &cfg.rabbitmq.username,
        &cfg.rabbitmq.password,
        &cfg.rabbitmq.host,
        cfg.rabbitmq.port,
        &cfg.rabbitmq.vhost,
    );

    let conn = match Connection::connect(&uri, options).await {
        Ok(c) => Ok(c),
        Err(err) => {
            error!(
                error = err.to_string(),
                host = %cfg.rabbitmq.host,
                port = cfg.rabbitmq.port,
                "failure to connect"
            );
            Err(AmqpError::ConnectionError)
        }
    }?;
    debug!("amqp connected");

    debug!("creating amqp channel...");
    match conn.create_channel().await {
        Ok(c) => {
            debug!("channel created");
            Ok((Arc::new(conn), Arc::new(c)))
        }
        Err(err) => {
            error!(error = err.to_string(), "error to create the channel");
            Err(AmqpError::ChannelError)
        }
    }
}
