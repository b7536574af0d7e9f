// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Channel Initialization
//!
//! Prepares a freshly opened channel for consumption. The sequence is strictly
//! linear and stops at the first failure:
//!
//! 1. QoS (prefetch count, size 0, global flag)
//! 2. Queue declaration (durable, not auto-deleted, not exclusive)
//! 3. Exchange declaration, only when an exchange name is configured
//! 4. Queue binding, only when step 3 ran
//!
//! A failing step returns an `AmqpError` naming the stage; none of the later
//! broker calls are issued.

use crate::{
    channel::SetupChannel,
    config::Config,
    errors::AmqpError,
    exchange::ExchangeKind,
};
use lapin::{
    options::{ExchangeDeclareOptions, QueueBindOptions, QueueDeclareOptions},
    types::FieldTable,
};
use tracing::{error, info};

/// Runs the setup sequence on `channel` using the values from `cfg`.
pub async fn initialize<C>(cfg: &Config, channel: &C) -> Result<(), AmqpError>
where
    C: SetupChannel + ?Sized,
{
    info!(
        count = cfg.prefetch.count,
        global = cfg.prefetch.global,
        "setting qos settings"
    );
    channel
        .qos(cfg.prefetch.count, 0, cfg.prefetch.global)
        .await
        .map_err(|err| {
            error!(error = err.to_string(), "failure to set qos");
            AmqpError::QoSDeclarationError(err.to_string())
        })?;
    info!("qos settings applied");

    let queue = cfg.rabbitmq.queue.as_str();
    info!(queue, "declaring queue");
    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                passive: false,
                durable: true,
                exclusive: false,
                auto_delete: false,
                nowait: false,
            },
            FieldTable::default(),
        )
        .await
        .map_err(|err| {
            error!(error = err.to_string(), queue, "failure to declare queue");
            AmqpError::DeclareQueueError(queue.to_owned(), err.to_string())
        })?;

    if cfg.exchange.name.is_empty() {
        info!("no exchange configured, skipping exchange declaration and binding");
        return Ok(());
    }

    let exchange = cfg.exchange.name.as_str();
    let kind = ExchangeKind::from(cfg.exchange.kind.as_str());

    info!(exchange, kind = ?kind, "declaring exchange");
    channel
        .exchange_declare(
            exchange,
            &kind,
            ExchangeDeclareOptions {
                passive: false,
                durable: cfg.exchange.durable,
                auto_delete: cfg.exchange.autodelete,
                internal: false,
                nowait: false,
            },
            FieldTable::default(),
        )
        .await
        .map_err(|err| {
            error!(error = err.to_string(), exchange, "failure to declare exchange");
            AmqpError::DeclareExchangeError(exchange.to_owned(), err.to_string())
        })?;

    let routing_key = cfg.queuesettings.routingkey.as_str();
    info!(queue, exchange, routing_key, "binding queue to exchange");
    channel
        .queue_bind(
            queue,
            exchange,
            routing_key,
            QueueBindOptions { nowait: false },
            FieldTable::default(),
        )
        .await
        .map_err(|err| {
            error!(
                error = err.to_string(),
                queue, exchange, "failure to bind queue to exchange"
            );
            AmqpError::BindingExchangeToQueueError(
                queue.to_owned(),
                exchange.to_owned(),
                err.to_string(),
            )
        })?;

    info!("channel ready for consumption");
    Ok(())
}
