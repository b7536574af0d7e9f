// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # RabbitMQ Message Dispatcher
//!
//! Registers a consumer on the configured queue and feeds every delivery to
//! the `Consumer`, one at a time. The next delivery is not taken from the
//! stream before the current one has been settled, so at most `prefetch`
//! messages wait on the client side while a command runs.
//!
//! The loop only ends when the broker closes the stream (consumer cancelled,
//! channel or connection lost). That is reported as an error so the process
//! exits non-zero and a supervisor can restart it.

use crate::{
    channel::CONNECTION_NAME,
    consumer::{Consumer, Disposition},
    errors::AmqpError,
    otel,
};
use futures_util::{Stream, StreamExt};
use lapin::{message::Delivery, options::BasicConsumeOptions, types::FieldTable, Channel};
use opentelemetry::{
    global::{self, BoxedTracer},
    trace::{Span, Status},
};
use std::{borrow::Cow, sync::Arc};
use tracing::{debug, error, info};
use uuid::Uuid;

/// Drives the consume loop of a single queue.
pub struct RabbitMQDispatcher {
    channel: Arc<Channel>,
    queue: String,
    consumer: Consumer,
}

impl RabbitMQDispatcher {
    /// # Parameters
    /// * `channel` - An initialized channel
    /// * `queue` - The queue to consume from
    /// * `consumer` - Processes each delivery
    pub fn new(channel: Arc<Channel>, queue: &str, consumer: Consumer) -> Self {
        RabbitMQDispatcher {
            channel,
            queue: queue.to_owned(),
            consumer,
        }
    }

    /// Consumes messages until the broker closes the stream.
    ///
    /// A broken delivery is logged and skipped. Never returns `Ok`: failing to
    /// register the consumer is `BindingConsumerError` and the end of the
    /// stream is `ConsumerClosed`.
    pub async fn consume_blocking(&self) -> Result<(), AmqpError> {
        let tag = format!("{}-{}", CONNECTION_NAME, Uuid::new_v4());

        let consumer = match self
            .channel
            .basic_consume(
                &self.queue,
                &tag,
                BasicConsumeOptions {
                    no_local: false,
                    no_ack: false,
                    exclusive: false,
                    nowait: false,
                },
                FieldTable::default(),
            )
            .await
        {
            Err(err) => {
                error!(error = err.to_string(), "error to create the consumer");
                Err(AmqpError::BindingConsumerError(self.queue.clone()))
            }
            Ok(c) => Ok(c),
        }?;

        info!(queue = self.queue, tag, "waiting for messages...");

        drain(&self.queue, &self.consumer, consumer).await
    }
}

async fn drain<S>(queue: &str, consumer: &Consumer, mut deliveries: S) -> Result<(), AmqpError>
where
    S: Stream<Item = Result<Delivery, lapin::Error>> + Unpin,
{
    let tracer = global::tracer("amqp consumer");

    while let Some(result) = deliveries.next().await {
        match result {
            Ok(delivery) => dispatch(queue, consumer, &tracer, &delivery).await,
            Err(err) => error!(error = err.to_string(), "errors consume msg"),
        }
    }

    error!(queue, "consumer stream closed");
    Err(AmqpError::ConsumerClosed(queue.to_owned()))
}

async fn dispatch(queue: &str, consumer: &Consumer, tracer: &BoxedTracer, delivery: &Delivery) {
    let (_ctx, mut span) = otel::new_span(&delivery.properties, tracer, queue);

    debug!(
        delivery_tag = delivery.delivery_tag,
        redelivered = delivery.redelivered,
        "received message"
    );

    match consumer.process_message(delivery).await {
        Disposition::Acknowledged => span.set_status(Status::Ok),
        Disposition::Requeued => span.set_status(Status::Error {
            description: Cow::from("message requeued"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{command::CommandFactory, executer::MockExecuter};
    use futures_util::stream;

    fn idle_consumer() -> Consumer {
        let mut executer = MockExecuter::new();
        executer.expect_execute().never();
        Consumer::new(Arc::new(executer), CommandFactory::new("true", vec![]), false)
    }

    #[tokio::test]
    async fn closed_stream_is_an_error() {
        let deliveries = stream::empty::<Result<Delivery, lapin::Error>>();

        let result = drain("worker", &idle_consumer(), deliveries).await;

        assert_eq!(result, Err(AmqpError::ConsumerClosed("worker".to_owned())));
    }

    #[tokio::test]
    async fn stream_errors_are_skipped_until_the_stream_closes() {
        let deliveries = stream::iter(vec![
            Err(lapin::Error::ChannelsLimitReached),
            Err(lapin::Error::ChannelsLimitReached),
        ]);

        let result = drain("worker", &idle_consumer(), deliveries).await;

        assert_eq!(result, Err(AmqpError::ConsumerClosed("worker".to_owned())));
    }
}
