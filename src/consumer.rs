// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Message Processing
//!
//! The consumer turns one delivery into one command run and settles the
//! delivery according to the outcome:
//!
//! 1. Read the body, zlib-decompressing it when compression is enabled
//! 2. Base64-encode it so it can travel as a command-line argument
//! 3. Build the command and execute it
//! 4. Ack (multiple) on success, nack (multiple, requeue) on any failure
//!
//! Failures never escape `process_message`: they are logged and turned into
//! a nack. Failed messages are requeued without any delay or retry ceiling,
//! so a command that always fails sees the same message again and again.

use crate::{command::CommandFactory, delivery::Acknowledger, executer::Executer};
use base64::{prelude::BASE64_STANDARD, Engine};
use flate2::read::ZlibDecoder;
use std::{io::Read, sync::Arc};
use tracing::{debug, error, warn};

/// How a delivery was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Acknowledged,
    Requeued,
}

/// Owns the command template and the executer used for every delivery.
pub struct Consumer {
    executer: Arc<dyn Executer>,
    factory: CommandFactory,
    compression: bool,
}

impl Consumer {
    pub fn new(executer: Arc<dyn Executer>, factory: CommandFactory, compression: bool) -> Self {
        Consumer {
            executer,
            factory,
            compression,
        }
    }

    /// Processes one delivery and settles it exactly once.
    ///
    /// The returned disposition is the one that was attempted; an ack or
    /// nack that fails on the broker side is logged and not retried.
    pub async fn process_message<D>(&self, delivery: &D) -> Disposition
    where
        D: Acknowledger + ?Sized,
    {
        let success = match self.encode_payload(delivery.body()) {
            Ok(payload) => {
                let cmd = self.factory.create(&payload);
                self.executer.execute(&cmd).await
            }
            Err(err) => {
                error!(error = err.to_string(), "failure to decompress message body");
                false
            }
        };

        if success {
            if let Err(err) = delivery.ack(true).await {
                error!(error = err.to_string(), "error while ack msg");
            } else {
                debug!("message acknowledged");
            }
            return Disposition::Acknowledged;
        }

        warn!("error while handling msg, requeuing");
        if let Err(err) = delivery.nack(true, true).await {
            error!(error = err.to_string(), "error while nack msg");
        }

        Disposition::Requeued
    }

    fn encode_payload(&self, body: &[u8]) -> Result<String, std::io::Error> {
        if !self.compression {
            return Ok(BASE64_STANDARD.encode(body));
        }

        let mut decompressed = Vec::new();
        ZlibDecoder::new(body).read_to_end(&mut decompressed)?;

        Ok(BASE64_STANDARD.encode(decompressed))
    }
}
