// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! Inbound message abstraction: its body and its two possible dispositions.

use async_trait::async_trait;
use lapin::{
    message::Delivery,
    options::{BasicAckOptions, BasicNackOptions},
};

/// A delivered message that must be settled exactly once.
#[async_trait]
pub trait Acknowledger: Send + Sync {
    fn body(&self) -> &[u8];

    async fn ack(&self, multiple: bool) -> Result<(), lapin::Error>;

    async fn nack(&self, multiple: bool, requeue: bool) -> Result<(), lapin::Error>;
}

#[async_trait]
impl Acknowledger for Delivery {
    fn body(&self) -> &[u8] {
        &self.data
    }

    async fn ack(&self, multiple: bool) -> Result<(), lapin::Error> {
        self.acker
            .ack(BasicAckOptions { multiple })
            .await
            .map(|_| ())
    }

    async fn nack(&self, multiple: bool, requeue: bool) -> Result<(), lapin::Error> {
        self.acker
            .nack(BasicNackOptions { multiple, requeue })
            .await
            .map(|_| ())
    }
}
