// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! Consumes messages from a RabbitMQ queue and hands each one, base64-encoded,
//! to an external command. The message is acknowledged when the command exits
//! with status zero and requeued otherwise.

mod otel;

pub mod channel;
pub mod command;
pub mod config;
pub mod consumer;
pub mod delivery;
pub mod dispatcher;
pub mod errors;
pub mod exchange;
pub mod executer;
pub mod initializer;
pub mod logs;
pub mod uri;
