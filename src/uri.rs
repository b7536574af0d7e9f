// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! Broker connection string assembly.

/// Builds an `amqp://` URI from its parts.
///
/// Credentials are percent-encoded so reserved characters (`@`, `:`, `%`, ...)
/// survive the trip through the URI. The vhost is appended as is, with a
/// leading `/` added when it is missing.
pub fn build_uri(user: &str, password: &str, host: &str, port: u16, vhost: &str) -> String {
    let vhost = if vhost.starts_with('/') {
        vhost.to_owned()
    } else {
        format!("/{}", vhost)
    };

    format!(
        "amqp://{}:{}@{}:{}{}",
        urlencoding::encode(user),
        urlencoding::encode(password),
        host,
        port,
        vhost
    )
}
