// Copyright (c) 2025, The Ruskit Authors
// MIT License
// All rights reserved.

//! # Exchange Types
//!
//! The configuration names the exchange type as free text (`type=direct`).
//! This module turns that text into a typed `ExchangeKind` and from there
//! into the kind lapin expects on the wire. Unknown names are kept verbatim
//! as custom types so plugin exchanges (e.g. `x-delayed-message`) still work.

/// Represents the types of exchanges available in RabbitMQ.
///
/// - Direct: Routes messages to queues based on an exact match of routing keys
/// - Fanout: Broadcasts messages to all bound queues regardless of routing keys
/// - Topic: Routes messages based on wildcard pattern matching of routing keys
/// - Headers: Routes based on message header values instead of routing keys
/// - Custom: Any other type, passed to the broker untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExchangeKind {
    #[default]
    Direct,
    Fanout,
    Topic,
    Headers,
    Custom(String),
}

impl From<&str> for ExchangeKind {
    fn from(name: &str) -> Self {
        match name {
            "" | "direct" => ExchangeKind::Direct,
            "fanout" => ExchangeKind::Fanout,
            "topic" => ExchangeKind::Topic,
            "headers" => ExchangeKind::Headers,
            other => ExchangeKind::Custom(other.to_owned()),
        }
    }
}

impl From<&ExchangeKind> for lapin::ExchangeKind {
    fn from(kind: &ExchangeKind) -> Self {
        match kind {
            ExchangeKind::Direct => lapin::ExchangeKind::Direct,
            ExchangeKind::Fanout => lapin::ExchangeKind::Fanout,
            ExchangeKind::Topic => lapin::ExchangeKind::Topic,
            ExchangeKind::Headers => lapin::ExchangeKind::Headers,
            ExchangeKind::Custom(name) => lapin::ExchangeKind::Custom(name.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_builtin_kinds() {
        assert_eq!(ExchangeKind::from("direct"), ExchangeKind::Direct);
        assert_eq!(ExchangeKind::from("fanout"), ExchangeKind::Fanout);
        assert_eq!(ExchangeKind::from("topic"), ExchangeKind::Topic);
        assert_eq!(ExchangeKind::from("headers"), ExchangeKind::Headers);
    }

    #[test]
    fn empty_type_defaults_to_direct() {
        assert_eq!(ExchangeKind::from(""), ExchangeKind::Direct);
    }

    #[test]
    fn unknown_type_is_kept_as_custom() {
        let kind = ExchangeKind::from("x-delayed-message");

        assert_eq!(kind, ExchangeKind::Custom("x-delayed-message".to_owned()));
        assert!(matches!(
            lapin::ExchangeKind::from(&kind),
            lapin::ExchangeKind::Custom(name) if name == "x-delayed-message"
        ));
    }
}
