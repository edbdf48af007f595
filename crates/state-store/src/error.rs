//! Error types for the store and its configuration

use std::any::Any;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported through a [`DispatchHandle`](crate::DispatchHandle) or by store construction
#[derive(Debug, Error)]
pub enum StoreError {
    /// The reducer panicked while reducing the action; the previous state was kept
    #[error("reducer panicked: {0}")]
    ReducerPanicked(String),

    /// A middleware panicked while handling the action
    #[error("middleware panicked: {0}")]
    MiddlewarePanicked(String),

    /// A middleware returned an error
    #[error("middleware failed: {0}")]
    Middleware(anyhow::Error),

    /// The store was shut down before the action could be processed
    #[error("store has been shut down")]
    ShutDown,

    /// The store was created outside of a tokio runtime
    #[error("a store must be created from within a tokio runtime")]
    NoRuntime,
}

impl StoreError {
    /// Convert an error returned by middleware.
    ///
    /// Errors produced further down the chain (e.g. a reducer panic returned by
    /// `next.run(..)` and propagated with `?`) keep their original variant.
    pub(crate) fn from_middleware(err: anyhow::Error) -> Self {
        match err.downcast::<StoreError>() {
            Ok(inner) => inner,
            Err(err) => StoreError::Middleware(err),
        }
    }
}

/// Errors raised while loading a [`StoreConfig`](crate::StoreConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_survives_middleware_round_trip() {
        let err: anyhow::Error = StoreError::ReducerPanicked("boom".to_string()).into();

        let converted = StoreError::from_middleware(err);

        assert!(matches!(converted, StoreError::ReducerPanicked(msg) if msg == "boom"));
    }

    #[test]
    fn test_foreign_error_becomes_middleware_error() {
        let converted = StoreError::from_middleware(anyhow::anyhow!("disk full"));

        match converted {
            StoreError::Middleware(err) => assert_eq!(err.to_string(), "disk full"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_panic_message_from_payloads() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(42_u8)), "unknown panic payload");
    }
}
