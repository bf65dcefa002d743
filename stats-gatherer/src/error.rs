use std::time::Duration;

/// Errors produced while collecting one snapshot from a vassal.
///
/// Every variant is fatal for the current invocation. Nothing is retried here;
/// the scheduler that runs the plugin will simply try again on its next tick.
#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    #[error("'--socket' is neither an http endpoint nor a unix domain socket ({reason}): {target:?}")]
    Configuration { target: String, reason: String },
    #[error("Connecting to the stats server at {target} failed: {source}")]
    Connection {
        target: String,
        #[source]
        source: TransportError,
    },
    #[error("Decoding the stats document from {origin} failed: {source}")]
    Decode {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl CollectError {
    pub(crate) fn configuration(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            target: target.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn connection(target: impl ToString, source: impl Into<TransportError>) -> Self {
        Self::Connection {
            target: target.to_string(),
            source: source.into(),
        }
    }

    /// Whether the error originates from the operator's configuration rather than the peer.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}
