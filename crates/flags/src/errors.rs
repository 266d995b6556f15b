//! Error type shared by every [`crate::FeatureStore`] implementation.
//!
//! [`StoreError`] distinguishes protocol mismatches (an unknown gate key, a
//! payload of the wrong shape) from transport failures and from responses the
//! store did not expect. Mutating operations report a rejected request as
//! `Ok(false)`; only conditions the caller cannot meaningfully interpret are
//! surfaced as errors.

use thiserror::Error;

use crate::GateKey;

/// Boxed error produced by a transport (HTTP client, socket, ...).
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by a [`crate::FeatureStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// A gate key outside the closed [`GateKey`] set was supplied, either by
    /// the caller or in a response from the store.
    ///
    /// Indicates a protocol or version mismatch; never retried or skipped.
    #[error("{key:?} is not a valid gate key")]
    InvalidGateKey {
        /// The raw key as received.
        key: String,
    },

    /// A value was assigned to a gate whose value type does not match.
    #[error("value for gate {key} has the wrong shape: {message}")]
    GateValueMismatch {
        /// Gate that rejected the value.
        key: GateKey,
        /// Description of the expected shape.
        message: String,
    },

    /// The transport failed before a response was received (DNS failure,
    /// connection refused, timeout).
    ///
    /// The original transport error is preserved as the source.
    #[error("transport failure: {0}")]
    Transport(#[source] TransportError),

    /// The store answered with a status code the operation does not interpret.
    #[error("unexpected response status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// A response body could not be decoded into the expected shape.
    #[error("could not decode response: {message}")]
    Decode {
        /// Description of the decoding problem.
        message: String,
    },

    /// The store was configured with invalid parameters.
    ///
    /// Produced at construction time; a store never starts with an invalid config.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl StoreError {
    /// Wraps a transport error without altering it.
    pub fn transport(err: impl Into<TransportError>) -> Self {
        Self::Transport(err.into())
    }

    /// Builds a [`StoreError::Decode`] from any displayable cause.
    pub fn decode(message: impl std::fmt::Display) -> Self {
        Self::Decode {
            message: message.to_string(),
        }
    }

    /// Builds a [`StoreError::Configuration`] from any displayable cause.
    pub fn configuration(message: impl std::fmt::Display) -> Self {
        Self::Configuration {
            message: message.to_string(),
        }
    }
}
