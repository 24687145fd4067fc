use thiserror::Error;

use granular_serde::SerdeErr;

use crate::{config::ConfigError, types::ParticipantId};

/// Errors raised by a `ReplicationChannel`. None of them are fatal: the
/// offending call has no effect and the channel keeps working.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplicationError {
    /// A send, commit or write attempted by a participant lacking authority
    #[error("Policy violation on '{channel}' during {operation}: {reason}")]
    PolicyViolation {
        channel: String,
        operation: &'static str,
        reason: &'static str,
    },

    /// The transport or session is not ready, e.g. torn down mid-call
    #[error("Transport unavailable on '{channel}' during {operation}")]
    TransportUnavailable {
        channel: String,
        operation: &'static str,
    },

    /// An inbound payload did not match the fixed wire layout (message dropped)
    #[error("Malformed payload on '{channel}' from participant {sender}: {source}")]
    MalformedPayload {
        channel: String,
        sender: ParticipantId,
        #[source]
        source: SerdeErr,
    },

    /// A message arrived for a channel name this replication channel does not own
    #[error("Channel '{channel}' is not handled by this replication channel")]
    UnknownChannel { channel: String },

    /// The operation is outside the transform replication model
    #[error("{operation} is not supported by transform replication")]
    Unsupported { operation: &'static str },

    #[error("Invalid transform configuration: {0}")]
    Config(#[from] ConfigError),
}
