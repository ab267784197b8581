use crate::types::{FragmentToken, WorkerId};

/// Protocol desynchronization. None of these are recovered: delivery on the
/// substrate is assumed reliable and ordered per channel, so a mismatch is a
/// defect, not a transient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A header arrived where a payload was expected, or vice versa.
    UnexpectedMessage {
        from: WorkerId,
        expected: &'static str,
    },

    /// Payload length does not match the header that preceded it.
    LengthMismatch {
        from: WorkerId,
        expected: usize,
        actual: usize,
    },

    /// A result header referenced a fragment this job never produced, or one
    /// already collected.
    UnknownFragment { from: WorkerId, token: FragmentToken },

    /// The channel to a specific worker closed mid-protocol.
    Disconnected(WorkerId),

    /// Every worker hung up while the master still expected results.
    ChannelClosed,
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::UnexpectedMessage { from, expected } => {
                write!(f, "unexpected message from worker {}: expected {}", from, expected)
            }
            ProtocolError::LengthMismatch {
                from,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "payload length mismatch from worker {}: expected {}, got {}",
                    from, expected, actual
                )
            }
            ProtocolError::UnknownFragment { from, token } => {
                write!(f, "worker {} returned unknown fragment token {}", from, token)
            }
            ProtocolError::Disconnected(worker) => {
                write!(f, "worker {} disconnected mid-protocol", worker)
            }
            ProtocolError::ChannelClosed => {
                write!(f, "message channel closed with results still pending")
            }
        }
    }
}

impl std::error::Error for ProtocolError {}
