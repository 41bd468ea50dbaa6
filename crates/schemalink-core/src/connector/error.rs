//! Connector errors.

use super::ConnectorId;
use crate::anchor::AnchorId;
use std::fmt;
use thiserror::Error;

/// Which end of a connect gesture failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Start,
    End,
}

impl fmt::Display for GesturePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GesturePhase::Start => f.write_str("start"),
            GesturePhase::End => f.write_str("end"),
        }
    }
}

/// Connector manager errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("No anchor near the gesture {phase}")]
    ResolutionFailure { phase: GesturePhase },
    #[error("Connector would start and end on {anchor}")]
    SelfLoopRejected { anchor: AnchorId },
    #[error("Connector {existing} already links these anchors")]
    DuplicateConnector { existing: ConnectorId },
    #[error("Connector {connector} references missing {anchor}")]
    DanglingReference {
        connector: ConnectorId,
        anchor: AnchorId,
    },
    #[error("No connect gesture in progress")]
    NoGesture,
    #[error("Unknown connector: {0}")]
    UnknownConnector(ConnectorId),
}

/// Result type for connector operations.
pub type ConnectResult<T> = Result<T, ConnectError>;

impl ConnectError {
    /// Transient notice to show the user, if this failure warrants one.
    ///
    /// Duplicates are signalled by highlighting the existing line instead.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            ConnectError::ResolutionFailure {
                phase: GesturePhase::Start,
            } => Some("You must start drawing near a table!"),
            ConnectError::ResolutionFailure {
                phase: GesturePhase::End,
            } => Some("You must end drawing near a table!"),
            ConnectError::SelfLoopRejected { .. } => {
                Some("You must end drawing near a different table!")
            }
            ConnectError::DuplicateConnector { .. }
            | ConnectError::DanglingReference { .. }
            | ConnectError::NoGesture
            | ConnectError::UnknownConnector(_) => None,
        }
    }
}
