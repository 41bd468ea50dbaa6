//! Render commands emitted by the connector manager.
//!
//! The manager owns geometry and lifecycle; a renderer owns paint. Commands
//! are queued and drained by the caller after each operation returns, so a
//! renderer never runs while the connector collection is being mutated.

use crate::connector::ConnectorId;
use crate::geometry::Segment;

/// A single instruction for the line rendering surface.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Create a new line.
    Draw { id: ConnectorId, segment: Segment },
    /// Move an existing line.
    Update { id: ConnectorId, segment: Segment },
    /// Tear a line down.
    Remove { id: ConnectorId },
    /// Start the transient highlight on a line.
    Flag { id: ConnectorId },
    /// End the transient highlight on a line.
    Unflag { id: ConnectorId },
}

impl RenderCommand {
    /// The line this command targets.
    pub fn id(&self) -> ConnectorId {
        match self {
            RenderCommand::Draw { id, .. }
            | RenderCommand::Update { id, .. }
            | RenderCommand::Remove { id }
            | RenderCommand::Flag { id }
            | RenderCommand::Unflag { id } => *id,
        }
    }

    /// The geometry carried by this command, if any.
    pub fn segment(&self) -> Option<Segment> {
        match self {
            RenderCommand::Draw { segment, .. } | RenderCommand::Update { segment, .. } => {
                Some(*segment)
            }
            _ => None,
        }
    }
}
