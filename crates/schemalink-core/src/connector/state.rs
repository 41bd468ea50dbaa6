//! Connector and gesture state definitions.

use crate::anchor::AnchorId;
use crate::geometry::Segment;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for connectors (and their in-progress preview lines).
pub type ConnectorId = Uuid;

/// Lifecycle state of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectorState {
    /// Gesture started, only the source is known.
    #[default]
    Pending,
    /// Both anchors resolved; the line tracks them.
    Active,
    /// Torn down. Terminal.
    Removed,
}

impl ConnectorState {
    /// Check if the connector still has a line on screen.
    pub fn is_live(&self) -> bool {
        !matches!(self, Self::Removed)
    }
}

/// An in-progress connect gesture (pointer down, not yet released).
#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    /// Id the connector will carry if the gesture completes.
    pub id: ConnectorId,
    /// Anchor the gesture started on.
    pub source: AnchorId,
    /// Attachment point on the source anchor.
    pub origin: Point,
    /// Free end, following the pointer.
    pub current: Point,
}

impl Gesture {
    /// The preview line for this gesture.
    pub fn segment(&self) -> Segment {
        Segment::new(self.origin, self.current)
    }
}

/// A directed line between two anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    pub(crate) id: ConnectorId,
    pub(crate) source: AnchorId,
    pub(crate) target: AnchorId,
    pub(crate) segment: Segment,
    pub(crate) state: ConnectorState,
}

impl Connector {
    pub fn id(&self) -> ConnectorId {
        self.id
    }

    pub fn source(&self) -> AnchorId {
        self.source
    }

    pub fn target(&self) -> AnchorId {
        self.target
    }

    /// Geometry as of the last creation or resync.
    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn state(&self) -> ConnectorState {
        self.state
    }

    /// Check if either end is attached to `anchor`.
    pub fn touches(&self, anchor: AnchorId) -> bool {
        self.source == anchor || self.target == anchor
    }

    /// Check if this connector links `a` and `b`, in either direction.
    pub fn links(&self, a: AnchorId, b: AnchorId) -> bool {
        (self.source == a && self.target == b) || (self.source == b && self.target == a)
    }
}
