//! Anchor system: board elements a connector line can attach to.
//!
//! Anchors are owned by whoever lays them out (the [`Board`](crate::board::Board)).
//! The connector subsystem only ever sees them through [`AnchorSource`],
//! which is queried live on every resolution and resync, so bounds are
//! never cached on the connector side.

mod arena;
mod resolver;

pub use arena::{AnchorId, Arena};
pub use resolver::{AnchorResolver, DEFAULT_MAX_DISTANCE, DEFAULT_MIN_CANDIDATES};

use kurbo::Rect;

/// Live view of the anchors currently eligible for connection.
pub trait AnchorSource {
    /// Enumerate anchors with their current bounds, in a stable order.
    fn anchors(&self) -> Vec<(AnchorId, Rect)>;

    /// Current bounds of a single anchor, `None` once it has been removed.
    fn anchor_bounds(&self, id: AnchorId) -> Option<Rect>;

    /// Number of anchors currently present.
    fn anchor_count(&self) -> usize {
        self.anchors().len()
    }
}

impl AnchorSource for [(AnchorId, Rect)] {
    fn anchors(&self) -> Vec<(AnchorId, Rect)> {
        self.to_vec()
    }

    fn anchor_bounds(&self, id: AnchorId) -> Option<Rect> {
        self.iter()
            .find(|(anchor, _)| *anchor == id)
            .map(|(_, bounds)| *bounds)
    }

    fn anchor_count(&self) -> usize {
        self.len()
    }
}

impl AnchorSource for Vec<(AnchorId, Rect)> {
    fn anchors(&self) -> Vec<(AnchorId, Rect)> {
        self.as_slice().anchors()
    }

    fn anchor_bounds(&self, id: AnchorId) -> Option<Rect> {
        self.as_slice().anchor_bounds(id)
    }

    fn anchor_count(&self) -> usize {
        self.len()
    }
}
