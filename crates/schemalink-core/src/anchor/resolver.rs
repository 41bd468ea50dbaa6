//! Nearest-anchor resolution for pointer positions.

use super::{AnchorId, AnchorSource};
use crate::config::ConnectorConfig;
use crate::geometry::{distance, rect_center};
use kurbo::Point;

/// Maximum distance (in view units) from a pointer to an anchor center.
pub const DEFAULT_MAX_DISTANCE: f64 = 500.0;

/// Minimum number of anchors on the board before anything resolves.
pub const DEFAULT_MIN_CANDIDATES: usize = 2;

/// Finds the anchor nearest to a pointer position.
///
/// An anchor qualifies when the distance from the pointer to the center of
/// its bounds is strictly below `max_distance`. Nothing resolves while the
/// board holds fewer than `min_candidates` anchors, so a lone anchor can
/// never be picked up as both ends of a connector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorResolver {
    max_distance: f64,
    min_candidates: usize,
}

impl Default for AnchorResolver {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            min_candidates: DEFAULT_MIN_CANDIDATES,
        }
    }
}

impl AnchorResolver {
    /// Create a resolver with the given distance threshold.
    pub fn new(max_distance: f64) -> Self {
        Self {
            max_distance,
            ..Self::default()
        }
    }

    /// Create a resolver from connector configuration.
    pub fn from_config(config: &ConnectorConfig) -> Self {
        Self {
            max_distance: config.max_distance,
            min_candidates: config.min_candidates,
        }
    }

    /// Set the minimum anchor count.
    pub fn with_min_candidates(mut self, min_candidates: usize) -> Self {
        self.min_candidates = min_candidates;
        self
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn min_candidates(&self) -> usize {
        self.min_candidates
    }

    /// Resolve the anchor nearest to `point`.
    ///
    /// Ties go to the anchor enumerated first by `source`.
    pub fn resolve<S: AnchorSource + ?Sized>(&self, source: &S, point: Point) -> Option<AnchorId> {
        self.resolve_with_distance(source, point).map(|(id, _)| id)
    }

    /// Resolve the nearest anchor and report its distance.
    pub fn resolve_with_distance<S: AnchorSource + ?Sized>(
        &self,
        source: &S,
        point: Point,
    ) -> Option<(AnchorId, f64)> {
        if !(point.x.is_finite() && point.y.is_finite()) {
            log::warn!("Anchor resolution skipped: non-finite point ({}, {})", point.x, point.y);
            return None;
        }

        let count = source.anchor_count();
        if count < self.min_candidates {
            log::debug!(
                "Anchor resolution skipped: {} candidate(s), need {}",
                count,
                self.min_candidates
            );
            return None;
        }

        let mut best: Option<(AnchorId, f64)> = None;
        for (id, bounds) in source.anchors() {
            let dist = distance(point, rect_center(bounds));
            // Non-finite bounds never qualify
            if !dist.is_finite() || dist >= self.max_distance {
                continue;
            }
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((id, dist)),
            }
        }

        if best.is_none() {
            log::debug!(
                "No anchor within {} of ({}, {})",
                self.max_distance,
                point.x,
                point.y
            );
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Arena;
    use kurbo::Rect;

    /// A 20x20 box centered on (x, y).
    fn boxed(x: f64, y: f64) -> Rect {
        Rect::new(x - 10.0, y - 10.0, x + 10.0, y + 10.0)
    }

    fn board(centers: &[(f64, f64)]) -> Vec<(AnchorId, Rect)> {
        let mut arena = Arena::new();
        centers
            .iter()
            .map(|&(x, y)| (arena.insert(()), boxed(x, y)))
            .collect()
    }

    #[test]
    fn test_resolves_nearest_anchor() {
        let anchors = board(&[(100.0, 100.0), (400.0, 100.0), (900.0, 900.0)]);
        let resolver = AnchorResolver::new(500.0);

        let (id, dist) = resolver
            .resolve_with_distance(&anchors, Point::new(110.0, 110.0))
            .unwrap();
        assert_eq!(id, anchors[0].0);
        assert!((dist - 200.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_far_anchor_with_others_elsewhere() {
        // C is the only anchor in range, but the board holds three anchors
        let anchors = board(&[(100.0, 100.0), (400.0, 100.0), (900.0, 900.0)]);
        let resolver = AnchorResolver::new(500.0);
        assert_eq!(resolver.resolve(&anchors, Point::new(950.0, 950.0)), Some(anchors[2].0));
    }

    #[test]
    fn test_nearby_anchor_alone_never_resolves() {
        let anchors = board(&[(900.0, 900.0)]);
        let resolver = AnchorResolver::new(500.0);
        assert_eq!(resolver.resolve(&anchors, Point::new(950.0, 950.0)), None);
        assert_eq!(resolver.resolve(&anchors, Point::new(900.0, 900.0)), None);
    }

    #[test]
    fn test_nothing_within_threshold() {
        let anchors = board(&[(100.0, 100.0), (400.0, 100.0)]);
        let resolver = AnchorResolver::new(500.0);
        assert_eq!(resolver.resolve(&anchors, Point::new(2000.0, 2000.0)), None);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let anchors = board(&[(0.0, 0.0), (10_000.0, 0.0)]);
        let resolver = AnchorResolver::new(500.0);
        assert_eq!(resolver.resolve(&anchors, Point::new(500.0, 0.0)), None);
        assert_eq!(resolver.resolve(&anchors, Point::new(499.0, 0.0)), Some(anchors[0].0));
    }

    #[test]
    fn test_non_finite_point_never_resolves() {
        let anchors = board(&[(10.0, 10.0), (5010.0, 10.0)]);
        let resolver = AnchorResolver::new(500.0);
        assert_eq!(resolver.resolve(&anchors, Point::new(f64::NAN, 0.0)), None);
        assert_eq!(resolver.resolve(&anchors, Point::new(0.0, f64::INFINITY)), None);
        assert_eq!(resolver.resolve(&anchors, Point::new(0.0, 0.0)), Some(anchors[0].0));
    }

    #[test]
    fn test_non_finite_bounds_skipped() {
        let mut anchors = board(&[(10.0, 10.0), (20.0, 10.0)]);
        anchors[0].1 = Rect::new(f64::NAN, 0.0, 20.0, 20.0);
        let resolver = AnchorResolver::new(500.0);
        assert_eq!(resolver.resolve(&anchors, Point::new(10.0, 10.0)), Some(anchors[1].0));
    }

    #[test]
    fn test_min_candidates_uses_anchor_count() {
        struct Counted(Vec<(AnchorId, Rect)>, usize);

        impl AnchorSource for Counted {
            fn anchors(&self) -> Vec<(AnchorId, Rect)> {
                self.0.clone()
            }

            fn anchor_bounds(&self, id: AnchorId) -> Option<Rect> {
                self.0.anchor_bounds(id)
            }

            fn anchor_count(&self) -> usize {
                self.1
            }
        }

        let anchors = board(&[(0.0, 0.0), (100.0, 0.0)]);
        let resolver = AnchorResolver::new(500.0);
        assert_eq!(resolver.resolve(&Counted(anchors.clone(), 1), Point::ZERO), None);
        assert_eq!(resolver.resolve(&Counted(anchors.clone(), 2), Point::ZERO), Some(anchors[0].0));
    }

    #[test]
    fn test_tie_goes_to_first_enumerated() {
        let anchors = board(&[(0.0, 0.0), (100.0, 0.0)]);
        let resolver = AnchorResolver::new(500.0);
        assert_eq!(resolver.resolve(&anchors, Point::new(50.0, 0.0)), Some(anchors[0].0));

        let reversed: Vec<_> = anchors.iter().rev().copied().collect();
        assert_eq!(resolver.resolve(&reversed, Point::new(50.0, 0.0)), Some(anchors[1].0));
    }

    #[test]
    fn test_empty_board() {
        let anchors: Vec<(AnchorId, Rect)> = Vec::new();
        assert_eq!(AnchorResolver::default().resolve(&anchors, Point::ZERO), None);
    }

    #[test]
    fn test_min_candidates_override() {
        let anchors = board(&[(0.0, 0.0)]);
        let resolver = AnchorResolver::new(500.0).with_min_candidates(1);
        assert_eq!(resolver.resolve(&anchors, Point::new(1.0, 1.0)), Some(anchors[0].0));
    }
}
