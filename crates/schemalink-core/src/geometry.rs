//! Geometry for connector lines: attachment points, lengths and angles.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Where a connector attaches to the bounding boxes of its anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EndpointStyle {
    /// Start at the right-center of the source, end at the left-center of the target.
    #[default]
    FacingEdges,
    /// Start and end at the centers of both boxes.
    Centers,
}

impl EndpointStyle {
    /// Attachment point on the source box.
    pub fn source_point(self, rect: Rect) -> Point {
        match self {
            EndpointStyle::FacingEdges => Point::new(rect.x1, (rect.y0 + rect.y1) / 2.0),
            EndpointStyle::Centers => rect.center(),
        }
    }

    /// Attachment point on the target box.
    pub fn target_point(self, rect: Rect) -> Point {
        match self {
            EndpointStyle::FacingEdges => Point::new(rect.x0, (rect.y0 + rect.y1) / 2.0),
            EndpointStyle::Centers => rect.center(),
        }
    }
}

/// A straight line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// A zero-length segment at `point`.
    pub fn zero(point: Point) -> Self {
        Self::new(point, point)
    }

    /// Euclidean length (never negative).
    pub fn length(&self) -> f64 {
        distance(self.start, self.end)
    }

    /// Direction in degrees, normalized to (-180, 180].
    pub fn angle_degrees(&self) -> f64 {
        length_and_angle(self.start, self.end).1
    }

    /// Pull the end point back towards the start by `inset`.
    ///
    /// Used to leave room for an arrowhead. The end never crosses the start.
    pub fn inset_end(&self, inset: f64) -> Self {
        let length = self.length();
        if length < f64::EPSILON || inset <= 0.0 {
            return *self;
        }
        let kept = (length - inset).max(0.0) / length;
        Self::new(
            self.start,
            Point::new(
                self.start.x + (self.end.x - self.start.x) * kept,
                self.start.y + (self.end.y - self.start.y) * kept,
            ),
        )
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Center of a bounding box.
pub fn rect_center(rect: Rect) -> Point {
    rect.center()
}

/// Segment from box `a` to box `b` using the given attachment convention.
pub fn segment_between(a: Rect, b: Rect, style: EndpointStyle) -> Segment {
    Segment::new(style.source_point(a), style.target_point(b))
}

/// Length and angle (degrees, in (-180, 180]) of the segment `start`→`end`.
///
/// A zero-length segment has angle 0.
pub fn length_and_angle(start: Point, end: Point) -> (f64, f64) {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length = (dx * dx + dy * dy).sqrt();
    if length < f64::EPSILON {
        return (0.0, 0.0);
    }
    (length, normalize_degrees(dy.atan2(dx).to_degrees()))
}

/// Normalize an angle in degrees to (-180, 180].
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle % 360.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
