//! Renderer trait abstraction.

use peniko::Color;
use schemalink_core::connector::ConnectorId;
use schemalink_core::render::RenderCommand;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RendererError {
    #[error("No line for connector {0}")]
    UnknownLine(ConnectorId),
    #[error("Line for connector {0} already drawn")]
    DuplicateLine(ConnectorId),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Paint settings for connector lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub stroke_color: Color,
    pub stroke_width: f64,
    /// Stroke color of a highlighted (flagged) line.
    pub flag_color: Color,
    /// Gap left at the end of each line for the arrowhead.
    pub arrow_inset: f64,
    /// Radius of the dot drawn at each line's start.
    pub point_radius: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::from_rgba8(0, 0, 0, 255),
            stroke_width: 2.0,
            flag_color: Color::from_rgba8(255, 0, 0, 255), // Red
            arrow_inset: 10.0,
            point_radius: 5.0,
        }
    }
}

impl RenderStyle {
    pub fn with_stroke(mut self, color: Color, width: f64) -> Self {
        self.stroke_color = color;
        self.stroke_width = width;
        self
    }

    pub fn with_flag_color(mut self, color: Color) -> Self {
        self.flag_color = color;
        self
    }

    pub fn with_arrow_inset(mut self, inset: f64) -> Self {
        self.arrow_inset = inset;
        self
    }

    pub fn with_point_radius(mut self, radius: f64) -> Self {
        self.point_radius = radius;
        self
    }
}

/// Trait for line rendering surfaces.
///
/// A renderer only paints: it never changes connector state, and it sees
/// commands after the operation that queued them has returned.
pub trait Renderer {
    /// Apply a single command.
    fn apply(&mut self, command: &RenderCommand) -> RenderResult<()>;

    /// Apply a batch of commands in order.
    ///
    /// A failing command is logged and skipped. Returns the number applied.
    fn apply_all(&mut self, commands: &[RenderCommand]) -> usize {
        commands
            .iter()
            .filter(|command| match self.apply(command) {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Skipping render command: {}", e);
                    false
                }
            })
            .count()
    }
}
