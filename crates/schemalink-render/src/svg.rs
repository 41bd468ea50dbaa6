//! Retained SVG overlay for connector lines.

use std::collections::HashMap;
use std::fmt::Write;

use kurbo::Size;
use peniko::Color;
use schemalink_core::connector::ConnectorId;
use schemalink_core::geometry::Segment;
use schemalink_core::render::RenderCommand;

use crate::renderer::{RenderResult, RenderStyle, Renderer, RendererError};

/// Marker id referenced by every line's `marker-end`.
pub const ARROWHEAD_ID: &str = "arrowhead";

#[derive(Debug, Clone, Copy, PartialEq)]
struct Line {
    segment: Segment,
    flagged: bool,
}

/// Keeps one `<line>` per connector (or preview) and serializes them as an
/// SVG overlay sitting on top of the board.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    style: RenderStyle,
    lines: HashMap<ConnectorId, Line>,
    /// Draw order.
    order: Vec<ConnectorId>,
}

impl SvgRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self {
            style,
            lines: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    /// Geometry currently on screen for a line, before the arrow inset.
    pub fn segment(&self, id: ConnectorId) -> Option<Segment> {
        self.lines.get(&id).map(|line| line.segment)
    }

    pub fn is_flagged(&self, id: ConnectorId) -> bool {
        self.lines.get(&id).is_some_and(|line| line.flagged)
    }

    pub fn contains(&self, id: ConnectorId) -> bool {
        self.lines.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.order.clear();
    }

    /// Serialize the overlay for a viewport of `size`.
    pub fn to_svg(&self, size: Size) -> String {
        let stroke = hex(self.style.stroke_color);
        let mut svg = String::new();
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" style="position:absolute;left:0;top:0;pointer-events:none">"#,
            size.width, size.height
        );
        let _ = writeln!(
            svg,
            r#"<defs><marker id="{ARROWHEAD_ID}" markerWidth="10" markerHeight="7" refX="0" refY="3.5" orient="auto"><polygon points="0 0, 10 3.5, 0 7" fill="{stroke}"/></marker></defs>"#
        );

        for id in &self.order {
            let Some(line) = self.lines.get(id) else {
                continue;
            };
            let color = if line.flagged {
                hex(self.style.flag_color)
            } else {
                stroke.clone()
            };
            let drawn = line.segment.inset_end(self.style.arrow_inset);
            let _ = writeln!(
                svg,
                r#"<line id="line-{id}" x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="{}" marker-end="url(#{ARROWHEAD_ID})"/>"#,
                drawn.start.x, drawn.start.y, drawn.end.x, drawn.end.y, self.style.stroke_width
            );
            let _ = writeln!(
                svg,
                r#"<circle id="point-{id}" cx="{}" cy="{}" r="{}" fill="{stroke}"/>"#,
                line.segment.start.x, line.segment.start.y, self.style.point_radius
            );
        }

        svg.push_str("</svg>\n");
        svg
    }

    fn line_mut(&mut self, id: ConnectorId) -> RenderResult<&mut Line> {
        self.lines.get_mut(&id).ok_or(RendererError::UnknownLine(id))
    }
}

impl Renderer for SvgRenderer {
    fn apply(&mut self, command: &RenderCommand) -> RenderResult<()> {
        match *command {
            RenderCommand::Draw { id, segment } => {
                if self.lines.contains_key(&id) {
                    return Err(RendererError::DuplicateLine(id));
                }
                self.lines.insert(
                    id,
                    Line {
                        segment,
                        flagged: false,
                    },
                );
                self.order.push(id);
            }
            RenderCommand::Update { id, segment } => {
                self.line_mut(id)?.segment = segment;
            }
            RenderCommand::Remove { id } => {
                self.lines.remove(&id).ok_or(RendererError::UnknownLine(id))?;
                self.order.retain(|&other| other != id);
            }
            RenderCommand::Flag { id } => {
                self.line_mut(id)?.flagged = true;
            }
            RenderCommand::Unflag { id } => {
                self.line_mut(id)?.flagged = false;
            }
        }
        Ok(())
    }
}

/// `#rrggbb` form of a color; alpha is dropped.
fn hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}
