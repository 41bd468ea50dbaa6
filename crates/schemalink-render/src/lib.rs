//! SchemaLink Render Library
//!
//! Renderer abstraction for connector lines and a retained SVG overlay
//! implementation.

mod renderer;
mod svg;

pub use renderer::{RenderResult, RenderStyle, Renderer, RendererError};
pub use svg::{ARROWHEAD_ID, SvgRenderer};
