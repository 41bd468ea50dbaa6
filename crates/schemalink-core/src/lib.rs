//! SchemaLink Core Library
//!
//! Connector lines between table cards on an ER board: anchor resolution,
//! line geometry, connector lifecycle and the board that owns the anchors.

pub mod anchor;
pub mod board;
pub mod catalog;
pub mod config;
pub mod connector;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod render;

pub use anchor::{AnchorId, AnchorResolver, AnchorSource, Arena};
pub use board::{Board, BoardError, BoardResult, Card};
pub use catalog::{Catalog, CatalogError, CatalogResult, ColumnDef, TableDef};
pub use config::{BoardConfig, ConnectorConfig, EditorConfig};
pub use connector::{
    ConnectError, ConnectResult, Connector, ConnectorId, ConnectorManager, ConnectorState, Gesture,
    GesturePhase,
};
pub use editor::Editor;
pub use geometry::{EndpointStyle, Segment, distance, length_and_angle, rect_center, segment_between};
pub use input::PointerEvent;
pub use render::RenderCommand;
