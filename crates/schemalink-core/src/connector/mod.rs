//! Connector lines between anchors.

mod error;
mod manager;
mod state;

pub use error::{ConnectError, ConnectResult, GesturePhase};
pub use manager::ConnectorManager;
pub use state::{Connector, ConnectorId, ConnectorState, Gesture};
