//! Connector manager: gesture handling, resync and teardown of lines.

use std::collections::HashMap;

use kurbo::{Point, Rect};
use uuid::Uuid;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

use super::error::{ConnectError, ConnectResult, GesturePhase};
use super::state::{Connector, ConnectorId, ConnectorState, Gesture};
use crate::anchor::{AnchorId, AnchorResolver, AnchorSource};
use crate::config::ConnectorConfig;
use crate::geometry::{segment_between, EndpointStyle, Segment};
use crate::render::RenderCommand;

/// Owns every connector line and the in-progress connect gesture.
///
/// Anchors are never owned here: every operation that needs positions takes
/// the live [`AnchorSource`] and reads bounds at call time. Render commands
/// are queued and drained with [`take_commands`](Self::take_commands).
#[derive(Debug, Clone)]
pub struct ConnectorManager {
    resolver: AnchorResolver,
    endpoint_style: EndpointStyle,
    flag_duration: Duration,
    /// Active connectors, keyed by ID.
    connectors: HashMap<ConnectorId, Connector>,
    /// Creation order of connectors.
    order: Vec<ConnectorId>,
    /// The pending gesture, if the pointer is down.
    gesture: Option<Gesture>,
    /// Highlighted connectors and when their highlight expires.
    flagged: HashMap<ConnectorId, Instant>,
    /// Queued commands for the renderer.
    commands: Vec<RenderCommand>,
}

impl Default for ConnectorManager {
    fn default() -> Self {
        Self::new(&ConnectorConfig::default())
    }
}

impl ConnectorManager {
    /// Create an empty manager.
    pub fn new(config: &ConnectorConfig) -> Self {
        Self {
            resolver: AnchorResolver::from_config(config),
            endpoint_style: config.endpoint_style,
            flag_duration: config.flag_duration(),
            connectors: HashMap::new(),
            order: Vec::new(),
            gesture: None,
            flagged: HashMap::new(),
            commands: Vec::new(),
        }
    }

    pub fn resolver(&self) -> &AnchorResolver {
        &self.resolver
    }

    pub fn endpoint_style(&self) -> EndpointStyle {
        self.endpoint_style
    }

    /// Start a connect gesture at `point`.
    ///
    /// Fails with [`ConnectError::ResolutionFailure`] when no anchor is near;
    /// no state is created in that case. An unfinished earlier gesture is
    /// discarded first.
    pub fn begin_connect<S: AnchorSource + ?Sized>(
        &mut self,
        anchors: &S,
        point: Point,
    ) -> ConnectResult<ConnectorId> {
        if self.gesture.is_some() {
            log::debug!("Discarding unfinished connect gesture");
            self.cancel_connect();
        }

        let Some((source, bounds)) = self.resolve(anchors, point) else {
            log::warn!(
                "Connect gesture aborted: no anchor near ({}, {})",
                point.x,
                point.y
            );
            return Err(ConnectError::ResolutionFailure {
                phase: GesturePhase::Start,
            });
        };

        let origin = self.endpoint_style.source_point(bounds);
        let gesture = Gesture {
            id: Uuid::new_v4(),
            source,
            origin,
            current: origin,
        };
        let id = gesture.id;
        self.commands.push(RenderCommand::Draw {
            id,
            segment: gesture.segment(),
        });
        log::debug!("Connect gesture {} started on {}", id, source);
        self.gesture = Some(gesture);
        Ok(id)
    }

    /// Move the free end of the preview line to `point`.
    ///
    /// Runs on every pointer move: no anchor search, and repeating the same
    /// point queues nothing. Non-finite points are ignored.
    pub fn update_connect(&mut self, point: Point) -> ConnectResult<()> {
        let gesture = self.gesture.as_mut().ok_or(ConnectError::NoGesture)?;
        if gesture.current == point {
            return Ok(());
        }
        if !(point.x.is_finite() && point.y.is_finite()) {
            log::debug!("Ignoring non-finite pointer position");
            return Ok(());
        }
        gesture.current = point;
        self.commands.push(RenderCommand::Update {
            id: gesture.id,
            segment: gesture.segment(),
        });
        Ok(())
    }

    /// Finish the connect gesture at `point`.
    ///
    /// The preview line becomes the connector's line on success. On any
    /// rejection (nothing near, same anchor as the source, or a duplicate
    /// pair) the preview is removed and no connector is created.
    pub fn end_connect<S: AnchorSource + ?Sized>(
        &mut self,
        anchors: &S,
        point: Point,
    ) -> ConnectResult<ConnectorId> {
        let gesture = self.gesture.take().ok_or(ConnectError::NoGesture)?;

        let Some((target, target_bounds)) = self.resolve(anchors, point) else {
            self.discard(&gesture);
            log::warn!(
                "Connect gesture {} discarded: no anchor near ({}, {})",
                gesture.id,
                point.x,
                point.y
            );
            return Err(ConnectError::ResolutionFailure {
                phase: GesturePhase::End,
            });
        };

        if target == gesture.source {
            self.discard(&gesture);
            log::warn!("Connect gesture {} discarded: self-loop on {}", gesture.id, target);
            return Err(ConnectError::SelfLoopRejected { anchor: target });
        }

        if let Some(existing) = self.find_between(gesture.source, target) {
            self.discard(&gesture);
            self.flag(existing);
            log::warn!(
                "Connector {} already links {} and {}",
                existing,
                gesture.source,
                target
            );
            return Err(ConnectError::DuplicateConnector { existing });
        }

        let Some(source_bounds) = anchors.anchor_bounds(gesture.source) else {
            self.discard(&gesture);
            log::error!(
                "Connect gesture {} lost its source {}",
                gesture.id,
                gesture.source
            );
            return Err(ConnectError::DanglingReference {
                connector: gesture.id,
                anchor: gesture.source,
            });
        };

        let segment = segment_between(source_bounds, target_bounds, self.endpoint_style);
        let connector = Connector {
            id: gesture.id,
            source: gesture.source,
            target,
            segment,
            state: ConnectorState::Active,
        };
        self.connectors.insert(connector.id, connector);
        self.order.push(gesture.id);
        self.commands.push(RenderCommand::Update {
            id: gesture.id,
            segment,
        });
        log::debug!(
            "Connector {} created: {} -> {}",
            gesture.id,
            gesture.source,
            target
        );
        Ok(gesture.id)
    }

    /// Discard the pending gesture, if any.
    /// Returns true if a gesture was cancelled.
    pub fn cancel_connect(&mut self) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                self.discard(&gesture);
                true
            }
            None => false,
        }
    }

    /// Recompute one connector's geometry from its anchors' current bounds.
    ///
    /// A connector whose anchor is gone means the removal cascade was
    /// skipped. The connector is torn down and
    /// [`ConnectError::DanglingReference`] is returned.
    pub fn resync<S: AnchorSource + ?Sized>(
        &mut self,
        anchors: &S,
        id: ConnectorId,
    ) -> ConnectResult<Segment> {
        let connector = self
            .connectors
            .get(&id)
            .ok_or(ConnectError::UnknownConnector(id))?;
        let (source, target) = (connector.source, connector.target);

        let source_bounds = anchors.anchor_bounds(source);
        let target_bounds = anchors.anchor_bounds(target);
        let (Some(a), Some(b)) = (source_bounds, target_bounds) else {
            let anchor = if source_bounds.is_none() { source } else { target };
            log::error!("Connector {} references missing {}; removing it", id, anchor);
            self.teardown(id);
            return Err(ConnectError::DanglingReference {
                connector: id,
                anchor,
            });
        };

        let segment = segment_between(a, b, self.endpoint_style);
        if let Some(connector) = self.connectors.get_mut(&id) {
            if connector.segment != segment {
                connector.segment = segment;
                self.commands.push(RenderCommand::Update { id, segment });
            }
        }
        Ok(segment)
    }

    /// Resync every connector attached to `anchor` (after a drag or resize).
    /// Returns the number of connectors successfully resynced.
    pub fn resync_anchor<S: AnchorSource + ?Sized>(&mut self, anchors: &S, anchor: AnchorId) -> usize {
        self.resync_gesture(anchors, Some(anchor));
        let ids: Vec<ConnectorId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.connectors.get(id).is_some_and(|c| c.touches(anchor)))
            .collect();
        ids.into_iter()
            .filter(|&id| self.resync(anchors, id).is_ok())
            .count()
    }

    /// Resync every connector (after a scroll).
    /// Returns the number of connectors successfully resynced.
    pub fn resync_all<S: AnchorSource + ?Sized>(&mut self, anchors: &S) -> usize {
        self.resync_gesture(anchors, None);
        let ids = self.order.clone();
        ids.into_iter()
            .filter(|&id| self.resync(anchors, id).is_ok())
            .count()
    }

    /// Remove every connector attached to `anchor`.
    ///
    /// Call in the same step that removes the anchor from the board. A
    /// pending gesture started on the anchor is cancelled as well.
    pub fn remove_anchor(&mut self, anchor: AnchorId) -> Vec<Connector> {
        if self.gesture.as_ref().is_some_and(|g| g.source == anchor) {
            log::debug!("Cancelling connect gesture: source {} removed", anchor);
            self.cancel_connect();
        }

        let doomed: Vec<ConnectorId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.connectors.get(id).is_some_and(|c| c.touches(anchor)))
            .collect();
        let removed: Vec<Connector> = doomed
            .into_iter()
            .filter_map(|id| self.teardown(id))
            .collect();
        if !removed.is_empty() {
            log::debug!("Removed {} connector(s) attached to {}", removed.len(), anchor);
        }
        removed
    }

    /// Remove a single connector.
    pub fn remove_connector(&mut self, id: ConnectorId) -> ConnectResult<Connector> {
        self.teardown(id).ok_or(ConnectError::UnknownConnector(id))
    }

    /// Expire highlights that ran out before `now`.
    /// Returns the number of highlights cleared.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut expired: Vec<ConnectorId> = self
            .flagged
            .iter()
            .filter(|(_, until)| **until <= now)
            .map(|(id, _)| *id)
            .collect();
        expired.sort_by_key(|id| self.order.iter().position(|o| o == id));
        for id in &expired {
            self.flagged.remove(id);
            self.commands.push(RenderCommand::Unflag { id: *id });
        }
        expired.len()
    }

    /// Get a connector by ID.
    pub fn get(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.get(&id)
    }

    /// Connectors in creation order.
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.order.iter().filter_map(|id| self.connectors.get(id))
    }

    /// Connectors attached to `anchor`, in creation order.
    pub fn connectors_for(&self, anchor: AnchorId) -> impl Iterator<Item = &Connector> {
        self.connectors().filter(move |c| c.touches(anchor))
    }

    /// Find the connector linking `a` and `b` in either direction.
    pub fn find_between(&self, a: AnchorId, b: AnchorId) -> Option<ConnectorId> {
        self.connectors().find(|c| c.links(a, b)).map(|c| c.id)
    }

    /// The pending gesture, if any.
    pub fn gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    /// Check if a connect gesture is in progress.
    pub fn is_connecting(&self) -> bool {
        self.gesture.is_some()
    }

    /// Check if a connector is currently highlighted.
    pub fn is_flagged(&self, id: ConnectorId) -> bool {
        self.flagged.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Drain queued render commands.
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        std::mem::take(&mut self.commands)
    }

    fn resolve<S: AnchorSource + ?Sized>(&self, anchors: &S, point: Point) -> Option<(AnchorId, Rect)> {
        let id = self.resolver.resolve(anchors, point)?;
        anchors.anchor_bounds(id).map(|bounds| (id, bounds))
    }

    /// Follow the pending gesture's source anchor.
    fn resync_gesture<S: AnchorSource + ?Sized>(&mut self, anchors: &S, only: Option<AnchorId>) {
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };
        if only.is_some_and(|anchor| anchor != gesture.source) {
            return;
        }
        match anchors.anchor_bounds(gesture.source) {
            Some(bounds) => {
                let origin = self.endpoint_style.source_point(bounds);
                if origin != gesture.origin {
                    gesture.origin = origin;
                    self.commands.push(RenderCommand::Update {
                        id: gesture.id,
                        segment: gesture.segment(),
                    });
                }
            }
            None => {
                log::warn!("Cancelling connect gesture: source anchor vanished");
                self.cancel_connect();
            }
        }
    }

    fn discard(&mut self, gesture: &Gesture) {
        self.commands.push(RenderCommand::Remove { id: gesture.id });
    }

    fn flag(&mut self, id: ConnectorId) {
        let until = Instant::now() + self.flag_duration;
        if self.flagged.insert(id, until).is_none() {
            self.commands.push(RenderCommand::Flag { id });
        }
    }

    fn teardown(&mut self, id: ConnectorId) -> Option<Connector> {
        let mut connector = self.connectors.remove(&id)?;
        self.order.retain(|&other| other != id);
        self.flagged.remove(&id);
        self.commands.push(RenderCommand::Remove { id });
        connector.state = ConnectorState::Removed;
        Some(connector)
    }
}
