//! Editor: routes pointer input and board edits to the connector manager.

use kurbo::{Point, Size, Vec2};

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use crate::anchor::AnchorId;
use crate::board::{Board, BoardError, BoardResult};
use crate::catalog::Catalog;
use crate::config::EditorConfig;
use crate::connector::{ConnectError, ConnectResult, Connector, ConnectorId, ConnectorManager};
use crate::input::PointerEvent;
use crate::render::RenderCommand;

/// The ER board editor.
///
/// Every edit that moves, resizes, scrolls or removes a card updates the
/// attached connectors before returning.
#[derive(Debug, Clone)]
pub struct Editor {
    board: Board,
    catalog: Catalog,
    connectors: ConnectorManager,
    /// Transient messages for the user.
    notices: Vec<String>,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(&EditorConfig::default(), Catalog::default())
    }
}

impl Editor {
    pub fn new(config: &EditorConfig, catalog: Catalog) -> Self {
        Self {
            board: Board::new(&config.board),
            catalog,
            connectors: ConnectorManager::new(&config.connector),
            notices: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn connectors(&self) -> &ConnectorManager {
        &self.connectors
    }

    /// Replace the catalog. Cards already on the board are kept.
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    /// Route a pointer event to the connect gesture.
    /// Returns the connector created when a gesture completes.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<ConnectorId> {
        match event {
            PointerEvent::Down { position } => {
                let result = self.connectors.begin_connect(&self.board, position);
                self.report(result.map(|_| ()));
                None
            }
            PointerEvent::Move { position } => {
                // Moves without a gesture are plain hovering
                let _ = self.connectors.update_connect(position);
                None
            }
            PointerEvent::Up { position } => {
                if !self.connectors.is_connecting() {
                    return None;
                }
                let result = self.connectors.end_connect(&self.board, position);
                match result {
                    Ok(id) => Some(id),
                    Err(e) => {
                        self.report(Err(e));
                        None
                    }
                }
            }
            PointerEvent::Scroll { delta } => {
                self.scroll_by(delta);
                None
            }
            PointerEvent::Leave => {
                self.connectors.cancel_connect();
                None
            }
        }
    }

    /// Drop a catalog table/column onto the board at a viewport point.
    pub fn drop_card(&mut self, table_id: &str, column_id: &str, position: Point) -> BoardResult<AnchorId> {
        let result = self
            .board
            .drop_card(&self.catalog, table_id, column_id, position);
        if let Err(e @ BoardError::DuplicateCard { .. }) = &result {
            self.notices.push(e.to_string());
        }
        result
    }

    /// Close a card and remove every connector attached to it.
    pub fn close_card(&mut self, id: AnchorId) -> BoardResult<Vec<Connector>> {
        self.board.close_card(id)?;
        Ok(self.connectors.remove_anchor(id))
    }

    /// Drag a card by `delta`.
    pub fn move_card(&mut self, id: AnchorId, delta: Vec2) -> BoardResult<()> {
        self.board.move_card(id, delta)?;
        self.connectors.resync_anchor(&self.board, id);
        Ok(())
    }

    /// Place a card's top-left at a board position.
    pub fn set_card_position(&mut self, id: AnchorId, position: Point) -> BoardResult<()> {
        self.board.set_card_position(id, position)?;
        self.connectors.resync_anchor(&self.board, id);
        Ok(())
    }

    /// Resize a card. Returns the size actually applied.
    pub fn resize_card(&mut self, id: AnchorId, size: Size) -> BoardResult<Size> {
        let applied = self.board.resize_card(id, size)?;
        self.connectors.resync_anchor(&self.board, id);
        Ok(applied)
    }

    pub fn scroll_by(&mut self, delta: Vec2) {
        self.board.scroll_by(delta);
        self.connectors.resync_all(&self.board);
    }

    pub fn set_scroll(&mut self, offset: Vec2) {
        self.board.set_scroll(offset);
        self.connectors.resync_all(&self.board);
    }

    /// Delete a single connector.
    pub fn remove_connector(&mut self, id: ConnectorId) -> ConnectResult<Connector> {
        self.connectors.remove_connector(id)
    }

    /// Expire transient highlights.
    ///
    /// Connector highlights end through `Unflag` commands; the cards whose
    /// highlight ended are returned.
    pub fn tick(&mut self, now: Instant) -> Vec<AnchorId> {
        self.connectors.tick(now);
        self.board.tick(now)
    }

    /// Drain queued render commands.
    pub fn take_commands(&mut self) -> Vec<RenderCommand> {
        self.connectors.take_commands()
    }

    /// Drain queued user notices.
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }

    fn report(&mut self, result: Result<(), ConnectError>) {
        if let Err(e) = result {
            if let Some(notice) = e.notice() {
                self.notices.push(notice.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::AnchorSource;
    use crate::geometry::segment_between;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{
                "table 1": [
                    { "id": "1", "name": "customers", "columns": [
                        { "column_id": "1", "name": "customer_id" }
                    ] },
                    { "id": "2", "name": "orders", "columns": [
                        { "column_id": "1", "name": "order_id" },
                        { "column_id": "2", "name": "customer_id" }
                    ] }
                ]
            }"#,
        )
        .unwrap()
    }

    /// Cards A (0,0), B (400,0), C (0,600), each 240x300.
    fn editor() -> (Editor, AnchorId, AnchorId, AnchorId) {
        let mut editor = Editor::new(&EditorConfig::default(), catalog());
        let a = editor.drop_card("1", "1", Point::new(0.0, 0.0)).unwrap();
        let b = editor.drop_card("2", "1", Point::new(400.0, 0.0)).unwrap();
        let c = editor.drop_card("2", "2", Point::new(0.0, 600.0)).unwrap();
        (editor, a, b, c)
    }

    fn drag(editor: &mut Editor, from: Point, to: Point) -> Option<ConnectorId> {
        editor.handle_pointer(PointerEvent::Down { position: from });
        editor.handle_pointer(PointerEvent::Move { position: to });
        editor.handle_pointer(PointerEvent::Up { position: to })
    }

    fn assert_in_sync(editor: &Editor) {
        let style = editor.connectors().endpoint_style();
        for connector in editor.connectors().connectors() {
            let expected = segment_between(
                editor.board().anchor_bounds(connector.source()).unwrap(),
                editor.board().anchor_bounds(connector.target()).unwrap(),
                style,
            );
            assert_eq!(connector.segment(), expected);
        }
    }

    #[test]
    fn test_pointer_gesture_connects_cards() {
        init_logger();
        let (mut editor, a, b, _) = editor();
        let id = drag(&mut editor, Point::new(120.0, 150.0), Point::new(520.0, 150.0)).unwrap();

        let connector = editor.connectors().get(id).unwrap();
        assert_eq!(connector.source(), a);
        assert_eq!(connector.target(), b);
        assert_eq!(connector.segment().start, Point::new(240.0, 150.0));
        assert_eq!(connector.segment().end, Point::new(400.0, 150.0));
        assert!(editor.take_notices().is_empty());
        assert!(!editor.take_commands().is_empty());
    }

    #[test]
    fn test_failed_gestures_queue_notices() {
        let (mut editor, ..) = editor();

        assert!(drag(&mut editor, Point::new(3000.0, 3000.0), Point::new(520.0, 150.0)).is_none());
        assert_eq!(
            editor.take_notices(),
            vec!["You must start drawing near a table!".to_string()]
        );

        assert!(drag(&mut editor, Point::new(120.0, 150.0), Point::new(3000.0, 3000.0)).is_none());
        assert_eq!(
            editor.take_notices(),
            vec!["You must end drawing near a table!".to_string()]
        );
        assert!(editor.connectors().is_empty());
    }

    #[test]
    fn test_duplicate_gesture_has_no_notice() {
        let (mut editor, ..) = editor();
        let existing = drag(&mut editor, Point::new(120.0, 150.0), Point::new(520.0, 150.0)).unwrap();

        assert!(drag(&mut editor, Point::new(520.0, 150.0), Point::new(120.0, 150.0)).is_none());
        assert!(editor.take_notices().is_empty());
        assert!(editor.connectors().is_flagged(existing));
        assert_eq!(editor.connectors().len(), 1);
    }

    #[test]
    fn test_duplicate_drop_queues_notice() {
        let (mut editor, a, ..) = editor();
        let err = editor.drop_card("1", "1", Point::new(800.0, 0.0)).unwrap_err();
        assert_eq!(err, BoardError::DuplicateCard { existing: a });
        assert_eq!(
            editor.take_notices(),
            vec!["This table and column combination already exists in the grid!".to_string()]
        );
        assert!(editor.board().is_flagged(a));
    }

    #[test]
    fn test_close_card_cascades() {
        init_logger();
        let (mut editor, a, b, c) = editor();
        let ab = drag(&mut editor, Point::new(120.0, 150.0), Point::new(520.0, 150.0)).unwrap();
        let bc = drag(&mut editor, Point::new(520.0, 150.0), Point::new(120.0, 750.0)).unwrap();
        let ac = drag(&mut editor, Point::new(120.0, 150.0), Point::new(120.0, 750.0)).unwrap();
        editor.take_commands();

        let removed = editor.close_card(b).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(editor.connectors().get(ab).is_none());
        assert!(editor.connectors().get(bc).is_none());
        assert!(editor.connectors().get(ac).unwrap().links(a, c));

        let removed_lines: Vec<_> = editor
            .take_commands()
            .into_iter()
            .filter(|cmd| matches!(cmd, RenderCommand::Remove { .. }))
            .map(|cmd| cmd.id())
            .collect();
        assert_eq!(removed_lines, vec![ab, bc]);

        assert_eq!(editor.close_card(b), Err(BoardError::UnknownCard(b)));
    }

    #[test]
    fn test_card_edits_resync() {
        let (mut editor, a, b, _) = editor();
        drag(&mut editor, Point::new(120.0, 150.0), Point::new(520.0, 150.0)).unwrap();
        drag(&mut editor, Point::new(520.0, 150.0), Point::new(120.0, 750.0)).unwrap();

        editor.move_card(a, Vec2::new(-30.0, 70.0)).unwrap();
        assert_in_sync(&editor);

        editor.resize_card(b, Size::new(400.0, 120.0)).unwrap();
        assert_in_sync(&editor);

        editor.set_card_position(b, Point::new(700.0, 300.0)).unwrap();
        assert_in_sync(&editor);
    }

    #[test]
    fn test_scroll_resyncs_all() {
        let (mut editor, ..) = editor();
        let id = drag(&mut editor, Point::new(120.0, 150.0), Point::new(520.0, 150.0)).unwrap();

        editor.handle_pointer(PointerEvent::Scroll {
            delta: Vec2::new(0.0, 100.0),
        });
        assert_in_sync(&editor);
        assert_eq!(
            editor.connectors().get(id).unwrap().segment().start,
            Point::new(240.0, 50.0)
        );

        editor.set_scroll(Vec2::ZERO);
        assert_eq!(
            editor.connectors().get(id).unwrap().segment().start,
            Point::new(240.0, 150.0)
        );
    }

    #[test]
    fn test_leave_cancels_gesture() {
        let (mut editor, ..) = editor();
        editor.handle_pointer(PointerEvent::Down {
            position: Point::new(120.0, 150.0),
        });
        assert!(editor.connectors().is_connecting());

        editor.handle_pointer(PointerEvent::Leave);
        assert!(!editor.connectors().is_connecting());
        assert!(editor
            .handle_pointer(PointerEvent::Up {
                position: Point::new(520.0, 150.0)
            })
            .is_none());
        assert!(editor.connectors().is_empty());
    }

    #[test]
    fn test_tick_clears_highlights() {
        let (mut editor, a, ..) = editor();
        let existing = drag(&mut editor, Point::new(120.0, 150.0), Point::new(520.0, 150.0)).unwrap();
        drag(&mut editor, Point::new(120.0, 150.0), Point::new(520.0, 150.0));
        let _ = editor.drop_card("1", "1", Point::ZERO);
        editor.take_commands();

        let later = Instant::now() + std::time::Duration::from_secs(5);
        assert_eq!(editor.tick(later), vec![a]);
        assert!(!editor.connectors().is_flagged(existing));
        assert_eq!(
            editor.take_commands(),
            vec![RenderCommand::Unflag { id: existing }]
        );
    }
}
