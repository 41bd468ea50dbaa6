//! The board: placed table cards, which are the anchors connectors attach to.

use std::collections::HashMap;

use kurbo::{Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Use web-time on WASM, std::time otherwise
#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

use crate::anchor::{AnchorId, AnchorSource, Arena};
use crate::catalog::{Catalog, DetailRow};
use crate::config::BoardConfig;

/// Board errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("This table and column combination already exists in the grid!")]
    DuplicateCard { existing: AnchorId },
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    #[error("Unknown column {column} in table {table}")]
    UnknownColumn { table: String, column: String },
    #[error("Unknown card: {0}")]
    UnknownCard(AnchorId),
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// A table/column card placed on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub table_id: String,
    pub column_id: String,
    /// Table name shown in the card header.
    pub title: String,
    pub column_name: String,
    pub details: Vec<DetailRow>,
    /// Top-left corner in board (unscrolled) coordinates.
    pub position: Point,
    pub size: Size,
}

impl Card {
    /// Bounds in board coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Check if this card shows the given table/column pair.
    pub fn shows(&self, table_id: &str, column_id: &str) -> bool {
        self.table_id == table_id && self.column_id == column_id
    }
}

/// Placed cards plus the board's scroll offset.
#[derive(Debug, Clone)]
pub struct Board {
    cards: Arena<Card>,
    /// Scroll offset; viewport = board - scroll.
    scroll: Vec2,
    card_size: Size,
    min_card_size: Size,
    flag_duration: Duration,
    /// Highlighted cards and when their highlight expires.
    flagged: HashMap<AnchorId, Instant>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl Board {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            cards: Arena::new(),
            scroll: Vec2::ZERO,
            card_size: config.card_size,
            min_card_size: config.min_card_size,
            flag_duration: config.flag_duration(),
            flagged: HashMap::new(),
        }
    }

    /// Drop a card for `table_id`/`column_id` with its top-left at the
    /// viewport point `position`.
    ///
    /// A pair already on the board is not placed twice: the existing card is
    /// highlighted and [`BoardError::DuplicateCard`] is returned.
    pub fn drop_card(
        &mut self,
        catalog: &Catalog,
        table_id: &str,
        column_id: &str,
        position: Point,
    ) -> BoardResult<AnchorId> {
        if let Some(existing) = self.find(table_id, column_id) {
            self.flag(existing);
            log::warn!("Card for {}/{} already on the board", table_id, column_id);
            return Err(BoardError::DuplicateCard { existing });
        }

        let table = catalog
            .table(table_id)
            .ok_or_else(|| BoardError::UnknownTable(table_id.to_string()))?;
        let column = table
            .column(column_id)
            .ok_or_else(|| BoardError::UnknownColumn {
                table: table_id.to_string(),
                column: column_id.to_string(),
            })?;

        let card = Card {
            table_id: table.id.clone(),
            column_id: column.id.clone(),
            title: table.name.clone(),
            column_name: column.name.clone(),
            details: column.details.clone(),
            position: position + self.scroll,
            size: self.card_size,
        };
        let id = self.cards.insert(card);
        log::debug!("Dropped {} ({}.{})", id, table.name, column.name);
        Ok(id)
    }

    /// Move a card by `delta`.
    pub fn move_card(&mut self, id: AnchorId, delta: Vec2) -> BoardResult<()> {
        let card = self.card_mut(id)?;
        card.position += delta;
        Ok(())
    }

    /// Place a card's top-left at `position` in board coordinates.
    pub fn set_card_position(&mut self, id: AnchorId, position: Point) -> BoardResult<()> {
        self.card_mut(id)?.position = position;
        Ok(())
    }

    /// Resize a card, clamped to the minimum card size.
    /// Returns the size actually applied.
    pub fn resize_card(&mut self, id: AnchorId, size: Size) -> BoardResult<Size> {
        let min = self.min_card_size;
        let card = self.card_mut(id)?;
        card.size = Size::new(size.width.max(min.width), size.height.max(min.height));
        Ok(card.size)
    }

    /// Remove a card from the board.
    ///
    /// Connectors attached to it must be removed in the same step; the
    /// editor's `close_card` does both.
    pub fn close_card(&mut self, id: AnchorId) -> BoardResult<Card> {
        let card = self.cards.remove(id).ok_or(BoardError::UnknownCard(id))?;
        self.flagged.remove(&id);
        log::debug!("Closed {} ({}.{})", id, card.title, card.column_name);
        Ok(card)
    }

    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    pub fn scroll_by(&mut self, delta: Vec2) {
        self.scroll += delta;
    }

    pub fn set_scroll(&mut self, offset: Vec2) {
        self.scroll = offset;
    }

    /// Convert a viewport point to board coordinates.
    pub fn viewport_to_board(&self, point: Point) -> Point {
        point + self.scroll
    }

    /// Convert a board point to viewport coordinates.
    pub fn board_to_viewport(&self, point: Point) -> Point {
        point - self.scroll
    }

    pub fn card(&self, id: AnchorId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Cards in placement order.
    pub fn cards(&self) -> impl Iterator<Item = (AnchorId, &Card)> {
        self.cards.iter()
    }

    /// Find the card showing a table/column pair.
    pub fn find(&self, table_id: &str, column_id: &str) -> Option<AnchorId> {
        self.cards
            .iter()
            .find(|(_, card)| card.shows(table_id, column_id))
            .map(|(id, _)| id)
    }

    /// Topmost card under a viewport point.
    pub fn card_at(&self, point: Point) -> Option<AnchorId> {
        let point = self.viewport_to_board(point);
        self.cards
            .iter()
            .filter(|(_, card)| card.bounds().contains(point))
            .map(|(id, _)| id)
            .last()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Check if a card is currently highlighted.
    pub fn is_flagged(&self, id: AnchorId) -> bool {
        self.flagged.contains_key(&id)
    }

    /// Expire highlights that ran out before `now`.
    /// Returns the cards whose highlight was cleared.
    pub fn tick(&mut self, now: Instant) -> Vec<AnchorId> {
        let mut expired: Vec<AnchorId> = self
            .flagged
            .iter()
            .filter(|(_, until)| **until <= now)
            .map(|(id, _)| *id)
            .collect();
        expired.sort();
        for id in &expired {
            self.flagged.remove(id);
        }
        expired
    }

    fn flag(&mut self, id: AnchorId) {
        self.flagged.insert(id, Instant::now() + self.flag_duration);
    }

    fn card_mut(&mut self, id: AnchorId) -> BoardResult<&mut Card> {
        self.cards.get_mut(id).ok_or(BoardError::UnknownCard(id))
    }
}

impl AnchorSource for Board {
    fn anchors(&self) -> Vec<(AnchorId, Rect)> {
        self.cards
            .iter()
            .map(|(id, card)| (id, card.bounds() - self.scroll))
            .collect()
    }

    fn anchor_bounds(&self, id: AnchorId) -> Option<Rect> {
        self.cards.get(id).map(|card| card.bounds() - self.scroll)
    }

    fn anchor_count(&self) -> usize {
        self.cards.len()
    }
}
