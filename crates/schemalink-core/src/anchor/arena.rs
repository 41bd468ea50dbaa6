//! Anchor storage keyed by [`AnchorId`].

use slotmap::{Key, SlotMap};
use std::fmt;

slotmap::new_key_type! {
    /// Lightweight handle to an anchor.
    ///
    /// Keys carry a slot version, so an id that outlives its anchor never
    /// resolves to whatever reuses the slot.
    pub struct AnchorId;
}

impl AnchorId {
    pub fn as_u64(self) -> u64 {
        self.data().as_ffi()
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "anchor {:?}", self.data())
    }
}

/// Slot map with stable insertion order.
///
/// `SlotMap` iteration follows slot reuse, so placement order is tracked
/// separately for enumeration (and resolver tie-breaks).
#[derive(Debug, Clone)]
pub struct Arena<T> {
    slots: SlotMap<AnchorId, T>,
    /// Live ids in insertion order.
    order: Vec<AnchorId>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            slots: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    /// Insert a value, returning its id.
    pub fn insert(&mut self, value: T) -> AnchorId {
        let id = self.slots.insert(value);
        self.order.push(id);
        id
    }

    /// Remove a value. Stale ids return `None`.
    pub fn remove(&mut self, id: AnchorId) -> Option<T> {
        let value = self.slots.remove(id)?;
        self.order.retain(|&live| live != id);
        Some(value)
    }

    pub fn get(&self, id: AnchorId) -> Option<&T> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: AnchorId) -> Option<&mut T> {
        self.slots.get_mut(id)
    }

    /// Check whether an id is live.
    pub fn contains(&self, id: AnchorId) -> bool {
        self.slots.contains_key(id)
    }

    /// Live ids in insertion order.
    pub fn ids(&self) -> &[AnchorId] {
        &self.order
    }

    /// Iterate live values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (AnchorId, &T)> {
        self.order
            .iter()
            .filter_map(|&id| self.slots.get(id).map(|value| (id, value)))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let b = arena.insert("b");
        assert_eq!(arena.get(a), Some(&"a"));
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.len(), 2);
        assert!(arena.contains(a));
    }

    #[test]
    fn test_stale_id_after_reuse() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        assert_eq!(arena.remove(a), Some("a"));

        let b = arena.insert("b");
        assert_ne!(a, b);
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());
        assert_eq!(arena.get(b), Some(&"b"));
        assert_eq!(arena.ids(), &[b]);
    }

    #[test]
    fn test_insertion_order_survives_slot_reuse() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);
        arena.remove(a);
        arena.remove(b);
        // Reuses freed slots, but still enumerates last
        let d = arena.insert(4);

        assert_eq!(arena.ids(), &[c, d]);
        let values: Vec<i32> = arena.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![3, 4]);
    }

    #[test]
    fn test_display() {
        let mut arena = Arena::new();
        let a = arena.insert(());
        assert!(a.to_string().starts_with("anchor "));
        assert_ne!(a.as_u64(), 0);
    }
}
