//! Leaf-item selection with tri-state select-all.

use std::collections::HashSet;

use uuid::Uuid;

use crate::domain::item::ReceptionItem;

/// Tracks the selected subset of leaf item ids for one session.
#[derive(Debug, Default)]
pub struct SelectionTracker {
    selected: HashSet<Uuid>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership for one id.
    pub fn toggle(&mut self, id: Uuid) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Tri-state select-all: an empty or partial selection selects every
    /// id; only a complete selection clears.
    pub fn toggle_all(&mut self, all_ids: &[Uuid]) {
        let everything: HashSet<Uuid> = all_ids.iter().copied().collect();
        if !everything.is_empty() && self.selected == everything {
            self.selected.clear();
        } else {
            self.selected = everything;
        }
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.selected.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.selected.iter().copied()
    }

    /// Sum of `quantity × price` over selected leaves only.
    pub fn selected_total(&self, items: &[ReceptionItem]) -> f64 {
        items
            .iter()
            .filter(|item| self.selected.contains(&item.id))
            .map(ReceptionItem::line_value)
            .sum()
    }

    pub fn remove(&mut self, id: Uuid) {
        self.selected.remove(&id);
    }

    /// Drops selections whose items are no longer in the canonical list.
    pub fn purge_missing(&mut self, items: &[ReceptionItem]) {
        let live: HashSet<Uuid> = items.iter().map(|item| item.id).collect();
        self.selected.retain(|id| live.contains(id));
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }
}
