//! Transient edit state layered over the canonical item list.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::item::{ItemPatch, ReceptionItem};

/// One editable field of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemField {
    Description,
    WorkGroup,
    TransactionType,
    Quantity,
    Price,
}

/// A single pending field override.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Description(String),
    WorkGroup(String),
    TransactionType(String),
    Quantity(f64),
    Price(f64),
}

impl FieldEdit {
    pub fn field(&self) -> ItemField {
        match self {
            FieldEdit::Description(_) => ItemField::Description,
            FieldEdit::WorkGroup(_) => ItemField::WorkGroup,
            FieldEdit::TransactionType(_) => ItemField::TransactionType,
            FieldEdit::Quantity(_) => ItemField::Quantity,
            FieldEdit::Price(_) => ItemField::Price,
        }
    }
}

/// Full copy of an item's editable fields, seeded when an edit begins.
#[derive(Debug, Clone, PartialEq)]
struct EditableFields {
    description: String,
    work_group: String,
    transaction_type: String,
    quantity: f64,
    price: f64,
}

impl From<&ReceptionItem> for EditableFields {
    fn from(item: &ReceptionItem) -> Self {
        Self {
            description: item.description.clone(),
            work_group: item.work_group.clone(),
            transaction_type: item.transaction_type.clone(),
            quantity: item.quantity,
            price: item.price,
        }
    }
}

#[derive(Debug, Clone)]
struct OverlayEntry {
    fields: EditableFields,
    /// Fields the user actually changed. Only these override canonical
    /// values and only these are sent on commit.
    touched: HashSet<ItemField>,
}

/// Tracks pending, uncommitted edits per item id.
///
/// At most one entry per id; an entry exists only while an edit is in
/// progress and only for items still present in the canonical list.
#[derive(Debug, Default)]
pub struct EditOverlay {
    entries: HashMap<Uuid, OverlayEntry>,
    in_flight: HashSet<Uuid>,
}

impl EditOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an entry with the item's current values. Re-entrant: an
    /// existing entry is left alone so fields already changed survive.
    pub fn begin(&mut self, item: &ReceptionItem) {
        self.entries.entry(item.id).or_insert_with(|| OverlayEntry {
            fields: EditableFields::from(item),
            touched: HashSet::new(),
        });
    }

    pub fn is_editing(&self, id: Uuid) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn editing_count(&self) -> usize {
        self.entries.len()
    }

    /// Overrides one field. Returns `false` when no edit is in progress
    /// for the id.
    pub fn set(&mut self, id: Uuid, edit: FieldEdit) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            return false;
        };
        entry.touched.insert(edit.field());
        match edit {
            FieldEdit::Description(value) => entry.fields.description = value,
            FieldEdit::WorkGroup(value) => entry.fields.work_group = value,
            FieldEdit::TransactionType(value) => entry.fields.transaction_type = value,
            FieldEdit::Quantity(value) => entry.fields.quantity = value,
            FieldEdit::Price(value) => entry.fields.price = value,
        }
        true
    }

    /// Canonical values with touched overrides applied; untouched fields
    /// fall through to the canonical item.
    pub fn effective(&self, item: &ReceptionItem) -> ReceptionItem {
        let Some(entry) = self.entries.get(&item.id) else {
            return item.clone();
        };
        let mut merged = item.clone();
        for field in &entry.touched {
            match field {
                ItemField::Description => merged.description = entry.fields.description.clone(),
                ItemField::WorkGroup => merged.work_group = entry.fields.work_group.clone(),
                ItemField::TransactionType => {
                    merged.transaction_type = entry.fields.transaction_type.clone()
                }
                ItemField::Quantity => merged.quantity = entry.fields.quantity,
                ItemField::Price => merged.price = entry.fields.price,
            }
        }
        merged
    }

    /// The changed fields only, ready to send to the store. `None` when no
    /// edit is in progress for the id.
    pub fn patch(&self, id: Uuid) -> Option<ItemPatch> {
        let entry = self.entries.get(&id)?;
        let mut patch = ItemPatch::default();
        for field in &entry.touched {
            match field {
                ItemField::Description => {
                    patch.description = Some(entry.fields.description.clone())
                }
                ItemField::WorkGroup => patch.work_group = Some(entry.fields.work_group.clone()),
                ItemField::TransactionType => {
                    patch.transaction_type = Some(entry.fields.transaction_type.clone())
                }
                ItemField::Quantity => patch.quantity = Some(entry.fields.quantity),
                ItemField::Price => patch.price = Some(entry.fields.price),
            }
        }
        Some(patch)
    }

    /// Discards the entry, reverting display to canonical values.
    pub fn clear(&mut self, id: Uuid) {
        self.entries.remove(&id);
    }

    /// Drops entries whose items are no longer in the canonical list.
    pub fn purge_missing(&mut self, items: &[ReceptionItem]) {
        let live: HashSet<Uuid> = items.iter().map(|item| item.id).collect();
        self.entries.retain(|id, _| live.contains(id));
        self.in_flight.retain(|id| live.contains(id));
    }

    /// Marks a commit as running for the id. Returns `false` when one is
    /// already in flight, which callers must treat as a rejection.
    pub fn begin_commit(&mut self, id: Uuid) -> bool {
        self.in_flight.insert(id)
    }

    pub fn finish_commit(&mut self, id: Uuid) {
        self.in_flight.remove(&id);
    }

    pub fn commit_in_flight(&self, id: Uuid) -> bool {
        self.in_flight.contains(&id)
    }
}
