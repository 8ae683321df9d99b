//! In-process reference backend for the [`ItemStore`] collaborator.

use std::sync::Mutex;

use uuid::Uuid;

use crate::domain::item::{validate_amount, ItemDraft, ItemPatch, ReceptionItem};
use crate::errors::CoreError;
use crate::storage::ItemStore;

/// Keeps one reception's items behind a mutex.
///
/// Used by tests and demos; a real deployment plugs a remote-backed store
/// into the same trait.
pub struct InMemoryStore {
    scope_id: Uuid,
    items: Mutex<Vec<ReceptionItem>>,
}

impl InMemoryStore {
    pub fn new(scope_id: Uuid) -> Self {
        Self::seeded(scope_id, Vec::new())
    }

    pub fn seeded(scope_id: Uuid, items: Vec<ReceptionItem>) -> Self {
        Self {
            scope_id,
            items: Mutex::new(items),
        }
    }

    /// Current contents, in insertion order.
    pub fn snapshot(&self) -> Result<Vec<ReceptionItem>, CoreError> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<ReceptionItem>>, CoreError> {
        self.items
            .lock()
            .map_err(|_| CoreError::Persistence("item store mutex poisoned".into()))
    }
}

impl ItemStore for InMemoryStore {
    fn fetch_all(&self, scope_id: Uuid) -> Result<Vec<ReceptionItem>, CoreError> {
        if scope_id != self.scope_id {
            return Err(CoreError::NotFound(scope_id));
        }
        self.snapshot()
    }

    fn update(&self, id: Uuid, patch: &ItemPatch) -> Result<(), CoreError> {
        if let Some(quantity) = patch.quantity {
            validate_amount("quantity", quantity)?;
        }
        if let Some(price) = patch.price {
            validate_amount("price", price)?;
        }
        let mut items = self.lock()?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(CoreError::NotFound(id))?;
        if item.is_linked() {
            return Err(CoreError::Validation(
                "item is referenced by a transfer document and cannot be updated".into(),
            ));
        }
        item.apply_patch(patch);
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        let mut items = self.lock()?;
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Err(CoreError::NotFound(id));
        }
        Ok(())
    }

    fn insert(&self, unit_id: Uuid, draft: &ItemDraft) -> Result<ReceptionItem, CoreError> {
        draft.validate()?;
        let item = ReceptionItem::new(unit_id, draft);
        self.lock()?.push(item.clone());
        Ok(item)
    }
}
