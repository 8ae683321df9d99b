pub mod memory;

use uuid::Uuid;

use crate::domain::item::{ItemDraft, ItemPatch, ReceptionItem};
use crate::errors::CoreError;

/// Abstraction over the persistence collaborator backing a reception scope.
///
/// Every call is fallible — validation or transport may reject it — and the
/// core never acts on a result before checking it.
pub trait ItemStore: Send + Sync {
    fn fetch_all(&self, scope_id: Uuid) -> Result<Vec<ReceptionItem>, CoreError>;
    fn update(&self, id: Uuid, patch: &ItemPatch) -> Result<(), CoreError>;
    fn delete(&self, id: Uuid) -> Result<(), CoreError>;
    fn insert(&self, unit_id: Uuid, draft: &ItemDraft) -> Result<ReceptionItem, CoreError>;
}

/// Shared handles delegate, so a store can back a session and still be
/// reachable from the outside (tests, background sync).
impl<S: ItemStore + ?Sized> ItemStore for std::sync::Arc<S> {
    fn fetch_all(&self, scope_id: Uuid) -> Result<Vec<ReceptionItem>, CoreError> {
        (**self).fetch_all(scope_id)
    }

    fn update(&self, id: Uuid, patch: &ItemPatch) -> Result<(), CoreError> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        (**self).delete(id)
    }

    fn insert(&self, unit_id: Uuid, draft: &ItemDraft) -> Result<ReceptionItem, CoreError> {
        (**self).insert(unit_id, draft)
    }
}

pub use memory::InMemoryStore;
