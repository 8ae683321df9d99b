//! Session facade coordinating canonical data, overlay, selection, and the
//! persistence collaborator.

use tracing::{info, warn};
use uuid::Uuid;

use crate::core::overlay::{EditOverlay, FieldEdit};
use crate::core::rename;
use crate::core::selection::SelectionTracker;
use crate::domain::item::{ItemDraft, ReceptionItem};
use crate::domain::tree::HierarchyTree;
use crate::domain::unit::{Reception, Unit};
use crate::errors::{CoreError, CoreResult};
use crate::storage::ItemStore;

/// Owns one reception's canonical item list plus the transient edit and
/// selection state layered on top of it.
///
/// Tree snapshots are derived from effective values, so in-progress edits
/// show up in every total before they are committed. All state belongs to
/// one logical session; mutations go through `&mut self`.
pub struct ReceptionSession {
    scope_id: Uuid,
    reception: Option<Reception>,
    units: Vec<Unit>,
    items: Vec<ReceptionItem>,
    overlay: EditOverlay,
    selection: SelectionTracker,
    store: Box<dyn ItemStore>,
}

impl ReceptionSession {
    pub fn new(scope_id: Uuid, store: Box<dyn ItemStore>) -> Self {
        Self {
            scope_id,
            reception: None,
            units: Vec::new(),
            items: Vec::new(),
            overlay: EditOverlay::new(),
            selection: SelectionTracker::new(),
            store,
        }
    }

    /// Attaches scope metadata. Units are kept in position order so the
    /// tree lists them the way the reception document does.
    pub fn with_metadata(mut self, reception: Reception, mut units: Vec<Unit>) -> Self {
        units.sort_by_key(|unit| unit.position);
        self.reception = Some(reception);
        self.units = units;
        self
    }

    pub fn scope_id(&self) -> Uuid {
        self.scope_id
    }

    pub fn reception(&self) -> Option<&Reception> {
        self.reception.as_ref()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn items(&self) -> &[ReceptionItem] {
        &self.items
    }

    /// Replaces the canonical list from the store and drops overlay and
    /// selection entries that no longer resolve.
    pub fn reload(&mut self) -> CoreResult<()> {
        let items = self.store.fetch_all(self.scope_id)?;
        info!(count = items.len(), "reception items loaded");
        self.items = items;
        self.overlay.purge_missing(&self.items);
        self.selection.purge_missing(&self.items);
        Ok(())
    }

    /// Effective (overlay-merged) copies of the canonical items.
    pub fn effective_items(&self) -> Vec<ReceptionItem> {
        self.items
            .iter()
            .map(|item| self.overlay.effective(item))
            .collect()
    }

    pub fn effective_item(&self, id: Uuid) -> CoreResult<ReceptionItem> {
        let item = self.find(id)?;
        Ok(self.overlay.effective(item))
    }

    /// Rebuilds the derived tree from the current list and overlay.
    pub fn tree(&self) -> HierarchyTree {
        HierarchyTree::build(&self.units, &self.effective_items())
    }

    // --- edit overlay surface ---

    /// Starts (or resumes) an edit for the item. Linked items are
    /// immutable and rejected up front.
    pub fn begin_edit(&mut self, id: Uuid) -> CoreResult<()> {
        let item = self
            .items
            .iter()
            .find(|item| item.id == id)
            .ok_or(CoreError::NotFound(id))?;
        if item.is_linked() {
            return Err(CoreError::Validation(
                "item is referenced by a transfer document and cannot be edited".into(),
            ));
        }
        self.overlay.begin(item);
        Ok(())
    }

    /// Overrides one field of an in-progress edit, seeding the entry first
    /// if the caller skipped `begin_edit`.
    pub fn set_field(&mut self, id: Uuid, edit: FieldEdit) -> CoreResult<()> {
        if let FieldEdit::Quantity(value) | FieldEdit::Price(value) = edit {
            if !value.is_finite() || value < 0.0 {
                return Err(CoreError::Validation(
                    "quantity and price must be non-negative".into(),
                ));
            }
        }
        self.begin_edit(id)?;
        self.overlay.set(id, edit);
        Ok(())
    }

    pub fn is_editing(&self, id: Uuid) -> bool {
        self.overlay.is_editing(id)
    }

    /// Discards the pending edit, reverting display to canonical values.
    pub fn cancel_edit(&mut self, id: Uuid) {
        self.overlay.clear(id);
    }

    /// Commits the changed fields for one item, then reloads the canonical
    /// list so observable state matches the store.
    ///
    /// On failure the overlay entry is left intact — edits are never
    /// silently discarded. A second commit for the same id while one is
    /// running is rejected, never run concurrently.
    pub fn commit(&mut self, id: Uuid) -> CoreResult<()> {
        if !self.items.iter().any(|item| item.id == id) {
            return Err(CoreError::NotFound(id));
        }
        let Some(patch) = self.overlay.patch(id) else {
            return Ok(());
        };
        if patch.is_empty() {
            self.overlay.clear(id);
            return Ok(());
        }
        if !self.overlay.begin_commit(id) {
            return Err(CoreError::CommitInFlight(id));
        }
        let result = self.store.update(id, &patch);
        self.overlay.finish_commit(id);
        match result {
            Ok(()) => {
                self.overlay.clear(id);
                info!(%id, "item committed");
                self.reload()
            }
            Err(err) => {
                warn!(%id, error = %err, "commit failed; pending edits kept");
                Err(err)
            }
        }
    }

    // --- add / delete ---

    /// Validates and inserts a new item under the unit, then reloads.
    pub fn add_item(&mut self, unit_id: Uuid, draft: ItemDraft) -> CoreResult<Uuid> {
        draft.validate()?;
        if !self.units.is_empty() && !self.units.iter().any(|unit| unit.id == unit_id) {
            return Err(CoreError::NotFound(unit_id));
        }
        let created = self.store.insert(unit_id, &draft)?;
        let id = created.id;
        info!(%id, "item added");
        self.reload()?;
        Ok(id)
    }

    /// Deletes an item; its overlay and selection entries are purged in
    /// the same operation so nothing dangles.
    pub fn delete_item(&mut self, id: Uuid) -> CoreResult<()> {
        let item = self.find(id)?;
        if item.is_linked() {
            return Err(CoreError::Validation(
                "item is referenced by a transfer document and cannot be deleted".into(),
            ));
        }
        self.store.delete(id)?;
        self.items.retain(|item| item.id != id);
        self.overlay.clear(id);
        self.selection.remove(id);
        info!(%id, "item deleted");
        Ok(())
    }

    // --- renames ---

    /// Renames a base-item label across the target's unit and adopts the
    /// reconciled snapshot. The returned list is what callers persist.
    pub fn rename_base_item(
        &mut self,
        target_id: Uuid,
        new_label: &str,
    ) -> CoreResult<Vec<ReceptionItem>> {
        let reconciled = rename::rename_base_item(&self.items, target_id, new_label)?;
        self.items = reconciled.clone();
        Ok(reconciled)
    }

    /// Renames a work-group label across the target's unit and adopts the
    /// reconciled snapshot.
    pub fn rename_work_group(
        &mut self,
        target_id: Uuid,
        new_label: &str,
    ) -> CoreResult<Vec<ReceptionItem>> {
        let reconciled = rename::rename_work_group(&self.items, target_id, new_label)?;
        self.items = reconciled.clone();
        Ok(reconciled)
    }

    /// Renames a unit's service description. Unit names live on the unit
    /// record, so this touches exactly one record.
    pub fn rename_unit(&mut self, unit_id: Uuid, new_name: &str) -> CoreResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CoreError::Validation("unit name must not be blank".into()));
        }
        let unit = self
            .units
            .iter_mut()
            .find(|unit| unit.id == unit_id)
            .ok_or(CoreError::NotFound(unit_id))?;
        unit.name = new_name.to_owned();
        Ok(())
    }

    /// Renames a unit's subdivision label.
    pub fn rename_subdivision(&mut self, unit_id: Uuid, new_name: &str) -> CoreResult<()> {
        let new_name = new_name.trim();
        if new_name.is_empty() {
            return Err(CoreError::Validation(
                "subdivision name must not be blank".into(),
            ));
        }
        let unit = self
            .units
            .iter_mut()
            .find(|unit| unit.id == unit_id)
            .ok_or(CoreError::NotFound(unit_id))?;
        unit.subdivision = Some(new_name.to_owned());
        Ok(())
    }

    // --- selection surface ---

    pub fn toggle_item(&mut self, id: Uuid) {
        self.selection.toggle(id);
    }

    pub fn toggle_all(&mut self) {
        let ids: Vec<Uuid> = self.items.iter().map(|item| item.id).collect();
        self.selection.toggle_all(&ids);
    }

    /// Selected total over effective values, consistent with the tree.
    pub fn selected_total(&self) -> f64 {
        self.selection.selected_total(&self.effective_items())
    }

    pub fn selection(&self) -> &SelectionTracker {
        &self.selection
    }

    fn find(&self, id: Uuid) -> CoreResult<&ReceptionItem> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .ok_or(CoreError::NotFound(id))
    }
}
