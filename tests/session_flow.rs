mod common;

use std::sync::Arc;

use reception_core::core::overlay::FieldEdit;
use reception_core::core::session::ReceptionSession;
use reception_core::domain::item::{ItemDraft, ItemPatch, ReceptionItem};
use reception_core::errors::CoreError;
use reception_core::storage::{InMemoryStore, ItemStore};
use uuid::Uuid;

use common::{fixture, item, session, session_with_store};

/// Store double whose mutations always fail with a persistence error.
struct FailingStore {
    inner: InMemoryStore,
}

impl ItemStore for FailingStore {
    fn fetch_all(&self, scope_id: Uuid) -> Result<Vec<ReceptionItem>, CoreError> {
        self.inner.fetch_all(scope_id)
    }

    fn update(&self, _id: Uuid, _patch: &ItemPatch) -> Result<(), CoreError> {
        Err(CoreError::Persistence("update rejected by backend".into()))
    }

    fn delete(&self, _id: Uuid) -> Result<(), CoreError> {
        Err(CoreError::Persistence("delete rejected by backend".into()))
    }

    fn insert(&self, _unit_id: Uuid, _draft: &ItemDraft) -> Result<ReceptionItem, CoreError> {
        Err(CoreError::Persistence("insert rejected by backend".into()))
    }
}

#[test]
fn commit_applies_changed_fields_and_reloads() {
    let fx = fixture();
    let mut session = session(&fx);
    let id = fx.items[0].id;

    session.begin_edit(id).expect("begin edit");
    session
        .set_field(id, FieldEdit::Price(120.0))
        .expect("set price");

    // Optimistic: the tree sees the pending edit before commit.
    assert_eq!(session.tree().units[0].totals.income, 2.0 * 120.0 + 80.0);

    session.commit(id).expect("commit succeeds");
    assert!(!session.is_editing(id));
    let committed = session
        .items()
        .iter()
        .find(|item| item.id == id)
        .expect("item still present");
    assert_eq!(committed.price, 120.0);
}

#[test]
fn commit_failure_keeps_pending_edits() {
    let fx = fixture();
    let store = FailingStore {
        inner: InMemoryStore::seeded(fx.scope_id, fx.items.clone()),
    };
    let mut session = session_with_store(&fx, Box::new(store));
    let id = fx.items[0].id;

    session.begin_edit(id).expect("begin edit");
    session
        .set_field(id, FieldEdit::Quantity(9.0))
        .expect("set quantity");

    let err = session.commit(id).expect_err("commit must fail");
    assert!(matches!(err, CoreError::Persistence(_)));
    // Edits are never silently discarded.
    assert!(session.is_editing(id));
    assert_eq!(session.effective_item(id).expect("effective").quantity, 9.0);
}

#[test]
fn commit_for_missing_item_reports_not_found() {
    let fx = fixture();
    let mut session = session(&fx);
    let err = session
        .commit(Uuid::new_v4())
        .expect_err("unknown id must fail");
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[test]
fn commit_without_changes_is_a_no_op() {
    let fx = fixture();
    let mut session = session(&fx);
    let id = fx.items[0].id;

    session.begin_edit(id).expect("begin edit");
    session.commit(id).expect("empty commit is fine");
    assert!(!session.is_editing(id));
}

#[test]
fn linked_items_are_rejected_from_editing_and_deletion() {
    let fx = fixture();
    let mut linked = item(fx.unit_one.id, "Shaft_ID_7", "Mechanical", "expense", 1.0, 40.0);
    linked.linked_document_id = Some(Uuid::new_v4());
    let linked_id = linked.id;

    let mut seeded = fx.items.clone();
    seeded.push(linked);
    let store = InMemoryStore::seeded(fx.scope_id, seeded);
    let mut session = session_with_store(&fx, Box::new(store));

    assert!(matches!(
        session.begin_edit(linked_id),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        session.set_field(linked_id, FieldEdit::Price(1.0)),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        session.delete_item(linked_id),
        Err(CoreError::Validation(_))
    ));
    // Linked items still participate in totals.
    assert_eq!(session.tree().units[0].totals.expense, 50.0 + 40.0);
}

#[test]
fn delete_purges_overlay_and_selection_in_the_same_operation() {
    let fx = fixture();
    let mut session = session(&fx);
    let id = fx.items[1].id;

    session.begin_edit(id).expect("begin edit");
    session.toggle_item(id);
    assert!(session.selection().is_selected(id));

    session.delete_item(id).expect("delete succeeds");
    assert!(!session.is_editing(id));
    assert!(!session.selection().is_selected(id));
    assert_eq!(session.items().len(), fx.items.len() - 1);
}

#[test]
fn add_item_is_validated_before_any_store_call() {
    let fx = fixture();
    let store = FailingStore {
        inner: InMemoryStore::seeded(fx.scope_id, fx.items.clone()),
    };
    let mut session = session_with_store(&fx, Box::new(store));

    // A Validation error (not Persistence) proves the draft was rejected
    // before the collaborator was asked to insert.
    let err = session
        .add_item(fx.unit_one.id, ItemDraft::new("", "Winding", "income", 1.0, 10.0))
        .expect_err("blank description must fail");
    assert!(matches!(err, CoreError::Validation(_)));
}

#[test]
fn add_item_appends_under_the_unit() {
    let fx = fixture();
    let mut session = session(&fx);

    let id = session
        .add_item(
            fx.unit_two.id,
            ItemDraft::new("Varnish", "Winding", "expense", 1.0, 25.0),
        )
        .expect("add succeeds");
    assert!(session.items().iter().any(|item| item.id == id));

    let err = session
        .add_item(
            Uuid::new_v4(),
            ItemDraft::new("Varnish", "Winding", "expense", 1.0, 25.0),
        )
        .expect_err("unknown unit must fail");
    assert!(matches!(err, CoreError::NotFound(_)));
}

#[test]
fn reload_purges_overlay_entries_for_externally_deleted_items() {
    let fx = fixture();
    let store = Arc::new(InMemoryStore::seeded(fx.scope_id, fx.items.clone()));
    let mut session = ReceptionSession::new(fx.scope_id, Box::new(Arc::clone(&store)))
        .with_metadata(common::reception(), vec![fx.unit_one.clone(), fx.unit_two.clone()]);
    session.reload().expect("initial load");

    let id = fx.items[0].id;
    session.begin_edit(id).expect("begin edit");

    // Someone else deletes the row; the next reload drops the edit.
    store.delete(id).expect("external delete");
    session.reload().expect("reload");
    assert!(!session.is_editing(id));
    assert!(matches!(
        session.commit(id),
        Err(CoreError::NotFound(_))
    ));
}

#[test]
fn set_field_rejects_malformed_numerics() {
    let fx = fixture();
    let mut session = session(&fx);
    let id = fx.items[0].id;

    assert!(matches!(
        session.set_field(id, FieldEdit::Quantity(-2.0)),
        Err(CoreError::Validation(_))
    ));
    assert!(matches!(
        session.set_field(id, FieldEdit::Price(f64::NAN)),
        Err(CoreError::Validation(_))
    ));
}
