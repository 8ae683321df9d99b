//! Label renames propagated across sibling items inside one unit scope.
//!
//! Every function returns a full new snapshot of the flat list; the input
//! is never partially updated, so a caller either adopts the reconciled
//! list or keeps the old one.

use uuid::Uuid;

use crate::domain::base_key::BaseKey;
use crate::domain::item::ReceptionItem;
use crate::errors::{CoreError, CoreResult};

/// Rewrites the base-item label for every item in the target's unit whose
/// description parses to the same base label.
///
/// Opaque `_ID_` suffixes are carried over verbatim. Identical labels under
/// other units are untouched.
pub fn rename_base_item(
    items: &[ReceptionItem],
    target_id: Uuid,
    new_label: &str,
) -> CoreResult<Vec<ReceptionItem>> {
    let new_label = validated_label(new_label, "base item")?;
    let target = find(items, target_id)?;
    let scope = target.unit_id;
    let old_label = BaseKey::parse(&target.description).label().to_owned();

    Ok(items
        .iter()
        .map(|item| {
            if item.unit_id == scope {
                let key = BaseKey::parse(&item.description);
                if key.label() == old_label {
                    let mut renamed = item.clone();
                    renamed.description = key.with_label(new_label).encode();
                    return renamed;
                }
            }
            item.clone()
        })
        .collect())
}

/// Rewrites a work-group label for every item in the target's unit carrying
/// the same group label.
pub fn rename_work_group(
    items: &[ReceptionItem],
    target_id: Uuid,
    new_label: &str,
) -> CoreResult<Vec<ReceptionItem>> {
    let new_label = validated_label(new_label, "work group")?;
    let target = find(items, target_id)?;
    let scope = target.unit_id;
    let old_label = target.work_group.clone();

    Ok(items
        .iter()
        .map(|item| {
            if item.unit_id == scope && item.work_group == old_label {
                let mut renamed = item.clone();
                renamed.work_group = new_label.to_owned();
                renamed
            } else {
                item.clone()
            }
        })
        .collect())
}

fn validated_label<'a>(label: &'a str, what: &str) -> CoreResult<&'a str> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!(
            "{what} label must not be blank"
        )));
    }
    Ok(trimmed)
}

fn find(items: &[ReceptionItem], id: Uuid) -> CoreResult<&ReceptionItem> {
    items
        .iter()
        .find(|item| item.id == id)
        .ok_or(CoreError::NotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::item::ItemDraft;

    fn item(unit_id: Uuid, description: &str, group: &str) -> ReceptionItem {
        ReceptionItem::new(
            unit_id,
            &ItemDraft::new(description, group, "income", 1.0, 10.0),
        )
    }

    #[test]
    fn base_item_rename_stays_inside_the_unit_scope() {
        let unit_one = Uuid::new_v4();
        let unit_two = Uuid::new_v4();
        let items = vec![
            item(unit_one, "Замена_ID_1", "Winding"),
            item(unit_one, "Замена_ID_2", "Winding"),
            item(unit_two, "Замена_ID_3", "Winding"),
        ];

        let reconciled = rename_base_item(&items, items[0].id, "Ремонт").expect("rename succeeds");
        assert_eq!(reconciled[0].description, "Ремонт_ID_1");
        assert_eq!(reconciled[1].description, "Ремонт_ID_2");
        // Same base name under another unit must not cross-contaminate.
        assert_eq!(reconciled[2].description, "Замена_ID_3");
    }

    #[test]
    fn base_item_rename_covers_suffixless_siblings() {
        let unit = Uuid::new_v4();
        let items = vec![item(unit, "Замена", "Winding"), item(unit, "Замена_ID_9", "Winding")];

        let reconciled = rename_base_item(&items, items[0].id, "Ремонт").expect("rename succeeds");
        assert_eq!(reconciled[0].description, "Ремонт");
        assert_eq!(reconciled[1].description, "Ремонт_ID_9");
    }

    #[test]
    fn work_group_rename_matches_exact_label_in_scope() {
        let unit_one = Uuid::new_v4();
        let unit_two = Uuid::new_v4();
        let items = vec![
            item(unit_one, "Rewind", "Winding"),
            item(unit_one, "Varnish", "Winding"),
            item(unit_one, "Balance", "Mechanical"),
            item(unit_two, "Rewind", "Winding"),
        ];

        let reconciled =
            rename_work_group(&items, items[0].id, "Electrical").expect("rename succeeds");
        assert_eq!(reconciled[0].work_group, "Electrical");
        assert_eq!(reconciled[1].work_group, "Electrical");
        assert_eq!(reconciled[2].work_group, "Mechanical");
        assert_eq!(reconciled[3].work_group, "Winding");
    }

    #[test]
    fn unknown_target_leaves_no_partial_rename() {
        let unit = Uuid::new_v4();
        let items = vec![item(unit, "Rewind", "Winding")];
        let err = rename_base_item(&items, Uuid::new_v4(), "Anything")
            .expect_err("missing target must fail");
        assert!(matches!(err, CoreError::NotFound(_)));
        assert_eq!(items[0].description, "Rewind");
    }

    #[test]
    fn blank_labels_are_rejected() {
        let unit = Uuid::new_v4();
        let items = vec![item(unit, "Rewind", "Winding")];
        assert!(matches!(
            rename_base_item(&items, items[0].id, "  "),
            Err(CoreError::Validation(_))
        ));
    }
}
