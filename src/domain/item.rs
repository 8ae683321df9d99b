//! Domain records for reception line items.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CoreError, CoreResult};

/// Canonical tag recognised as income.
pub const INCOME_TAG: &str = "income";
/// Canonical tag recognised as expense.
pub const EXPENSE_TAG: &str = "expense";
/// Label substituted when a grouping field is blank.
pub const UNSPECIFIED_LABEL: &str = "Unspecified";

/// One financial line item attached to a serviced unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReceptionItem {
    pub id: Uuid,
    pub unit_id: Uuid,
    pub description: String,
    pub work_group: String,
    /// Raw transaction tag as stored; classified via [`TransactionKind`].
    pub transaction_type: String,
    pub quantity: f64,
    pub price: f64,
    /// Set once the item is referenced by a downstream transfer document.
    /// Linked items stay in every total but can no longer be edited or
    /// deleted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_document_id: Option<Uuid>,
}

impl ReceptionItem {
    pub fn new(unit_id: Uuid, draft: &ItemDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit_id,
            description: draft.description.clone(),
            work_group: draft.work_group.clone(),
            transaction_type: draft.transaction_type.clone(),
            quantity: draft.quantity,
            price: draft.price,
            linked_document_id: None,
        }
    }

    /// Line value contributed to every ancestor total.
    pub fn line_value(&self) -> f64 {
        self.quantity * self.price
    }

    pub fn kind(&self) -> TransactionKind {
        TransactionKind::classify(&self.transaction_type)
    }

    pub fn is_linked(&self) -> bool {
        self.linked_document_id.is_some()
    }

    /// Applies a partial update in place; fields absent from the patch are
    /// left untouched.
    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(work_group) = &patch.work_group {
            self.work_group = work_group.clone();
        }
        if let Some(transaction_type) = &patch.transaction_type {
            self.transaction_type = transaction_type.clone();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
    }
}

/// Classification of a raw transaction tag into aggregation buckets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
    /// Any tag outside the two canonical ones; kept, never dropped.
    Unclassified,
}

impl TransactionKind {
    /// Maps a raw tag onto a bucket. The legacy Russian tags are accepted
    /// as aliases so rows imported from the old system classify identically.
    pub fn classify(tag: &str) -> Self {
        let tag = tag.trim();
        if tag.eq_ignore_ascii_case(INCOME_TAG) || tag == "Доходы" || tag == "Приход" {
            Self::Income
        } else if tag.eq_ignore_ascii_case(EXPENSE_TAG) || tag == "Расходы" || tag == "Расход" {
            Self::Expense
        } else {
            Self::Unclassified
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
            TransactionKind::Unclassified => "Unclassified",
        };
        f.write_str(label)
    }
}

/// Payload for inserting a new line item; validated before any store call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemDraft {
    pub description: String,
    pub work_group: String,
    pub transaction_type: String,
    pub quantity: f64,
    pub price: f64,
}

impl ItemDraft {
    pub fn new(
        description: impl Into<String>,
        work_group: impl Into<String>,
        transaction_type: impl Into<String>,
        quantity: f64,
        price: f64,
    ) -> Self {
        Self {
            description: description.into(),
            work_group: work_group.into(),
            transaction_type: transaction_type.into(),
            quantity,
            price,
        }
    }

    /// Rejects drafts with blank grouping fields or malformed numerics.
    pub fn validate(&self) -> CoreResult<()> {
        if self.description.trim().is_empty() {
            return Err(CoreError::Validation("description must not be blank".into()));
        }
        if self.work_group.trim().is_empty() {
            return Err(CoreError::Validation("work group must not be blank".into()));
        }
        if self.transaction_type.trim().is_empty() {
            return Err(CoreError::Validation(
                "transaction type must not be blank".into(),
            ));
        }
        validate_amount("quantity", self.quantity)?;
        validate_amount("price", self.price)?;
        Ok(())
    }
}

/// Partial field update sent to the persistence collaborator on commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.work_group.is_none()
            && self.transaction_type.is_none()
            && self.quantity.is_none()
            && self.price.is_none()
    }
}

pub(crate) fn validate_amount(field: &str, value: f64) -> CoreResult<()> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!("{field} must be finite")));
    }
    if value < 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must not be negative"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_recognises_canonical_and_legacy_tags() {
        assert_eq!(TransactionKind::classify("income"), TransactionKind::Income);
        assert_eq!(TransactionKind::classify("Expense"), TransactionKind::Expense);
        assert_eq!(TransactionKind::classify("Доходы"), TransactionKind::Income);
        assert_eq!(TransactionKind::classify("Расходы"), TransactionKind::Expense);
        assert_eq!(
            TransactionKind::classify("adjustment"),
            TransactionKind::Unclassified
        );
    }

    #[test]
    fn draft_validation_rejects_blank_and_negative_input() {
        let mut draft = ItemDraft::new("Rewind", "Winding", "income", 1.0, 100.0);
        assert!(draft.validate().is_ok());

        draft.description = "  ".into();
        assert!(matches!(draft.validate(), Err(CoreError::Validation(_))));

        draft.description = "Rewind".into();
        draft.quantity = -1.0;
        assert!(matches!(draft.validate(), Err(CoreError::Validation(_))));

        draft.quantity = f64::NAN;
        assert!(matches!(draft.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn patch_serializes_changed_fields_only() {
        let patch = ItemPatch {
            price: Some(150.0),
            ..ItemPatch::default()
        };
        let value = serde_json::to_value(&patch).expect("patch serializes");
        let object = value.as_object().expect("json object");
        assert_eq!(object.len(), 1);
        assert_eq!(object["price"], 150.0);
    }

    #[test]
    fn apply_patch_leaves_absent_fields_untouched() {
        let draft = ItemDraft::new("Rewind", "Winding", "income", 2.0, 100.0);
        let mut item = ReceptionItem::new(Uuid::new_v4(), &draft);
        item.apply_patch(&ItemPatch {
            price: Some(150.0),
            ..ItemPatch::default()
        });
        assert_eq!(item.price, 150.0);
        assert_eq!(item.quantity, 2.0);
        assert_eq!(item.description, "Rewind");
    }
}
