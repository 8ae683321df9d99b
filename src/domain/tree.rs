//! Derived hierarchy: grouping engine and aggregation calculator.
//!
//! The tree is an ephemeral structure rebuilt in full from the flat item
//! list whenever the list or the edit overlay changes. It has no identity
//! or mutation methods of its own, which rules out stale-node and
//! partial-update bugs when items are added, edited, or removed between
//! rebuilds.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::base_key::BaseKey;
use crate::domain::item::{ReceptionItem, TransactionKind, UNSPECIFIED_LABEL};
use crate::domain::unit::Unit;

/// Income/expense magnitudes rolled up at a hierarchy node.
///
/// Expense is stored as a non-negative magnitude at every level; the sign
/// only appears in [`Totals::net`]. Unclassified buckets keep their own
/// lane so no line value ever drops out of the roll-up.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub unclassified: f64,
}

impl Totals {
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }

    /// Sum of every leaf line value under the node, regardless of bucket.
    pub fn gross(&self) -> f64 {
        self.income + self.expense + self.unclassified
    }

    fn add(&mut self, kind: TransactionKind, value: f64) {
        match kind {
            TransactionKind::Income => self.income += value,
            TransactionKind::Expense => self.expense += value,
            TransactionKind::Unclassified => self.unclassified += value,
        }
    }
}

/// Leaf-level bucket holding the items of one transaction kind.
///
/// A bucket exists only if at least one item landed in it; empty buckets
/// are never materialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransactionBucket {
    pub kind: TransactionKind,
    pub items: Vec<ReceptionItem>,
    pub total: f64,
}

impl TransactionBucket {
    fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
            total: 0.0,
        }
    }
}

/// Items sharing one base label inside a work group.
///
/// Grouping keys on the label half of the [`BaseKey`] only: `_ID_` suffixes
/// distinguish sibling leaves, not base items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BaseItemNode {
    pub label: String,
    pub buckets: Vec<TransactionBucket>,
    pub totals: Totals,
    pub item_count: usize,
}

impl BaseItemNode {
    fn new(label: String) -> Self {
        Self {
            label,
            buckets: Vec::new(),
            totals: Totals::default(),
            item_count: 0,
        }
    }
}

/// One work category inside a unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkGroupNode {
    pub label: String,
    pub base_items: Vec<BaseItemNode>,
    pub totals: Totals,
    pub item_count: usize,
}

impl WorkGroupNode {
    fn new(label: String) -> Self {
        Self {
            label,
            base_items: Vec::new(),
            totals: Totals::default(),
            item_count: 0,
        }
    }
}

/// Top-level node for one serviced unit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnitNode {
    pub unit: Unit,
    pub groups: Vec<WorkGroupNode>,
    pub totals: Totals,
    pub item_count: usize,
}

impl UnitNode {
    fn new(unit: Unit) -> Self {
        Self {
            unit,
            groups: Vec::new(),
            totals: Totals::default(),
            item_count: 0,
        }
    }
}

/// The full derived hierarchy with roll-up totals at every level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HierarchyTree {
    pub units: Vec<UnitNode>,
    pub totals: Totals,
    pub item_count: usize,
}

impl HierarchyTree {
    /// Builds the tree in a single left-to-right pass over `items`.
    ///
    /// Nodes appear in first-arrival order at every level; side indexes
    /// keep bucket lookup constant so the whole pass stays O(n). The
    /// function is total: blank grouping fields land in a reserved
    /// "Unspecified" node and unknown transaction tags in the
    /// unclassified bucket.
    pub fn build(units: &[Unit], items: &[ReceptionItem]) -> Self {
        let known: HashMap<Uuid, &Unit> = units.iter().map(|u| (u.id, u)).collect();

        let mut tree = Self::default();
        let mut unit_index: HashMap<Uuid, usize> = HashMap::new();
        let mut group_index: HashMap<(usize, String), usize> = HashMap::new();
        let mut base_index: HashMap<(usize, usize, String), usize> = HashMap::new();

        for item in items {
            let kind = item.kind();
            let value = item.line_value();

            let ui = match unit_index.get(&item.unit_id) {
                Some(&ui) => ui,
                None => {
                    let unit = known
                        .get(&item.unit_id)
                        .map(|u| (*u).clone())
                        .unwrap_or_else(|| placeholder_unit(item.unit_id));
                    tree.units.push(UnitNode::new(unit));
                    let ui = tree.units.len() - 1;
                    unit_index.insert(item.unit_id, ui);
                    ui
                }
            };

            let group_label = normalize_label(&item.work_group);
            let gi = match group_index.get(&(ui, group_label.clone())) {
                Some(&gi) => gi,
                None => {
                    tree.units[ui]
                        .groups
                        .push(WorkGroupNode::new(group_label.clone()));
                    let gi = tree.units[ui].groups.len() - 1;
                    group_index.insert((ui, group_label), gi);
                    gi
                }
            };

            let base_label = BaseKey::parse(&item.description).label().to_owned();
            let bi = match base_index.get(&(ui, gi, base_label.clone())) {
                Some(&bi) => bi,
                None => {
                    tree.units[ui].groups[gi]
                        .base_items
                        .push(BaseItemNode::new(base_label.clone()));
                    let bi = tree.units[ui].groups[gi].base_items.len() - 1;
                    base_index.insert((ui, gi, base_label), bi);
                    bi
                }
            };

            tree.totals.add(kind, value);
            tree.item_count += 1;

            let unit = &mut tree.units[ui];
            unit.totals.add(kind, value);
            unit.item_count += 1;

            let group = &mut unit.groups[gi];
            group.totals.add(kind, value);
            group.item_count += 1;

            let base = &mut group.base_items[bi];
            base.totals.add(kind, value);
            base.item_count += 1;

            let bucket = match base.buckets.iter().position(|b| b.kind == kind) {
                Some(pos) => &mut base.buckets[pos],
                None => {
                    base.buckets.push(TransactionBucket::new(kind));
                    base.buckets.last_mut().expect("bucket just added")
                }
            };
            bucket.total += value;
            bucket.items.push(item.clone());
        }

        tree
    }
}

/// Stands in for a unit the item list references but metadata never named.
fn placeholder_unit(id: Uuid) -> Unit {
    Unit {
        id,
        position: 0,
        name: UNSPECIFIED_LABEL.to_owned(),
        subdivision: None,
        inventory_number: None,
    }
}

fn normalize_label(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        UNSPECIFIED_LABEL.to_owned()
    } else {
        trimmed.to_owned()
    }
}
