pub mod base_key;
pub mod item;
pub mod tree;
pub mod unit;

pub use base_key::{BaseKey, BASE_KEY_DELIMITER};
pub use item::{ItemDraft, ItemPatch, ReceptionItem, TransactionKind, UNSPECIFIED_LABEL};
pub use tree::{
    BaseItemNode, HierarchyTree, Totals, TransactionBucket, UnitNode, WorkGroupNode,
};
pub use unit::{Reception, Unit};
