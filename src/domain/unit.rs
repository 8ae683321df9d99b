//! Scope records supplied alongside line items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A serviced device accepted into the shop; the top grouping level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Unit {
    pub id: Uuid,
    pub position: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdivision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_number: Option<String>,
}

impl Unit {
    pub fn new(position: u32, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            name: name.into(),
            subdivision: None,
            inventory_number: None,
        }
    }

    pub fn with_subdivision(mut self, subdivision: impl Into<String>) -> Self {
        self.subdivision = Some(subdivision.into());
        self
    }

    pub fn with_inventory_number(mut self, inventory_number: impl Into<String>) -> Self {
        self.inventory_number = Some(inventory_number.into());
        self
    }
}

/// The reception scope owning units and their line items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reception {
    pub id: Uuid,
    pub number: String,
    pub date: NaiveDate,
    pub counterparty: String,
}

impl Reception {
    pub fn new(number: impl Into<String>, date: NaiveDate, counterparty: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
            date,
            counterparty: counterparty.into(),
        }
    }
}
