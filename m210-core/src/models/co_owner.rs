use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ownership split row linking a property to one of its owners.
///
/// Percentages across a property's active co-owners must not exceed 100;
/// a sole owner with no co-owner rows is treated as 100%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoOwner {
    pub id: i64,
    pub property_id: i64,
    pub client_id: i64,
    pub ownership_pct: Decimal,
    pub start_date: NaiveDate,
    pub active: bool,
}

/// The share view the allocators consume: who owns how much.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerShare {
    pub client_id: i64,
    pub name: String,
    pub ownership_pct: Decimal,
}
