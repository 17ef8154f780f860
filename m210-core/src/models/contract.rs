use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Finished,
    Cancelled,
    Renewed,
}

impl ContractStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Finished => "finished",
            Self::Cancelled => "cancelled",
            Self::Renewed => "renewed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "finished" => Some(Self::Finished),
            "cancelled" => Some(Self::Cancelled),
            "renewed" => Some(Self::Renewed),
            _ => None,
        }
    }

    /// Whether contracts in this status count toward rented days.
    /// Cancelled contracts never do.
    pub fn counts_for_rental(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// A rental contract on a property. `end_date` is inclusive and must not
/// precede `start_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalContract {
    pub id: i64,
    pub property_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub monthly_rent: Decimal,
    pub tenant_first_name: String,
    pub tenant_last_name: Option<String>,
    pub status: ContractStatus,
}

impl RentalContract {
    pub fn tenant_full_name(&self) -> String {
        match &self.tenant_last_name {
            Some(last) => format!("{} {}", self.tenant_first_name, last)
                .trim()
                .to_string(),
            None => self.tenant_first_name.clone(),
        }
    }
}
