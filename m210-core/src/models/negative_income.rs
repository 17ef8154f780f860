use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Negative results stay compensable for this many years past the origin
/// year (Spanish IRNR carry-forward window).
pub const CARRY_FORWARD_YEARS: i32 = 4;

/// Which qualifying expense categories produced the negative result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeIncomeConcept {
    Repairs,
    Interest,
    Mixed,
}

impl NegativeIncomeConcept {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Repairs => "repairs",
            Self::Interest => "interest",
            Self::Mixed => "mixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "repairs" => Some(Self::Repairs),
            "interest" => Some(Self::Interest),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeIncomeStatus {
    Pending,
    Compensated,
    Expired,
}

/// A carry-forward negative rental result awaiting compensation.
///
/// Pending amount, expiry year, and status are derivations, not stored
/// fields, so they can never drift from `amount`/`compensated_amount`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativeIncomeRecord {
    pub id: i64,
    pub client_id: i64,
    pub property_id: i64,
    pub origin_year: i32,
    pub amount: Decimal,
    pub concept: NegativeIncomeConcept,
    pub compensated_amount: Decimal,
}

impl NegativeIncomeRecord {
    pub fn pending_amount(&self) -> Decimal {
        self.amount - self.compensated_amount
    }

    /// Last year in which this record may still be compensated.
    pub fn expiry_year(&self) -> i32 {
        self.origin_year + CARRY_FORWARD_YEARS
    }

    /// Status as of `reference_year` (typically the year being declared).
    pub fn status(&self, reference_year: i32) -> NegativeIncomeStatus {
        if self.pending_amount() <= Decimal::ZERO {
            NegativeIncomeStatus::Compensated
        } else if reference_year > self.expiry_year() {
            NegativeIncomeStatus::Expired
        } else {
            NegativeIncomeStatus::Pending
        }
    }
}

/// Shape for creating negative-income records (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNegativeIncomeRecord {
    pub client_id: i64,
    pub property_id: i64,
    pub origin_year: i32,
    pub amount: Decimal,
    pub concept: NegativeIncomeConcept,
}

/// Application of part of a negative-income record against a later
/// declaration's taxable base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compensation {
    pub id: i64,
    pub negative_income_id: i64,
    pub declaration_id: i64,
    pub year: i32,
    pub amount: Decimal,
}
