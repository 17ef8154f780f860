use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DeclarationKind;

/// A persisted Modelo 210 declaration.
///
/// Declarations are immutable once stored: recalculating produces a new
/// row rather than updating this one, so `formula` stays a faithful audit
/// trail of the numbers that were actually filed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub id: i64,
    pub property_id: i64,
    pub client_id: i64,
    pub year: i32,
    /// Rental declarations file quarterly; imputation files annually.
    pub quarter: Option<u8>,
    pub kind: DeclarationKind,
    pub declared_days: u32,
    pub cadastral_base: Option<Decimal>,
    /// Imputation percentage actually applied (1.1 or 2.0), 4 decimals.
    pub applied_pct: Option<Decimal>,
    pub imputed_income: Option<Decimal>,
    pub rental_income: Option<Decimal>,
    pub deductible_expenses: Option<Decimal>,
    pub amortization: Option<Decimal>,
    pub taxable_base: Decimal,
    /// Percentage, e.g. 19 for the EU non-resident rate.
    pub tax_rate: Decimal,
    pub tax_due: Decimal,
    pub ownership_pct: Decimal,
    pub filing_date: Option<NaiveDate>,
    pub formula: Option<String>,
    pub calculated_at: DateTime<Utc>,
}

/// Shape for creating declarations (no id or timestamp).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDeclaration {
    pub property_id: i64,
    pub client_id: i64,
    pub year: i32,
    pub quarter: Option<u8>,
    pub kind: DeclarationKind,
    pub declared_days: u32,
    pub cadastral_base: Option<Decimal>,
    pub applied_pct: Option<Decimal>,
    pub imputed_income: Option<Decimal>,
    pub rental_income: Option<Decimal>,
    pub deductible_expenses: Option<Decimal>,
    pub amortization: Option<Decimal>,
    pub taxable_base: Decimal,
    pub tax_rate: Decimal,
    pub tax_due: Decimal,
    pub ownership_pct: Decimal,
    pub filing_date: Option<NaiveDate>,
    pub formula: Option<String>,
}
