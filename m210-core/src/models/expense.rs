use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Deductible expense categories for rented property.
///
/// The tax treatment of each category is fixed by Spanish IRNR rules, so
/// it is derived from the variant rather than stored alongside the
/// expense row: [`ExpenseKind::is_proportional`] decides whether the
/// amount is prorated by rented days, and
/// [`ExpenseKind::may_generate_negative_income`] whether a loss caused by
/// this category can be carried forward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    /// IBI, the municipal property tax.
    PropertyTax,
    CommunityFees,
    Insurance,
    MortgageInterest,
    Utilities,
    Upkeep,
    Repairs,
    /// Gestoría handling the rental paperwork.
    ManagementFees,
    /// Real-estate agency commission.
    AgencyFees,
    LegalFees,
    Advertising,
    Other,
}

impl ExpenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PropertyTax => "property_tax",
            Self::CommunityFees => "community_fees",
            Self::Insurance => "insurance",
            Self::MortgageInterest => "mortgage_interest",
            Self::Utilities => "utilities",
            Self::Upkeep => "upkeep",
            Self::Repairs => "repairs",
            Self::ManagementFees => "management_fees",
            Self::AgencyFees => "agency_fees",
            Self::LegalFees => "legal_fees",
            Self::Advertising => "advertising",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "property_tax" => Some(Self::PropertyTax),
            "community_fees" => Some(Self::CommunityFees),
            "insurance" => Some(Self::Insurance),
            "mortgage_interest" => Some(Self::MortgageInterest),
            "utilities" => Some(Self::Utilities),
            "upkeep" => Some(Self::Upkeep),
            "repairs" => Some(Self::Repairs),
            "management_fees" => Some(Self::ManagementFees),
            "agency_fees" => Some(Self::AgencyFees),
            "legal_fees" => Some(Self::LegalFees),
            "advertising" => Some(Self::Advertising),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    /// Proportional expenses are deductible only for the rented fraction
    /// of the year; the rest are deductible in full.
    pub fn is_proportional(&self) -> bool {
        matches!(
            self,
            Self::PropertyTax
                | Self::CommunityFees
                | Self::Insurance
                | Self::MortgageInterest
                | Self::Utilities
                | Self::Upkeep
        )
    }

    /// Only repairs and mortgage interest can push the taxable base below
    /// zero into a carry-forward negative income; every other category
    /// stops at zero.
    pub fn may_generate_negative_income(&self) -> bool {
        matches!(self, Self::Repairs | Self::MortgageInterest)
    }

    /// Label shown on declaration paperwork.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PropertyTax => "IBI (Impuesto Bienes Inmuebles)",
            Self::CommunityFees => "Comunidad de propietarios",
            Self::Insurance => "Seguros",
            Self::MortgageInterest => "Intereses hipoteca",
            Self::Utilities => "Suministros",
            Self::Upkeep => "Gastos de conservación",
            Self::Repairs => "Reparaciones",
            Self::ManagementFees => "Gestoría",
            Self::AgencyFees => "Agencia inmobiliaria",
            Self::LegalFees => "Servicios jurídicos",
            Self::Advertising => "Publicidad",
            Self::Other => "Otros gastos",
        }
    }
}

/// A registered expense against a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub property_id: i64,
    pub kind: ExpenseKind,
    pub description: String,
    pub amount: Decimal,
    pub expense_date: NaiveDate,
    pub validated: bool,
}
