use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a property is used, from the cadastral registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Dwelling,
    Garage,
    Commercial,
    Office,
    Land,
    Other,
}

impl PropertyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dwelling => "dwelling",
            Self::Garage => "garage",
            Self::Commercial => "commercial",
            Self::Office => "office",
            Self::Land => "land",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dwelling" => Some(Self::Dwelling),
            "garage" => Some(Self::Garage),
            "commercial" => Some(Self::Commercial),
            "office" => Some(Self::Office),
            "land" => Some(Self::Land),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Which Modelo 210 regime the property declares under.
///
/// `Mixed` properties are rented part of the year and imputed for the
/// vacant remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    Imputation,
    Rental,
    Mixed,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Imputation => "imputation",
            Self::Rental => "rental",
            Self::Mixed => "mixed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "imputation" => Some(Self::Imputation),
            "rental" => Some(Self::Rental),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}

/// A Spanish property owned by one or more non-resident clients.
///
/// `amortizable_value` and `annual_amortization` are derived by the
/// amortizable-value calculator and written back by the collaborator
/// layer; they are `None` until that calculation has run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    /// Principal owner; co-ownership splits live in [`super::CoOwner`] rows.
    pub client_id: i64,
    pub cadastral_reference: String,
    pub address: String,
    pub kind: PropertyKind,
    pub declaration_kind: DeclarationKind,
    pub purchase_date: NaiveDate,
    pub purchase_price: Decimal,
    pub cadastral_total: Option<Decimal>,
    pub cadastral_land: Option<Decimal>,
    pub cadastral_construction: Option<Decimal>,
    pub amortizable_value: Option<Decimal>,
    pub annual_amortization: Option<Decimal>,
    pub active: bool,
}
