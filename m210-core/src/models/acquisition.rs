use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Cost components that make up a property's total acquisition value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionKind {
    PurchasePrice,
    NotaryFees,
    RegistryFees,
    /// ITP, the transfer tax on second-hand purchases.
    TransferTax,
    /// VAT paid on new-build purchases.
    PurchaseVat,
    /// Gestoría handling the purchase paperwork.
    PurchaseAgencyFees,
    /// Real-estate agency commission.
    EstateAgencyFees,
    Improvements,
}

impl AcquisitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PurchasePrice => "purchase_price",
            Self::NotaryFees => "notary_fees",
            Self::RegistryFees => "registry_fees",
            Self::TransferTax => "transfer_tax",
            Self::PurchaseVat => "purchase_vat",
            Self::PurchaseAgencyFees => "purchase_agency_fees",
            Self::EstateAgencyFees => "estate_agency_fees",
            Self::Improvements => "improvements",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "purchase_price" => Some(Self::PurchasePrice),
            "notary_fees" => Some(Self::NotaryFees),
            "registry_fees" => Some(Self::RegistryFees),
            "transfer_tax" => Some(Self::TransferTax),
            "purchase_vat" => Some(Self::PurchaseVat),
            "purchase_agency_fees" => Some(Self::PurchaseAgencyFees),
            "estate_agency_fees" => Some(Self::EstateAgencyFees),
            "improvements" => Some(Self::Improvements),
            _ => None,
        }
    }
}

/// A documented acquisition cost (deed, invoice, tax receipt).
///
/// Only documents with `validated` set should enter the amortizable-value
/// calculation; the persistence layer filters on that flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionDocument {
    pub id: i64,
    pub property_id: i64,
    pub kind: AcquisitionKind,
    pub amount: Decimal,
    pub document_date: NaiveDate,
    pub validated: bool,
}
