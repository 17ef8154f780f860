//! Amortizable-value and annual amortization calculations.
//!
//! Spanish IRNR lets rental income deduct 3% a year of the construction
//! part of the acquisition cost. The land part is never depreciated, so
//! the split between the two comes from the cadastral values on the IBI
//! receipt.
//!
//! # Calculation steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Sum the validated acquisition documents by type; with none, fall back to the property's raw purchase price |
//! | 2    | Take the cadastral total/land/construction split and check it is consistent |
//! | 3    | Amortizable value = total acquisition × construction share |
//! | 4    | Annual amortization = amortizable value × 3% |
//!
//! A second entry point prorates the annual amortization for a specific
//! year by rented days and splits the result across co-owners. That
//! proration divides by a fixed 365 regardless of leap years; the
//! rented-day calculator next door computes true year lengths. The
//! mismatch is inherited from the filing practice this codifies and is
//! kept as-is.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use m210_core::calculations::amortization::amortizable_value;
//! use m210_core::models::{DeclarationKind, Property, PropertyKind};
//!
//! let property = Property {
//!     id: 1,
//!     client_id: 1,
//!     cadastral_reference: "9872023VH5797S0001WX".to_string(),
//!     address: "Calle Mayor 1, Alicante".to_string(),
//!     kind: PropertyKind::Dwelling,
//!     declaration_kind: DeclarationKind::Rental,
//!     purchase_date: NaiveDate::from_ymd_opt(2019, 5, 10).unwrap(),
//!     purchase_price: dec!(100000.00),
//!     cadastral_total: Some(dec!(80000.00)),
//!     cadastral_land: Some(dec!(24000.00)),
//!     cadastral_construction: Some(dec!(56000.00)),
//!     amortizable_value: None,
//!     annual_amortization: None,
//!     active: true,
//! };
//!
//! // No documents registered yet: the purchase price stands in.
//! let result = amortizable_value(&property, &[]).unwrap();
//!
//! assert_eq!(result.total_acquisition_value, dec!(100000.00));
//! assert_eq!(result.cadastral.construction_pct, dec!(0.7000));
//! assert_eq!(result.amortizable_value, dec!(70000.00));
//! assert_eq!(result.annual_amortization, dec!(2100.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::{round_dp4, round_half_up};
use crate::models::{AcquisitionDocument, AcquisitionKind, OwnerShare, Property};

/// Annual depreciation rate on the construction part (3%).
const AMORTIZATION_RATE: Decimal = Decimal::from_parts(3, 0, 0, false, 2);

/// Fixed proration denominator, even in leap years.
const FIXED_YEAR_DAYS: u32 = 365;

/// Largest tolerated difference between land + construction and the
/// cadastral total.
const CADASTRAL_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Errors from the amortization calculators.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmortizationError {
    /// The property has no usable cadastral total, so the construction
    /// share cannot be derived.
    #[error(
        "cadastral values unavailable; load the IBI receipt with the \
         land/construction split before calculating"
    )]
    MissingCadastralValues,

    /// Land + construction disagrees with the cadastral total beyond the
    /// 0.01 tolerance. Upstream data entry problem; the amounts are
    /// reported for correction.
    #[error(
        "cadastral split mismatch: land {land} € + construction {construction} € \
         does not match total {total} €"
    )]
    CadastralSplitMismatch {
        land: Decimal,
        construction: Decimal,
        total: Decimal,
    },

    /// The per-year proration needs `annual_amortization` on the
    /// property, which only the amortizable-value calculation produces.
    #[error(
        "property #{property_id} has no annual amortization; calculate the \
         amortizable value first"
    )]
    AmortizableValueNotCalculated { property_id: i64 },
}

/// Acquisition cost totals grouped by document type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionBreakdown {
    pub purchase_price: Decimal,
    pub notary_fees: Decimal,
    pub registry_fees: Decimal,
    pub transfer_tax: Decimal,
    pub purchase_vat: Decimal,
    pub purchase_agency_fees: Decimal,
    pub estate_agency_fees: Decimal,
    pub improvements: Decimal,
}

impl AcquisitionBreakdown {
    pub fn total(&self) -> Decimal {
        self.purchase_price
            + self.notary_fees
            + self.registry_fees
            + self.transfer_tax
            + self.purchase_vat
            + self.purchase_agency_fees
            + self.estate_agency_fees
            + self.improvements
    }

    fn add(&mut self, kind: AcquisitionKind, amount: Decimal) {
        match kind {
            AcquisitionKind::PurchasePrice => self.purchase_price += amount,
            AcquisitionKind::NotaryFees => self.notary_fees += amount,
            AcquisitionKind::RegistryFees => self.registry_fees += amount,
            AcquisitionKind::TransferTax => self.transfer_tax += amount,
            AcquisitionKind::PurchaseVat => self.purchase_vat += amount,
            AcquisitionKind::PurchaseAgencyFees => self.purchase_agency_fees += amount,
            AcquisitionKind::EstateAgencyFees => self.estate_agency_fees += amount,
            AcquisitionKind::Improvements => self.improvements += amount,
        }
    }
}

/// The property's cadastral split as used in the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadastralBreakdown {
    pub total: Decimal,
    pub land: Decimal,
    pub construction: Decimal,
    /// Construction share of the total, reported at 4 decimals.
    pub construction_pct: Decimal,
}

/// Result of the amortizable-value calculation. The collaborator layer
/// persists `amortizable_value` and `annual_amortization` back onto the
/// property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizableValue {
    pub property_id: i64,
    pub address: String,
    pub total_acquisition_value: Decimal,
    pub acquisition: AcquisitionBreakdown,
    pub cadastral: CadastralBreakdown,
    pub amortizable_value: Decimal,
    pub annual_amortization: Decimal,
    pub formula: String,
}

/// One co-owner's slice of a year's amortization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAmortization {
    pub client_id: i64,
    pub name: String,
    pub ownership_pct: Decimal,
    pub amortization: Decimal,
}

/// A year's prorated amortization, split across co-owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearAmortization {
    pub property_id: i64,
    pub address: String,
    pub year: i32,
    pub rented_days: u32,
    pub unrented_days: u32,
    pub annual_amortization: Decimal,
    pub prorated_amortization: Decimal,
    pub owners: Vec<OwnerAmortization>,
    pub formula: String,
}

/// Computes a property's amortizable value and annual 3% amortization
/// from its validated acquisition documents.
///
/// With no documents at all, the property's raw purchase price stands in
/// as the sole purchase-price component. That is a degenerate case, not
/// an error, since many files start life before the deed paperwork is
/// loaded.
///
/// # Errors
///
/// * [`AmortizationError::MissingCadastralValues`] — no positive
///   cadastral total on the property.
/// * [`AmortizationError::CadastralSplitMismatch`] — land + construction
///   differs from the total by more than 0.01.
pub fn amortizable_value(
    property: &Property,
    documents: &[AcquisitionDocument],
) -> Result<AmortizableValue, AmortizationError> {
    let mut acquisition = AcquisitionBreakdown::default();
    for doc in documents {
        acquisition.add(doc.kind, doc.amount);
    }

    let mut total_acquisition = acquisition.total();
    if total_acquisition.is_zero() {
        warn!(
            property_id = property.id,
            purchase_price = %property.purchase_price,
            "no acquisition documents; falling back to the raw purchase price"
        );
        total_acquisition = property.purchase_price;
        acquisition.purchase_price = total_acquisition;
    }

    let total = property.cadastral_total.unwrap_or(Decimal::ZERO);
    let land = property.cadastral_land.unwrap_or(Decimal::ZERO);
    let construction = property.cadastral_construction.unwrap_or(Decimal::ZERO);

    if total <= Decimal::ZERO {
        return Err(AmortizationError::MissingCadastralValues);
    }
    if (land + construction - total).abs() > CADASTRAL_TOLERANCE {
        return Err(AmortizationError::CadastralSplitMismatch {
            land,
            construction,
            total,
        });
    }

    // Only the construction is depreciated, never the land.
    let construction_pct = construction / total;
    let amortizable = round_half_up(total_acquisition * construction_pct);
    let annual = round_half_up(amortizable * AMORTIZATION_RATE);

    let formula = format!(
        "{:.2}€ × {:.2}% = {:.2}€ → {:.2}€ × 3% = {:.2}€/año",
        total_acquisition,
        round_half_up(construction_pct * Decimal::ONE_HUNDRED),
        amortizable,
        amortizable,
        annual,
    );

    Ok(AmortizableValue {
        property_id: property.id,
        address: property.address.clone(),
        total_acquisition_value: total_acquisition,
        acquisition,
        cadastral: CadastralBreakdown {
            total,
            land,
            construction,
            construction_pct: round_dp4(construction_pct),
        },
        amortizable_value: amortizable,
        annual_amortization: annual,
        formula,
    })
}

/// Prorates the annual amortization for one year by rented days and
/// splits it across co-owners by ownership percentage.
///
/// The denominator is a fixed 365 even in leap years. Each owner's slice
/// rounds to cents independently, so the slices conserve the prorated
/// total to within one cent per owner.
///
/// # Errors
///
/// * [`AmortizationError::AmortizableValueNotCalculated`] — the property
///   has no positive `annual_amortization` yet.
pub fn amortization_for_year(
    property: &Property,
    rented_days: u32,
    owners: &[OwnerShare],
    year: i32,
) -> Result<YearAmortization, AmortizationError> {
    let annual = property
        .annual_amortization
        .filter(|amount| *amount > Decimal::ZERO)
        .ok_or(AmortizationError::AmortizableValueNotCalculated {
            property_id: property.id,
        })?;

    let prorated = round_half_up(
        annual * Decimal::from(rented_days) / Decimal::from(FIXED_YEAR_DAYS),
    );
    let unrented_days = FIXED_YEAR_DAYS.saturating_sub(rented_days);

    let share_total: Decimal = owners.iter().map(|o| o.ownership_pct).sum();
    if share_total > Decimal::ONE_HUNDRED {
        warn!(
            property_id = property.id,
            %share_total,
            "co-owner percentages sum past 100; allocations will overlap"
        );
    }

    let allocations = owners
        .iter()
        .map(|owner| OwnerAmortization {
            client_id: owner.client_id,
            name: owner.name.clone(),
            ownership_pct: owner.ownership_pct,
            amortization: round_half_up(
                prorated * owner.ownership_pct / Decimal::ONE_HUNDRED,
            ),
        })
        .collect();

    let formula = format!("{annual:.2}€ × ({rented_days}/{FIXED_YEAR_DAYS}) = {prorated:.2}€");

    Ok(YearAmortization {
        property_id: property.id,
        address: property.address.clone(),
        year,
        rented_days,
        unrented_days,
        annual_amortization: annual,
        prorated_amortization: prorated,
        owners: allocations,
        formula,
    })
}
