//! Rented-day calculation for a property's fiscal year.
//!
//! The rented-day total is the base every proration downstream depends on
//! (amortization, proportional expenses), so this module refuses to count
//! anything while the contract data is inconsistent: overlapping contracts
//! are reported as an error naming both contracts, never resolved
//! silently.
//!
//! Day counts are inclusive of both endpoints: a contract covering
//! 2024-01-01 through 2024-01-31 counts 31 days. Contracts are clipped to
//! the year before counting, and the year length is the real calendar
//! length (365 or 366).
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use m210_core::calculations::rental_days::rented_days_in_year;
//! use m210_core::models::{ContractStatus, RentalContract};
//!
//! let contract = RentalContract {
//!     id: 1,
//!     property_id: 7,
//!     start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
//!     end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
//!     monthly_rent: dec!(1000.00),
//!     tenant_first_name: "Anna".to_string(),
//!     tenant_last_name: Some("Kowalska".to_string()),
//!     status: ContractStatus::Active,
//! };
//!
//! let summary = rented_days_in_year(&[contract], 2023).unwrap();
//!
//! assert_eq!(summary.days_in_year, 365);
//! assert_eq!(summary.total_rented_days, 365);
//! assert_eq!(summary.total_unrented_days, 0);
//! assert_eq!(summary.occupancy_pct, dec!(100.00));
//! // 1000 € × (365 / 30.44 average days per month)
//! assert_eq!(summary.estimated_total_income, dec!(11990.80));
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{ContractStatus, RentalContract};

/// Average days per month used to estimate rental income from a monthly
/// rent and a day count.
const AVG_DAYS_PER_MONTH: Decimal = Decimal::from_parts(3044, 0, 0, false, 2);

/// Errors from the rented-day calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RentalDaysError {
    /// Two or more non-cancelled contracts cover the same dates. The
    /// details string names each offending pair with tenants and ranges
    /// so the source records can be fixed.
    #[error(
        "{count} overlapping contract pair(s); rented days cannot be counted \
         until the contracts are fixed: {details}"
    )]
    OverlappingContracts { count: usize, details: String },

    /// A contract ends before it starts.
    #[error("contract #{contract_id} has end date {end} before start date {start}")]
    InvalidContractRange {
        contract_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Clipped day counts summed past the year length. Unreachable when
    /// the overlap check holds; kept as a guard against clipping bugs.
    #[error(
        "rented days ({rented}) exceed the {days_in_year} days of year {year}; \
         check the contracts for overlaps"
    )]
    DaysExceedYear {
        rented: u32,
        year: i32,
        days_in_year: u32,
    },

    /// The year cannot be represented as calendar dates.
    #[error("year {0} is out of calendar range")]
    InvalidYear(i32),
}

/// One contract's contribution to the year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractDays {
    pub contract_id: i64,
    pub tenant: String,
    pub status: ContractStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Contract interval clipped to the year.
    pub effective_start: NaiveDate,
    pub effective_end: NaiveDate,
    pub days_in_year: u32,
    pub monthly_rent: Decimal,
    /// monthly_rent × (days / 30.44), rounded to cents.
    pub estimated_income: Decimal,
}

/// Per-year rented-day summary for one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalYearSummary {
    pub property_id: i64,
    pub year: i32,
    /// 365, or 366 in leap years.
    pub days_in_year: u32,
    pub contracts: Vec<ContractDays>,
    pub contract_count: usize,
    pub total_rented_days: u32,
    pub total_unrented_days: u32,
    pub occupancy_pct: Decimal,
    pub estimated_total_income: Decimal,
}

/// Returns every pair of non-cancelled contracts whose date ranges
/// intersect, ordered by start date.
///
/// Two contracts overlap when `end_a ≥ start_b && start_a ≤ end_b`.
/// Cancelled contracts never participate.
pub fn overlapping_pairs(
    contracts: &[RentalContract],
) -> Vec<(&RentalContract, &RentalContract)> {
    let mut valid: Vec<&RentalContract> = contracts
        .iter()
        .filter(|c| c.status.counts_for_rental())
        .collect();
    valid.sort_by_key(|c| c.start_date);

    let mut pairs = Vec::new();
    for i in 0..valid.len() {
        for j in (i + 1)..valid.len() {
            let (a, b) = (valid[i], valid[j]);
            if a.end_date >= b.start_date && a.start_date <= b.end_date {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

/// Computes the rented-day summary for `year` from a property's
/// contracts.
///
/// Overlap detection runs first: with any overlapping pair present no
/// days are counted at all. Contracts whose status is cancelled, or whose
/// range does not touch the year, are skipped. No contracts in the year
/// is a valid zero result, not an error.
///
/// # Errors
///
/// * [`RentalDaysError::OverlappingContracts`] — inconsistent data, fix
///   the contracts.
/// * [`RentalDaysError::InvalidContractRange`] — a contract ends before
///   it starts.
/// * [`RentalDaysError::DaysExceedYear`] — defensive, see the variant.
pub fn rented_days_in_year(
    contracts: &[RentalContract],
    year: i32,
) -> Result<RentalYearSummary, RentalDaysError> {
    for contract in contracts.iter().filter(|c| c.status.counts_for_rental()) {
        if contract.end_date < contract.start_date {
            return Err(RentalDaysError::InvalidContractRange {
                contract_id: contract.id,
                start: contract.start_date,
                end: contract.end_date,
            });
        }
    }

    let overlaps = overlapping_pairs(contracts);
    if !overlaps.is_empty() {
        let details = overlaps
            .iter()
            .map(|(a, b)| {
                format!(
                    "contract #{} ({}, {} - {}) overlaps contract #{} ({}, {} - {})",
                    a.id,
                    a.tenant_full_name(),
                    a.start_date,
                    a.end_date,
                    b.id,
                    b.tenant_full_name(),
                    b.start_date,
                    b.end_date,
                )
            })
            .collect::<Vec<_>>()
            .join("; ");
        return Err(RentalDaysError::OverlappingContracts {
            count: overlaps.len(),
            details,
        });
    }

    let year_start =
        NaiveDate::from_ymd_opt(year, 1, 1).ok_or(RentalDaysError::InvalidYear(year))?;
    let year_end =
        NaiveDate::from_ymd_opt(year, 12, 31).ok_or(RentalDaysError::InvalidYear(year))?;
    let days_in_year = (year_end - year_start).num_days() as u32 + 1;

    let property_id = contracts.first().map(|c| c.property_id).unwrap_or_default();

    let in_year: Vec<&RentalContract> = contracts
        .iter()
        .filter(|c| {
            c.status.counts_for_rental() && c.start_date <= year_end && c.end_date >= year_start
        })
        .collect();

    if in_year.is_empty() {
        warn!(property_id, year, "no rental contracts intersect the year");
        return Ok(RentalYearSummary {
            property_id,
            year,
            days_in_year,
            contracts: Vec::new(),
            contract_count: 0,
            total_rented_days: 0,
            total_unrented_days: days_in_year,
            occupancy_pct: Decimal::ZERO,
            estimated_total_income: Decimal::ZERO,
        });
    }

    let mut lines = Vec::with_capacity(in_year.len());
    let mut total_rented: u32 = 0;

    for contract in in_year {
        let effective_start = contract.start_date.max(year_start);
        let effective_end = contract.end_date.min(year_end);
        let days = (effective_end - effective_start).num_days() as u32 + 1;
        total_rented += days;

        let months = Decimal::from(days) / AVG_DAYS_PER_MONTH;
        let estimated_income = round_half_up(contract.monthly_rent * months);

        lines.push(ContractDays {
            contract_id: contract.id,
            tenant: contract.tenant_full_name(),
            status: contract.status,
            start_date: contract.start_date,
            end_date: contract.end_date,
            effective_start,
            effective_end,
            days_in_year: days,
            monthly_rent: contract.monthly_rent,
            estimated_income,
        });
    }

    if total_rented > days_in_year {
        return Err(RentalDaysError::DaysExceedYear {
            rented: total_rented,
            year,
            days_in_year,
        });
    }

    let occupancy_pct = round_half_up(
        Decimal::from(total_rented) * Decimal::ONE_HUNDRED / Decimal::from(days_in_year),
    );
    let estimated_total_income =
        round_half_up(lines.iter().map(|l| l.estimated_income).sum::<Decimal>());

    Ok(RentalYearSummary {
        property_id,
        year,
        days_in_year,
        contract_count: lines.len(),
        contracts: lines,
        total_rented_days: total_rented,
        total_unrented_days: days_in_year - total_rented,
        occupancy_pct,
        estimated_total_income,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Captures the warning emitted when no contracts touch the year.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    fn contract(
        id: i64,
        start: NaiveDate,
        end: NaiveDate,
        status: ContractStatus,
    ) -> RentalContract {
        RentalContract {
            id,
            property_id: 7,
            start_date: start,
            end_date: end,
            monthly_rent: dec!(900.00),
            tenant_first_name: format!("Tenant{id}"),
            tenant_last_name: None,
            status,
        }
    }

    // =========================================================================
    // overlapping_pairs tests
    // =========================================================================

    #[test]
    fn overlapping_pairs_finds_intersecting_contracts() {
        let contracts = [
            contract(1, date(2024, 1, 1), date(2024, 6, 30), ContractStatus::Finished),
            contract(2, date(2024, 5, 1), date(2024, 12, 31), ContractStatus::Active),
        ];

        let pairs = overlapping_pairs(&contracts);

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0.id, 1);
        assert_eq!(pairs[0].1.id, 2);
    }

    #[test]
    fn overlapping_pairs_ignores_cancelled_contracts() {
        let contracts = [
            contract(1, date(2024, 1, 1), date(2024, 6, 30), ContractStatus::Active),
            contract(2, date(2024, 5, 1), date(2024, 12, 31), ContractStatus::Cancelled),
        ];

        let pairs = overlapping_pairs(&contracts);

        assert_eq!(pairs.len(), 0);
    }

    #[test]
    fn overlapping_pairs_accepts_back_to_back_contracts() {
        let contracts = [
            contract(1, date(2024, 1, 1), date(2024, 6, 30), ContractStatus::Finished),
            contract(2, date(2024, 7, 1), date(2024, 12, 31), ContractStatus::Active),
        ];

        let pairs = overlapping_pairs(&contracts);

        assert_eq!(pairs.len(), 0);
    }

    #[test]
    fn overlapping_pairs_flags_shared_endpoint_day() {
        // Same calendar day on both contracts counts double: overlap.
        let contracts = [
            contract(1, date(2024, 1, 1), date(2024, 6, 30), ContractStatus::Finished),
            contract(2, date(2024, 6, 30), date(2024, 12, 31), ContractStatus::Active),
        ];

        let pairs = overlapping_pairs(&contracts);

        assert_eq!(pairs.len(), 1);
    }

    // =========================================================================
    // rented_days_in_year tests
    // =========================================================================

    #[test]
    fn full_year_contract_covers_every_day() {
        let c = contract(1, date(2023, 1, 1), date(2023, 12, 31), ContractStatus::Active);

        let summary = rented_days_in_year(&[c], 2023).unwrap();

        assert_eq!(summary.days_in_year, 365);
        assert_eq!(summary.total_rented_days, 365);
        assert_eq!(summary.total_unrented_days, 0);
        assert_eq!(summary.occupancy_pct, dec!(100.00));
    }

    #[test]
    fn leap_year_has_366_days() {
        let c = contract(1, date(2024, 1, 1), date(2024, 12, 31), ContractStatus::Active);

        let summary = rented_days_in_year(&[c], 2024).unwrap();

        assert_eq!(summary.days_in_year, 366);
        assert_eq!(summary.total_rented_days, 366);
        assert_eq!(summary.total_unrented_days, 0);
    }

    #[test]
    fn day_count_is_inclusive_of_both_endpoints() {
        let c = contract(1, date(2024, 1, 1), date(2024, 1, 31), ContractStatus::Finished);

        let summary = rented_days_in_year(&[c], 2024).unwrap();

        assert_eq!(summary.total_rented_days, 31);
        assert_eq!(summary.total_unrented_days, 335);
    }

    #[test]
    fn contract_spanning_years_is_clipped_to_the_year() {
        let c = contract(1, date(2023, 11, 1), date(2024, 2, 29), ContractStatus::Finished);

        let summary = rented_days_in_year(&[c], 2024).unwrap();

        // Jan (31) + Feb (29, leap).
        assert_eq!(summary.total_rented_days, 60);
        assert_eq!(summary.contracts[0].effective_start, date(2024, 1, 1));
        assert_eq!(summary.contracts[0].effective_end, date(2024, 2, 29));
    }

    #[test]
    fn no_contracts_in_year_is_a_zero_result() {
        let _guard = init_test_tracing();
        let c = contract(1, date(2022, 1, 1), date(2022, 12, 31), ContractStatus::Finished);

        let summary = rented_days_in_year(&[c], 2024).unwrap();

        assert_eq!(summary.contract_count, 0);
        assert_eq!(summary.total_rented_days, 0);
        assert_eq!(summary.total_unrented_days, 366);
        assert_eq!(summary.occupancy_pct, dec!(0));
        assert_eq!(summary.estimated_total_income, dec!(0));
    }

    #[test]
    fn empty_contract_list_is_a_zero_result() {
        let summary = rented_days_in_year(&[], 2023).unwrap();

        assert_eq!(summary.property_id, 0);
        assert_eq!(summary.total_rented_days, 0);
        assert_eq!(summary.total_unrented_days, 365);
    }

    #[test]
    fn cancelled_contract_contributes_no_days() {
        let c = contract(1, date(2024, 1, 1), date(2024, 12, 31), ContractStatus::Cancelled);

        let summary = rented_days_in_year(&[c], 2024).unwrap();

        assert_eq!(summary.total_rented_days, 0);
        assert_eq!(summary.total_unrented_days, 366);
    }

    #[test]
    fn day_sum_invariant_holds_for_partial_rentals() {
        let a = contract(1, date(2024, 1, 1), date(2024, 3, 31), ContractStatus::Finished);
        let b = contract(2, date(2024, 6, 1), date(2024, 8, 31), ContractStatus::Finished);

        let summary = rented_days_in_year(&[a, b], 2024).unwrap();

        assert_eq!(
            summary.total_rented_days + summary.total_unrented_days,
            summary.days_in_year
        );
    }

    #[test]
    fn estimated_income_uses_average_month_length() {
        // 182 days rented at 1000 €/month: 1000 × (182 / 30.44) = 5978.975… → 5978.98.
        let mut c = contract(1, date(2024, 1, 1), date(2024, 6, 30), ContractStatus::Finished);
        c.monthly_rent = dec!(1000.00);

        let summary = rented_days_in_year(&[c], 2024).unwrap();

        assert_eq!(summary.total_rented_days, 182);
        assert_eq!(summary.contracts[0].estimated_income, dec!(5978.98));
        assert_eq!(summary.estimated_total_income, dec!(5978.98));
    }

    #[test]
    fn occupancy_percentage_is_rounded_to_cents() {
        let c = contract(1, date(2024, 1, 1), date(2024, 6, 30), ContractStatus::Finished);

        let summary = rented_days_in_year(&[c], 2024).unwrap();

        // 182 / 366 × 100 = 49.7267…
        assert_eq!(summary.occupancy_pct, dec!(49.73));
    }

    #[test]
    fn overlapping_contracts_fail_before_any_day_is_counted() {
        let a = contract(1, date(2024, 1, 1), date(2024, 6, 30), ContractStatus::Finished);
        let b = contract(2, date(2024, 5, 1), date(2024, 12, 31), ContractStatus::Active);

        let err = rented_days_in_year(&[a, b], 2024).unwrap_err();

        match err {
            RentalDaysError::OverlappingContracts { count, details } => {
                assert_eq!(count, 1);
                assert!(details.contains("contract #1"), "details: {details}");
                assert!(details.contains("contract #2"), "details: {details}");
                assert!(details.contains("2024-01-01 - 2024-06-30"), "details: {details}");
                assert!(details.contains("2024-05-01 - 2024-12-31"), "details: {details}");
            }
            other => panic!("expected OverlappingContracts, got {other:?}"),
        }
    }

    #[test]
    fn overlap_error_names_the_tenants() {
        let mut a = contract(1, date(2024, 1, 1), date(2024, 6, 30), ContractStatus::Finished);
        a.tenant_first_name = "Anna".to_string();
        a.tenant_last_name = Some("Kowalska".to_string());
        let mut b = contract(2, date(2024, 5, 1), date(2024, 12, 31), ContractStatus::Active);
        b.tenant_first_name = "Piotr".to_string();

        let err = rented_days_in_year(&[a, b], 2024).unwrap_err();

        match err {
            RentalDaysError::OverlappingContracts { details, .. } => {
                assert!(details.contains("Anna Kowalska"), "details: {details}");
                assert!(details.contains("Piotr"), "details: {details}");
            }
            other => panic!("expected OverlappingContracts, got {other:?}"),
        }
    }

    #[test]
    fn overlap_involving_cancelled_contract_is_allowed() {
        let a = contract(1, date(2024, 1, 1), date(2024, 6, 30), ContractStatus::Cancelled);
        let b = contract(2, date(2024, 5, 1), date(2024, 12, 31), ContractStatus::Active);

        let summary = rented_days_in_year(&[a, b], 2024).unwrap();

        // Only the active contract counts: May 1 to Dec 31.
        assert_eq!(summary.total_rented_days, 245);
    }

    #[test]
    fn inverted_contract_range_is_rejected() {
        let c = contract(1, date(2024, 6, 1), date(2024, 1, 1), ContractStatus::Active);

        let err = rented_days_in_year(&[c], 2024).unwrap_err();

        assert_eq!(
            err,
            RentalDaysError::InvalidContractRange {
                contract_id: 1,
                start: date(2024, 6, 1),
                end: date(2024, 1, 1),
            }
        );
    }

    #[test]
    fn three_way_overlap_reports_every_pair() {
        let a = contract(1, date(2024, 1, 1), date(2024, 12, 31), ContractStatus::Active);
        let b = contract(2, date(2024, 2, 1), date(2024, 3, 31), ContractStatus::Finished);
        let c = contract(3, date(2024, 3, 1), date(2024, 4, 30), ContractStatus::Finished);

        let err = rented_days_in_year(&[a, b, c], 2024).unwrap_err();

        match err {
            RentalDaysError::OverlappingContracts { count, .. } => assert_eq!(count, 3),
            other => panic!("expected OverlappingContracts, got {other:?}"),
        }
    }
}
