//! Deductible-expense classification for a rental year.
//!
//! Spanish IRNR splits rental expenses into two buckets:
//!
//! | Bucket | Categories | Treatment |
//! |--------|------------|-----------|
//! | Proportional | IBI, community fees, insurance, mortgage interest, utilities, upkeep | deductible for the rented fraction of the year: amount × rented days / 365 |
//! | Fully deductible | repairs, management fees, agency fees, legal fees, advertising, other | deductible in full, no proration |
//!
//! The bucket is a function of [`ExpenseKind`], never stored. Like the
//! amortization proration, the denominator is a fixed 365 even in leap
//! years.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::{Expense, ExpenseKind};

/// Fixed proration denominator, even in leap years.
const FIXED_YEAR_DAYS: u32 = 365;

/// Registered vs deductible totals for one proportional expense kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProportionalExpense {
    pub total_amount: Decimal,
    pub deductible_amount: Decimal,
}

/// Deductible-expense breakdown for one property and year.
///
/// Map keys are [`ExpenseKind`] in their natural order, so serialized
/// output is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductibleExpenses {
    pub property_id: i64,
    pub year: i32,
    pub rented_days: u32,
    pub unrented_days: u32,
    pub proportional: BTreeMap<ExpenseKind, ProportionalExpense>,
    pub proportional_subtotal: Decimal,
    pub fully_deductible: BTreeMap<ExpenseKind, Decimal>,
    pub fully_deductible_subtotal: Decimal,
    pub total_deductible: Decimal,
    pub formula: String,
}

/// Classifies a property's expenses for `year` and computes the
/// deductible totals given `rented_days`.
///
/// Proportional amounts accumulate at full decimal precision; the
/// reported per-kind amounts, subtotals, and grand total are rounded to
/// cents when the result is built. An empty expense list is a valid
/// all-zero result.
pub fn deductible_expenses(
    expenses: &[Expense],
    rented_days: u32,
    year: i32,
) -> DeductibleExpenses {
    let rented_fraction =
        Decimal::from(rented_days) / Decimal::from(FIXED_YEAR_DAYS);

    let mut proportional: BTreeMap<ExpenseKind, ProportionalExpense> = BTreeMap::new();
    let mut fully_deductible: BTreeMap<ExpenseKind, Decimal> = BTreeMap::new();
    let mut proportional_subtotal = Decimal::ZERO;
    let mut fully_subtotal = Decimal::ZERO;

    for expense in expenses {
        if expense.kind.is_proportional() {
            let deductible = expense.amount * rented_fraction;
            let entry = proportional
                .entry(expense.kind)
                .or_insert_with(|| ProportionalExpense {
                    total_amount: Decimal::ZERO,
                    deductible_amount: Decimal::ZERO,
                });
            entry.total_amount += expense.amount;
            entry.deductible_amount += deductible;
            proportional_subtotal += deductible;
        } else {
            *fully_deductible.entry(expense.kind).or_insert(Decimal::ZERO) += expense.amount;
            fully_subtotal += expense.amount;
        }
    }

    for entry in proportional.values_mut() {
        entry.total_amount = round_half_up(entry.total_amount);
        entry.deductible_amount = round_half_up(entry.deductible_amount);
    }
    for amount in fully_deductible.values_mut() {
        *amount = round_half_up(*amount);
    }
    let proportional_subtotal = round_half_up(proportional_subtotal);
    let fully_subtotal = round_half_up(fully_subtotal);
    let total_deductible = round_half_up(proportional_subtotal + fully_subtotal);

    let formula = format!(
        "Proporcionales: {proportional_subtotal:.2}€ × ({rented_days}/{FIXED_YEAR_DAYS}) \
         | 100%: {fully_subtotal:.2}€"
    );

    DeductibleExpenses {
        property_id: expenses.first().map(|e| e.property_id).unwrap_or_default(),
        year,
        rented_days,
        unrented_days: FIXED_YEAR_DAYS.saturating_sub(rented_days),
        proportional,
        proportional_subtotal,
        fully_deductible,
        fully_deductible_subtotal: fully_subtotal,
        total_deductible,
        formula,
    }
}
