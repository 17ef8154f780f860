//! Negative-income (renta negativa) resolution for a rental year.
//!
//! Net rental result is income minus deductible expenses minus
//! amortization. When that goes negative, only the part caused by
//! repairs and mortgage interest can be carried forward as a compensable
//! negative income; a loss caused purely by other expense categories
//! just zeroes the taxable base and is gone. The base itself is never
//! negative either way.
//!
//! Compensation against later declarations is capped at the smaller of
//! the pending amount and the target declaration's taxable base; the
//! 4-year expiry window lives on
//! [`crate::models::NegativeIncomeRecord::expiry_year`] and is enforced
//! by the collaborator layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{Expense, ExpenseKind, NegativeIncomeConcept, CARRY_FORWARD_YEARS};

/// EU non-resident tax rate as a fraction (19%).
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(19, 0, 0, false, 2);

/// Outcome of the negative-income resolution for one property/year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativeIncomeAssessment {
    pub property_id: i64,
    pub year: i32,
    pub rental_income: Decimal,
    pub deductible_expenses: Decimal,
    pub amortization: Decimal,
    /// Raw registered totals per qualifying category.
    pub repairs: Decimal,
    pub mortgage_interest: Decimal,
    pub other_expenses: Decimal,
    /// income − expenses − amortization, before any floor.
    pub result_before_limits: Decimal,
    pub has_negative_income: bool,
    /// Carry-forward-eligible amount (zero when none).
    pub negative_income: Decimal,
    pub concept: Option<NegativeIncomeConcept>,
    /// Never negative.
    pub taxable_base: Decimal,
    pub tax_due: Decimal,
    pub notes: String,
}

/// Resolves whether a rental year produced a compensable negative income
/// and computes the final taxable base and tax.
///
/// `expenses` is the raw expense list for the year; it is reclassified
/// here because the qualifying cap uses the registered repair and
/// mortgage-interest totals, not the prorated deductible amounts.
/// `tax_rate` is a fraction (use [`DEFAULT_TAX_RATE`] for the 19%
/// non-resident EU rate).
pub fn assess_negative_income(
    rental_income: Decimal,
    deductible_expenses: Decimal,
    amortization: Decimal,
    expenses: &[Expense],
    tax_rate: Decimal,
    year: i32,
) -> NegativeIncomeAssessment {
    let mut repairs = Decimal::ZERO;
    let mut mortgage_interest = Decimal::ZERO;
    let mut other_expenses = Decimal::ZERO;

    for expense in expenses {
        match expense.kind {
            ExpenseKind::Repairs => repairs += expense.amount,
            ExpenseKind::MortgageInterest => mortgage_interest += expense.amount,
            _ => other_expenses += expense.amount,
        }
    }

    let property_id = expenses.first().map(|e| e.property_id).unwrap_or_default();
    let result_before_limits = rental_income - deductible_expenses - amortization;

    let mut has_negative_income = false;
    let mut negative_income = Decimal::ZERO;
    let mut concept = None;
    let taxable_base;
    let notes;

    if result_before_limits < Decimal::ZERO {
        let qualifying = repairs + mortgage_interest;
        taxable_base = Decimal::ZERO;

        if qualifying > Decimal::ZERO {
            has_negative_income = true;
            negative_income = result_before_limits.abs().min(qualifying);
            concept = Some(if repairs > Decimal::ZERO && mortgage_interest > Decimal::ZERO {
                NegativeIncomeConcept::Mixed
            } else if repairs > Decimal::ZERO {
                NegativeIncomeConcept::Repairs
            } else {
                NegativeIncomeConcept::Interest
            });
            notes = format!(
                "Renta negativa de {negative_income:.2}€. Se puede compensar hasta {}.",
                year + CARRY_FORWARD_YEARS
            );
        } else {
            warn!(
                property_id,
                year,
                result = %result_before_limits,
                "negative result from non-qualifying expenses only; base floored at zero"
            );
            notes = "Renta cero. Solo hay gastos ordinarios (no generan renta negativa \
                     compensable)."
                .to_string();
        }
    } else {
        taxable_base = result_before_limits;
        notes = "Renta positiva. No hay rentas negativas.".to_string();
    }

    let tax_due = round_half_up(taxable_base * tax_rate);

    NegativeIncomeAssessment {
        property_id,
        year,
        rental_income,
        deductible_expenses,
        amortization,
        repairs,
        mortgage_interest,
        other_expenses,
        result_before_limits,
        has_negative_income,
        negative_income: round_half_up(negative_income),
        concept,
        taxable_base: round_half_up(taxable_base),
        tax_due,
        notes,
    }
}

/// Largest amount of a negative-income record that may be applied
/// against a declaration: the smaller of what is still pending and the
/// declaration's taxable base, never below zero.
pub fn max_compensation(pending_amount: Decimal, declaration_base: Decimal) -> Decimal {
    pending_amount.min(declaration_base).max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn expense(id: i64, kind: ExpenseKind, amount: Decimal) -> Expense {
        Expense {
            id,
            property_id: 42,
            kind,
            description: kind.display_name().to_string(),
            amount,
            expense_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            validated: true,
        }
    }

    /// Captures warnings emitted on the non-compensable-loss path.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    // =========================================================================
    // assess_negative_income tests
    // =========================================================================

    #[test]
    fn positive_result_taxes_the_full_base() {
        let expenses = vec![expense(1, ExpenseKind::PropertyTax, dec!(400.00))];

        let result = assess_negative_income(
            dec!(6000.00),
            dec!(400.00),
            dec!(1000.00),
            &expenses,
            DEFAULT_TAX_RATE,
            2024,
        );

        assert_eq!(result.result_before_limits, dec!(4600.00));
        assert_eq!(result.taxable_base, dec!(4600.00));
        assert_eq!(result.tax_due, dec!(874.00));
        assert!(!result.has_negative_income);
        assert_eq!(result.concept, None);
    }

    #[test]
    fn repairs_loss_becomes_carry_forward_negative_income() {
        // income 1000, expenses 1800 (repairs 1500, other 300): pre-limit −800,
        // repairs cover the whole loss.
        let expenses = vec![
            expense(1, ExpenseKind::Repairs, dec!(1500.00)),
            expense(2, ExpenseKind::ManagementFees, dec!(300.00)),
        ];

        let result = assess_negative_income(
            dec!(1000.00),
            dec!(1800.00),
            dec!(0.00),
            &expenses,
            DEFAULT_TAX_RATE,
            2024,
        );

        assert_eq!(result.result_before_limits, dec!(-800.00));
        assert!(result.has_negative_income);
        assert_eq!(result.negative_income, dec!(800.00));
        assert_eq!(result.concept, Some(NegativeIncomeConcept::Repairs));
        assert_eq!(result.taxable_base, dec!(0.00));
        assert_eq!(result.tax_due, dec!(0.00));
    }

    #[test]
    fn negative_income_is_capped_at_the_qualifying_total() {
        // Loss of 2000 but only 600 of it is repairs: only 600 carries forward.
        let expenses = vec![
            expense(1, ExpenseKind::Repairs, dec!(600.00)),
            expense(2, ExpenseKind::Other, dec!(2400.00)),
        ];

        let result = assess_negative_income(
            dec!(1000.00),
            dec!(3000.00),
            dec!(0.00),
            &expenses,
            DEFAULT_TAX_RATE,
            2024,
        );

        assert_eq!(result.result_before_limits, dec!(-2000.00));
        assert_eq!(result.negative_income, dec!(600.00));
        assert_eq!(result.taxable_base, dec!(0.00));
    }

    #[test]
    fn interest_only_loss_is_tagged_interest() {
        let expenses = vec![expense(1, ExpenseKind::MortgageInterest, dec!(2000.00))];

        let result = assess_negative_income(
            dec!(1000.00),
            dec!(2000.00),
            dec!(0.00),
            &expenses,
            DEFAULT_TAX_RATE,
            2024,
        );

        assert_eq!(result.concept, Some(NegativeIncomeConcept::Interest));
        assert_eq!(result.negative_income, dec!(1000.00));
    }

    #[test]
    fn repairs_plus_interest_loss_is_tagged_mixed() {
        let expenses = vec![
            expense(1, ExpenseKind::Repairs, dec!(900.00)),
            expense(2, ExpenseKind::MortgageInterest, dec!(600.00)),
        ];

        let result = assess_negative_income(
            dec!(500.00),
            dec!(1500.00),
            dec!(0.00),
            &expenses,
            DEFAULT_TAX_RATE,
            2024,
        );

        assert_eq!(result.concept, Some(NegativeIncomeConcept::Mixed));
        assert_eq!(result.negative_income, dec!(1000.00));
    }

    #[test]
    fn loss_from_ordinary_expenses_only_floors_at_zero_without_a_record() {
        let _guard = init_test_tracing();
        let expenses = vec![
            expense(1, ExpenseKind::CommunityFees, dec!(1200.00)),
            expense(2, ExpenseKind::ManagementFees, dec!(800.00)),
        ];

        let result = assess_negative_income(
            dec!(1000.00),
            dec!(2000.00),
            dec!(0.00),
            &expenses,
            DEFAULT_TAX_RATE,
            2024,
        );

        assert_eq!(result.result_before_limits, dec!(-1000.00));
        assert!(!result.has_negative_income);
        assert_eq!(result.negative_income, dec!(0.00));
        assert_eq!(result.concept, None);
        assert_eq!(result.taxable_base, dec!(0.00));
        assert_eq!(result.tax_due, dec!(0.00));
    }

    #[test]
    fn amortization_participates_in_the_pre_limit_result() {
        let expenses = vec![expense(1, ExpenseKind::Repairs, dec!(500.00))];

        let result = assess_negative_income(
            dec!(1000.00),
            dec!(500.00),
            dec!(800.00),
            &expenses,
            DEFAULT_TAX_RATE,
            2024,
        );

        // 1000 − 500 − 800 = −300; repairs cover it.
        assert_eq!(result.result_before_limits, dec!(-300.00));
        assert_eq!(result.negative_income, dec!(300.00));
        assert_eq!(result.concept, Some(NegativeIncomeConcept::Repairs));
    }

    #[test]
    fn zero_result_is_positive_branch_with_zero_tax() {
        let result = assess_negative_income(
            dec!(1000.00),
            dec!(1000.00),
            dec!(0.00),
            &[],
            DEFAULT_TAX_RATE,
            2024,
        );

        assert!(!result.has_negative_income);
        assert_eq!(result.taxable_base, dec!(0.00));
        assert_eq!(result.tax_due, dec!(0.00));
    }

    #[test]
    fn taxable_base_is_never_negative() {
        let cases = [
            (dec!(0.00), dec!(5000.00), dec!(2000.00)),
            (dec!(100.00), dec!(99.00), dec!(0.00)),
            (dec!(1000.00), dec!(4000.00), dec!(1000.00)),
        ];

        for (income, expenses_total, amortization) in cases {
            let result = assess_negative_income(
                income,
                expenses_total,
                amortization,
                &[],
                DEFAULT_TAX_RATE,
                2024,
            );
            assert!(
                result.taxable_base >= Decimal::ZERO,
                "base went negative for income {income}"
            );
        }
    }

    #[test]
    fn notes_name_the_compensation_deadline() {
        let expenses = vec![expense(1, ExpenseKind::Repairs, dec!(1500.00))];

        let result = assess_negative_income(
            dec!(1000.00),
            dec!(1800.00),
            dec!(0.00),
            &expenses,
            DEFAULT_TAX_RATE,
            2023,
        );

        assert_eq!(
            result.notes,
            "Renta negativa de 800.00€. Se puede compensar hasta 2027."
        );
    }

    // =========================================================================
    // max_compensation tests
    // =========================================================================

    #[test]
    fn compensation_is_capped_by_pending_amount() {
        assert_eq!(max_compensation(dec!(300.00), dec!(900.00)), dec!(300.00));
    }

    #[test]
    fn compensation_is_capped_by_declaration_base() {
        assert_eq!(max_compensation(dec!(800.00), dec!(450.00)), dec!(450.00));
    }

    #[test]
    fn compensation_never_goes_negative() {
        assert_eq!(max_compensation(dec!(-50.00), dec!(450.00)), dec!(0.00));
        assert_eq!(max_compensation(dec!(800.00), dec!(0.00)), dec!(0.00));
    }
}
