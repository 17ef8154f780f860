//! The Modelo 210 calculation engine.
//!
//! Six pure calculators over the plain records in [`crate::models`]:
//! rented days, amortizable value, yearly amortization allocation,
//! deductible expenses, negative-income resolution, and the imputación
//! tax itself. Every function here is a deterministic transformation of
//! its explicit inputs, with no I/O, no clock reads, and no shared
//! state, so calculations for different properties can run concurrently
//! without coordination.

pub mod amortization;
pub mod common;
pub mod expenses;
pub mod imputation;
pub mod negative_income;
pub mod rental_days;

pub use amortization::{
    AmortizableValue, AmortizationError, OwnerAmortization, YearAmortization,
    amortizable_value, amortization_for_year,
};
pub use expenses::{DeductibleExpenses, ProportionalExpense, deductible_expenses};
pub use imputation::{
    ImputationError, ImputationRequest, ImputationResult, calculate_imputation,
    imputation_declarations,
};
pub use negative_income::{
    DEFAULT_TAX_RATE, NegativeIncomeAssessment, assess_negative_income, max_compensation,
};
pub use rental_days::{
    ContractDays, RentalDaysError, RentalYearSummary, overlapping_pairs, rented_days_in_year,
};
