mod acquisition;
mod client;
mod co_owner;
mod contract;
mod declaration;
mod expense;
mod negative_income;
mod property;

pub use acquisition::{AcquisitionDocument, AcquisitionKind};
pub use client::Client;
pub use co_owner::{CoOwner, OwnerShare};
pub use contract::{ContractStatus, RentalContract};
pub use declaration::{Declaration, NewDeclaration};
pub use expense::{Expense, ExpenseKind};
pub use negative_income::{
    CARRY_FORWARD_YEARS, Compensation, NegativeIncomeConcept, NegativeIncomeRecord,
    NegativeIncomeStatus, NewNegativeIncomeRecord,
};
pub use property::{DeclarationKind, Property, PropertyKind};
