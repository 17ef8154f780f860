use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{
    AcquisitionDocument, Client, CoOwner, Declaration, Expense, NegativeIncomeRecord,
    NewDeclaration, NewNegativeIncomeRecord, Property, RentalContract,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Persistence port the REST collaborator hands to its handlers.
///
/// The calculation engine never touches this trait: handlers fetch the
/// inputs here, call the pure calculators, and persist the results back.
/// Amortization results update the property row; declarations and
/// negative-income records are append-only (recalculating creates new
/// rows).
#[async_trait]
pub trait DeclarationRepository: Send + Sync {
    // Clients
    async fn get_client(&self, id: i64) -> Result<Client, RepositoryError>;
    async fn get_client_by_nie(&self, nie: &str) -> Result<Client, RepositoryError>;

    // Properties
    async fn get_property(&self, id: i64) -> Result<Property, RepositoryError>;
    async fn list_properties_by_client(
        &self,
        client_id: i64,
    ) -> Result<Vec<Property>, RepositoryError>;
    async fn update_property_amortization(
        &self,
        property_id: i64,
        amortizable_value: Decimal,
        annual_amortization: Decimal,
    ) -> Result<(), RepositoryError>;

    // Co-owners
    async fn list_co_owners(&self, property_id: i64) -> Result<Vec<CoOwner>, RepositoryError>;

    // Rental contracts (non-cancelled)
    async fn list_contracts(
        &self,
        property_id: i64,
    ) -> Result<Vec<RentalContract>, RepositoryError>;

    // Acquisition documents (validated only)
    async fn list_validated_documents(
        &self,
        property_id: i64,
    ) -> Result<Vec<AcquisitionDocument>, RepositoryError>;

    // Expenses
    async fn list_expenses(
        &self,
        property_id: i64,
        year: Option<i32>,
    ) -> Result<Vec<Expense>, RepositoryError>;

    // Declarations
    async fn create_declaration(
        &self,
        declaration: NewDeclaration,
    ) -> Result<Declaration, RepositoryError>;
    async fn list_declarations_by_client(
        &self,
        client_id: i64,
        year: Option<i32>,
    ) -> Result<Vec<Declaration>, RepositoryError>;
    async fn list_declarations_by_property(
        &self,
        property_id: i64,
        year: Option<i32>,
    ) -> Result<Vec<Declaration>, RepositoryError>;

    // Negative income
    async fn create_negative_income(
        &self,
        record: NewNegativeIncomeRecord,
    ) -> Result<NegativeIncomeRecord, RepositoryError>;
    async fn list_pending_negative_income(
        &self,
        client_id: i64,
        property_id: i64,
    ) -> Result<Vec<NegativeIncomeRecord>, RepositoryError>;
    async fn register_compensation(
        &self,
        negative_income_id: i64,
        declaration_id: i64,
        year: i32,
        amount: Decimal,
    ) -> Result<(), RepositoryError>;
}
