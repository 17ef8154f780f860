pub mod calculations;
pub mod db;
pub mod models;

pub use db::repository::{DeclarationRepository, RepositoryError};
pub use models::*;
