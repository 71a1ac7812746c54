pub mod calculations;
pub mod db;
pub mod models;
pub mod service;
pub mod validation;

pub use calculations::{EngineError, TaxEngine};
pub use db::repository::{RepositoryError, TaxRepository};
pub use models::*;
pub use service::{TaxError, TaxService};
pub use validation::ValidationError;
