//! SQLite storage for allowance bounds and tax brackets.

pub mod factory;
pub mod repository;
mod row;

pub use factory::SqliteRepositoryFactory;
pub use repository::SqliteRepository;
