use async_trait::async_trait;
use tracing::debug;

use super::repository::{RepositoryError, TaxRepository};

/// Which store to open and how to reach it.
///
/// | backend  | connection_string                         |
/// |----------|-------------------------------------------|
/// | `sqlite` | `taxes.db`, `:memory:`, `sqlite::memory:` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// Name of a registered [`RepositoryFactory`].
    pub backend: String,
    /// Handed to the factory as is.
    pub connection_string: String,
}

/// Opens a [`TaxRepository`] for one storage backend. A factory is expected
/// to leave the store migrated and seeded with the baseline allowance bounds
/// and tax brackets.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn create(&self, config: &DbConfig) -> Result<Box<dyn TaxRepository>, RepositoryError>;
}

/// The storage backends compiled into a binary.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: Vec<Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `factory`, replacing any earlier one with the same backend name.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories
            .retain(|existing| existing.backend_name() != factory.backend_name());
        self.factories.push(factory);
    }

    /// Registered backend names, sorted.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.iter().map(|f| f.backend_name()).collect();
        names.sort_unstable();
        names
    }

    /// Opens the store named by `config.backend`.
    ///
    /// # Errors
    ///
    /// [`RepositoryError::Configuration`] for an unregistered backend, or
    /// whatever the factory reports.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn TaxRepository>, RepositoryError> {
        let factory = self
            .factories
            .iter()
            .find(|f| f.backend_name() == config.backend)
            .ok_or_else(|| {
                RepositoryError::Configuration(format!(
                    "unknown backend '{}'; available: {}",
                    config.backend,
                    self.available_backends().join(", ")
                ))
            })?;

        debug!(backend = factory.backend_name(), "opening tax store");
        factory.create(config).await
    }
}
