use std::collections::HashMap;

use async_trait::async_trait;

use super::repository::{DeclarationRepository, RepositoryError};

/// Backend-agnostic connection settings, resolved by a
/// [`RepositoryRegistry`]. `backend` names a registered factory;
/// `connection_string` passes through to it unchanged and means whatever
/// that backend wants it to mean (a file path, a URL, `:memory:`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

/// One implementation per storage backend. A backend crate exports a
/// unit struct implementing this trait and registers it at startup;
/// `create` may run migrations or warm pools before returning.
#[async_trait]
pub trait RepositoryFactory: Send + Sync {
    /// Unique lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn DeclarationRepository>, RepositoryError>;
}

/// Registry of storage backends, keyed by backend name. Registered once
/// at startup, then handed the [`DbConfig`] whenever a repository is
/// needed, so nothing else in the process knows which backend runs.
#[derive(Default)]
pub struct RepositoryRegistry {
    factories: HashMap<&'static str, Box<dyn RepositoryFactory>>,
}

impl RepositoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a backend, replacing any previous factory of the same
    /// name.
    pub fn register(&mut self, factory: Box<dyn RepositoryFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    /// Names of the registered backends, sorted.
    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens a repository through the factory matching `config.backend`.
    ///
    /// # Errors
    ///
    /// * [`RepositoryError::Configuration`] — no backend of that name is
    ///   registered.
    /// * Whatever the chosen factory's `create` returns.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn DeclarationRepository>, RepositoryError> {
        let factory = self.factories.get(config.backend.as_str()).ok_or_else(|| {
            RepositoryError::Configuration(format!(
                "unknown backend '{}'; available: {:?}",
                config.backend,
                self.available_backends()
            ))
        })?;

        factory.create(config).await
    }
}
