//! Storage factory for runtime backend selection

use std::sync::Arc;

use sqlx::postgres::PgPool;

use crate::domain::storage::{DocumentEntity, DocumentStore};
use crate::domain::DomainError;

use super::in_memory::InMemoryDocumentStore;
use super::postgres::{PostgresConfig, PostgresDocumentStore};

/// Supported storage backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory store (for testing/development)
    InMemory,
    /// PostgreSQL store
    Postgres,
}

impl StorageType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory store configuration
    InMemory,
    /// PostgreSQL store configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates an in-memory store configuration
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a PostgreSQL store configuration
    pub fn postgres(config: PostgresConfig) -> Self {
        Self::Postgres(config)
    }

    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    /// Returns the backend type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// Factory for creating document store instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Creates a document store based on the configuration
    pub async fn create<E>(
        config: &StorageConfig,
        table_name: &str,
    ) -> Result<Arc<dyn DocumentStore<E>>, DomainError>
    where
        E: DocumentEntity + 'static,
    {
        match config {
            StorageConfig::InMemory => {
                Ok(Arc::new(InMemoryDocumentStore::<E>::new()))
            }
            StorageConfig::Postgres(pg_config) => {
                let store = PostgresDocumentStore::<E>::connect(pg_config, table_name).await?;
                store.ensure_table().await?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Creates an in-memory document store
    pub fn create_in_memory<E>() -> Arc<InMemoryDocumentStore<E>>
    where
        E: DocumentEntity,
    {
        Arc::new(InMemoryDocumentStore::new())
    }

    /// Creates a PostgreSQL document store
    pub async fn create_postgres<E>(
        config: &PostgresConfig,
        table_name: &str,
    ) -> Result<Arc<PostgresDocumentStore<E>>, DomainError>
    where
        E: DocumentEntity + 'static,
    {
        let store = PostgresDocumentStore::connect(config, table_name).await?;
        store.ensure_table().await?;
        Ok(Arc::new(store))
    }

    /// Creates a PostgreSQL document store over an existing pool. The table
    /// must already exist or be bootstrapped separately via `ensure_table`.
    pub fn create_postgres_with_pool<E>(
        pool: PgPool,
        table_name: &str,
    ) -> Arc<PostgresDocumentStore<E>>
    where
        E: DocumentEntity + 'static,
    {
        Arc::new(PostgresDocumentStore::new(pool, table_name))
    }
}
