//! Identity Store
//!
//! User account validation and persistence over pluggable document
//! storage, with support for:
//! - Policy-driven username and email validation
//! - Uniqueness checks against the backing store
//! - External login bindings (provider, provider key)
//! - In-memory and PostgreSQL storage backends

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use config::IdentityConfig;
use domain::user::{IdentityUser, UserStore, UserValidator, ValidatorOptions};
use domain::DomainError;
use infrastructure::storage::{StorageConfig, StorageFactory, StorageType};
use infrastructure::user::DocumentUserStore;
use tracing::info;

/// Create a user store backed by the configured storage backend.
/// Unknown backend names fall back to in-memory storage.
pub async fn create_user_store(config: &AppConfig) -> Result<DocumentUserStore, DomainError> {
    let backend =
        StorageType::from_str(&config.storage.backend).unwrap_or(StorageType::InMemory);

    info!("Storage backend: {:?}", backend);

    let storage_config = match backend {
        StorageType::InMemory => StorageConfig::in_memory(),
        StorageType::Postgres => {
            let url = config.storage.url.clone().ok_or_else(|| {
                DomainError::invalid_argument(
                    "storage.url is required for the postgres backend",
                )
            })?;
            StorageConfig::postgres_url(url)
        }
    };

    let documents =
        StorageFactory::create::<IdentityUser>(&storage_config, &config.storage.table).await?;

    Ok(DocumentUserStore::new(documents))
}

/// Create a validator over the given store with policies taken from
/// configuration
pub fn create_validator<S>(store: Arc<S>, config: &IdentityConfig) -> UserValidator<S>
where
    S: UserStore,
{
    let options = ValidatorOptions {
        require_unique_email: config.require_unique_email,
        allow_only_alphanumeric_user_names: config.allow_only_alphanumeric_user_names,
    };

    UserValidator::new(store)
        .with_options(options)
        .with_messages(config.messages.clone())
}

/// Create a store and a validator over it in one step
pub async fn create_user_validator(
    config: &AppConfig,
) -> Result<UserValidator<DocumentUserStore>, DomainError> {
    let store = Arc::new(create_user_store(config).await?);
    Ok(create_validator(store, &config.identity))
}
