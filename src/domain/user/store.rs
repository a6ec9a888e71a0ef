//! User store trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{IdentityUser, UserId, UserLogin};
use crate::domain::DomainError;

/// Normalize an email address for lookup: trimmed and ASCII-lowercased.
/// Email lookups compare normalized forms, so `find_by_email` is
/// case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Store for user accounts and their login credential bindings.
///
/// All lookups report absence as `Ok(None)`; an `Err` always means the
/// lookup itself failed.
#[async_trait]
pub trait UserStore: Send + Sync + Debug {
    /// Persist a new user. A user with an empty id gets a freshly generated
    /// one assigned before the write. Fails with a duplicate-key error if
    /// the id is already taken.
    async fn create(&self, user: IdentityUser) -> Result<IdentityUser, DomainError>;

    /// Overwrite all mutable fields of an existing user. Fails with a
    /// not-found error if the id is unknown (never upserts) and with an
    /// invalid-argument error on an unassigned id.
    async fn update(&self, user: &IdentityUser) -> Result<IdentityUser, DomainError>;

    /// Remove a user by id, along with every login binding carried by the
    /// user document. Removing an absent id is a no-op returning false.
    async fn delete(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Get a user by id
    async fn find_by_id(&self, id: &UserId) -> Result<Option<IdentityUser>, DomainError>;

    /// Get a user by exact, case-sensitive username match
    async fn find_by_username(&self, username: &str) -> Result<Option<IdentityUser>, DomainError>;

    /// Get a user by email, compared case-insensitively on the normalized
    /// address (see [`normalize_email`])
    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityUser>, DomainError>;

    /// Get the user holding an exact (provider, key) login binding
    async fn find_by_login(
        &self,
        provider: &str,
        provider_key: &str,
    ) -> Result<Option<IdentityUser>, DomainError>;

    /// Bind a login credential to a user and persist the change. Fails with
    /// a duplicate-binding error if the (provider, key) pair is already
    /// bound to any user, and with an invalid-argument error on an empty id.
    async fn add_login(&self, id: &UserId, login: UserLogin)
        -> Result<IdentityUser, DomainError>;

    /// Remove a login binding from a user and persist the change. Removing
    /// a binding the user does not hold leaves the user unchanged.
    async fn remove_login(
        &self,
        id: &UserId,
        provider: &str,
        provider_key: &str,
    ) -> Result<IdentityUser, DomainError>;

    /// Check if a user id exists
    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
