//! User entity and related types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::storage::{DocumentEntity, DocumentKey};

/// User identifier. An empty value means the identifier has not been
/// assigned yet; the store assigns a generated one on create.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create a UserId from a caller-supplied value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Create an unassigned (empty) UserId
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    /// Generate a fresh random UserId
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Whether the identifier has been assigned
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl DocumentKey for UserId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// An external login credential bound to a user: a provider name plus the
/// provider's key for the account. Each (provider, key) pair is unique
/// across the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserLogin {
    provider: String,
    provider_key: String,
}

impl UserLogin {
    /// Create a new login binding
    pub fn new(provider: impl Into<String>, provider_key: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            provider_key: provider_key.into(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn provider_key(&self) -> &str {
        &self.provider_key
    }

    /// Whether this binding matches the given (provider, key) pair exactly
    pub fn matches(&self, provider: &str, provider_key: &str) -> bool {
        self.provider == provider && self.provider_key == provider_key
    }
}

/// User account entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityUser {
    /// Unique identifier; empty until assigned by the caller or the store
    id: UserId,
    /// Account name, checked for charset and uniqueness by the validator
    username: String,
    /// Contact address, checked for shape and uniqueness by the validator
    email: String,
    /// Whether the email address has been confirmed
    #[serde(default)]
    email_confirmed: bool,
    /// External login credential bindings
    #[serde(default)]
    logins: Vec<UserLogin>,
}

impl IdentityUser {
    /// Create a new user without an assigned identifier
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: UserId::unassigned(),
            username: username.into(),
            email: email.into(),
            email_confirmed: false,
            logins: Vec::new(),
        }
    }

    /// Set an explicit identifier on a freshly built user
    pub fn with_id(mut self, id: impl Into<UserId>) -> Self {
        self.id = id.into();
        self
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn email_confirmed(&self) -> bool {
        self.email_confirmed
    }

    pub fn logins(&self) -> &[UserLogin] {
        &self.logins
    }

    /// Whether the given (provider, key) pair is bound to this user
    pub fn has_login(&self, provider: &str, provider_key: &str) -> bool {
        self.logins.iter().any(|l| l.matches(provider, provider_key))
    }

    // Mutators

    /// Update the username
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    /// Update the email address
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Update the email-confirmed flag
    pub fn set_email_confirmed(&mut self, confirmed: bool) {
        self.email_confirmed = confirmed;
    }

    /// Append a login binding. Store-wide uniqueness of the pair is
    /// enforced by the store, not here.
    pub fn add_login(&mut self, login: UserLogin) {
        self.logins.push(login);
    }

    /// Remove a login binding, returns true if one was removed
    pub fn remove_login(&mut self, provider: &str, provider_key: &str) -> bool {
        let before = self.logins.len();
        self.logins.retain(|l| !l.matches(provider, provider_key));
        self.logins.len() < before
    }

    /// Assign the identifier when persisting a user created without one
    pub(crate) fn assign_id(&mut self, id: UserId) {
        self.id = id;
    }
}

impl DocumentEntity for IdentityUser {
    type Key = UserId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
