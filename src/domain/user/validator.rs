//! User validation: username and email rules, checked before commit

use std::str::FromStr;
use std::sync::Arc;

use email_address::EmailAddress;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use super::entity::IdentityUser;
use super::store::UserStore;
use crate::domain::DomainError;

/// Charset accepted for usernames when alphanumeric-only mode is on
static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9@_.]+$").unwrap());

/// User-overridable message templates. `{0}` in the invalid/duplicate
/// templates is replaced with the offending value.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    pub user_name_too_short: String,
    pub invalid_user_name: String,
    pub duplicate_name: String,
    pub email_too_short: String,
    pub invalid_email: String,
    pub duplicate_email: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            user_name_too_short: "User name is too short.".to_string(),
            invalid_user_name:
                "User name {0} is invalid. It can only contain letters, digits, '@', '_' or '.'."
                    .to_string(),
            duplicate_name: "User name {0} is already taken.".to_string(),
            email_too_short: "Email is too short.".to_string(),
            invalid_email: "Email {0} is invalid.".to_string(),
            duplicate_email: "Email {0} is already taken.".to_string(),
        }
    }
}

fn render(template: &str, value: &str) -> String {
    template.replace("{0}", value)
}

/// Switches controlling which rules the validator applies
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ValidatorOptions {
    /// Enforce store-wide email uniqueness and well-formedness
    pub require_unique_email: bool,
    /// Restrict usernames to the `[A-Za-z0-9@_.]` charset
    pub allow_only_alphanumeric_user_names: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            require_unique_email: true,
            allow_only_alphanumeric_user_names: true,
        }
    }
}

/// Outcome of a validation run. Failure is a normal result carrying the
/// violated rules' messages in check order, username rules first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    errors: Vec<String>,
}

impl ValidationReport {
    /// A report with no violations
    pub fn success() -> Self {
        Self { errors: Vec::new() }
    }

    /// A report carrying the given violation messages
    pub fn failure(errors: Vec<String>) -> Self {
        Self { errors }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Convert a failed report into a validation error, for callers that
    /// want `?` flow instead of inspecting the report
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(DomainError::validation(self.errors))
        }
    }
}

/// Validates candidate users against the store before they are committed.
///
/// Holds no mutable state; duplicate lookups go through the injected store.
/// The duplicate checks are a best-effort pre-check under concurrent
/// writers: the authoritative guard is the store's duplicate-key rejection
/// at write time.
#[derive(Debug)]
pub struct UserValidator<S: UserStore> {
    store: Arc<S>,
    options: ValidatorOptions,
    messages: Messages,
}

impl<S: UserStore> UserValidator<S> {
    /// Create a validator with default options and messages
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            options: ValidatorOptions::default(),
            messages: Messages::default(),
        }
    }

    /// Replace the rule switches
    pub fn with_options(mut self, options: ValidatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the message templates
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Run all checks against the candidate user, accumulating every
    /// violation. Username checks complete (including their lookup) before
    /// email checks start, so message order is deterministic.
    ///
    /// A store lookup failure aborts validation and surfaces as `Err`; it
    /// is never reported as "no duplicate found".
    pub async fn validate(&self, user: &IdentityUser) -> Result<ValidationReport, DomainError> {
        let mut errors = Vec::new();

        self.validate_username(user, &mut errors).await?;

        if self.options.require_unique_email {
            self.validate_email(user, &mut errors).await?;
        }

        if errors.is_empty() {
            Ok(ValidationReport::success())
        } else {
            debug!(
                user_id = %user.id(),
                violations = errors.len(),
                "User validation failed"
            );
            Ok(ValidationReport::failure(errors))
        }
    }

    async fn validate_username(
        &self,
        user: &IdentityUser,
        errors: &mut Vec<String>,
    ) -> Result<(), DomainError> {
        let username = user.username();

        if username.trim().is_empty() {
            errors.push(self.messages.user_name_too_short.clone());
        } else if self.options.allow_only_alphanumeric_user_names
            && !USERNAME_PATTERN.is_match(username)
        {
            errors.push(render(&self.messages.invalid_user_name, username));
        } else if let Some(owner) = self.store.find_by_username(username).await? {
            if owner.id() != user.id() {
                errors.push(render(&self.messages.duplicate_name, username));
            }
        }

        Ok(())
    }

    async fn validate_email(
        &self,
        user: &IdentityUser,
        errors: &mut Vec<String>,
    ) -> Result<(), DomainError> {
        let email = user.email();

        if email.trim().is_empty() {
            errors.push(self.messages.email_too_short.clone());
            return Ok(());
        }

        if EmailAddress::from_str(email.trim()).is_err() {
            errors.push(render(&self.messages.invalid_email, email));
            return Ok(());
        }

        if let Some(owner) = self.store.find_by_email(email).await? {
            if owner.id() != user.id() {
                errors.push(render(&self.messages.duplicate_email, email));
            }
        }

        Ok(())
    }
}
