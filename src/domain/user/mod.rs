//! User domain
//!
//! This module provides the user account entity, the store trait backing
//! lookups and persistence, and the validator applied before commits.

mod entity;
mod store;
mod validator;

pub use entity::{IdentityUser, UserId, UserLogin};
pub use store::{normalize_email, UserStore};
pub use validator::{Messages, UserValidator, ValidationReport, ValidatorOptions};

#[cfg(test)]
pub use store::mock::MockUserStore;
