//! Domain layer - Core business logic and entities

pub mod error;
pub mod storage;
pub mod user;

pub use error::DomainError;
pub use storage::{DocumentEntity, DocumentKey, DocumentStore};
pub use user::{
    normalize_email, IdentityUser, Messages, UserId, UserLogin, UserStore, UserValidator,
    ValidationReport, ValidatorOptions,
};
