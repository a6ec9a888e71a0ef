//! Storage domain - Generic document store abstraction layer

mod entity;
mod repository;

pub use entity::{DocumentEntity, DocumentKey};
pub use repository::DocumentStore;

#[cfg(test)]
pub use repository::mock;
