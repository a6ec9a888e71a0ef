//! Document entity traits and types

use std::fmt::Debug;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for types that can be used as document keys
pub trait DocumentKey: Clone + Debug + Send + Sync + Eq + std::hash::Hash {
    /// Returns the key as a string for backends that require string keys
    fn as_str(&self) -> &str;
}

/// Trait for types that can be persisted as documents
pub trait DocumentEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    /// The key type for this document
    type Key: DocumentKey;

    /// Returns the document's key
    fn key(&self) -> &Self::Key;
}
