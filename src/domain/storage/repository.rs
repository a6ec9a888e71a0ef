//! Document store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::entity::DocumentEntity;
#[cfg(test)]
use super::entity::DocumentKey;

/// Generic async store for CRUD and predicate queries over one document
/// collection. Absence is always `Ok(None)` / `Ok(false)`, never an error,
/// so callers can tell "no match" apart from a failed lookup.
#[async_trait]
pub trait DocumentStore<E>: Send + Sync + Debug
where
    E: DocumentEntity + 'static,
{
    /// Retrieves a document by its key
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError>;

    /// Retrieves all documents
    async fn list(&self) -> Result<Vec<E>, DomainError>;

    /// Retrieves all documents matching the predicate
    async fn query(
        &self,
        predicate: &(dyn for<'a> Fn(&'a E) -> bool + Send + Sync),
    ) -> Result<Vec<E>, DomainError> {
        let documents = self.list().await?;
        Ok(documents.into_iter().filter(|d| predicate(d)).collect())
    }

    /// Retrieves the first document matching the predicate
    async fn find_first(
        &self,
        predicate: &(dyn for<'a> Fn(&'a E) -> bool + Send + Sync),
    ) -> Result<Option<E>, DomainError> {
        let documents = self.list().await?;
        Ok(documents.into_iter().find(|d| predicate(d)))
    }

    /// Inserts a new document, returns a duplicate-key error if the key exists
    async fn insert(&self, document: E) -> Result<E, DomainError>;

    /// Updates an existing document, returns a not-found error if absent
    async fn update(&self, document: E) -> Result<E, DomainError>;

    /// Writes a document (inserts if absent, updates if present)
    async fn upsert(&self, document: E) -> Result<E, DomainError> {
        if self.exists(document.key()).await? {
            self.update(document).await
        } else {
            self.insert(document).await
        }
    }

    /// Removes a document by its key, returns true if a document was removed
    async fn remove(&self, key: &E::Key) -> Result<bool, DomainError>;

    /// Checks if a document exists by its key
    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Returns the count of documents
    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }

    /// Clears all documents (use with caution)
    async fn clear(&self) -> Result<(), DomainError>;
}
