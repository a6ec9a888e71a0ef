//! In-memory document store implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{DocumentEntity, DocumentKey, DocumentStore};
use crate::domain::DomainError;

/// Thread-safe in-memory document store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug)]
pub struct InMemoryDocumentStore<E>
where
    E: DocumentEntity,
{
    documents: RwLock<HashMap<String, E>>,
}

impl<E> Default for InMemoryDocumentStore<E>
where
    E: DocumentEntity,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E> InMemoryDocumentStore<E>
where
    E: DocumentEntity,
{
    /// Creates a new empty in-memory store
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a store pre-populated with documents
    pub fn with_documents(documents: Vec<E>) -> Self {
        let store = Self::new();
        {
            let mut map = store.documents.write().unwrap();

            for document in documents {
                map.insert(document.key().as_str().to_string(), document);
            }
        }
        store
    }
}

#[async_trait]
impl<E> DocumentStore<E> for InMemoryDocumentStore<E>
where
    E: DocumentEntity + 'static,
{
    async fn get(&self, key: &E::Key) -> Result<Option<E>, DomainError> {
        let documents = self.documents.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(documents.get(key.as_str()).cloned())
    }

    async fn list(&self) -> Result<Vec<E>, DomainError> {
        let documents = self.documents.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(documents.values().cloned().collect())
    }

    async fn insert(&self, document: E) -> Result<E, DomainError> {
        let key = document.key().as_str().to_string();
        let mut documents = self.documents.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if documents.contains_key(&key) {
            return Err(DomainError::duplicate_key(format!(
                "Document with key '{}' already exists",
                key
            )));
        }

        documents.insert(key, document.clone());
        Ok(document)
    }

    async fn update(&self, document: E) -> Result<E, DomainError> {
        let key = document.key().as_str().to_string();
        let mut documents = self.documents.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if !documents.contains_key(&key) {
            return Err(DomainError::not_found(format!(
                "Document with key '{}' not found",
                key
            )));
        }

        documents.insert(key, document.clone());
        Ok(document)
    }

    async fn remove(&self, key: &E::Key) -> Result<bool, DomainError> {
        let mut documents = self.documents.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(documents.remove(key.as_str()).is_some())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        let mut documents = self.documents.write().map_err(|e| {
            DomainError::storage(format!("Failed to acquire write lock: {}", e))
        })?;

        documents.clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let documents = self.documents.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(documents.len())
    }

    async fn exists(&self, key: &E::Key) -> Result<bool, DomainError> {
        let documents = self.documents.read().map_err(|e| {
            DomainError::storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(documents.contains_key(key.as_str()))
    }
}
