//! Document-backed user store implementation

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::storage::DocumentStore;
use crate::domain::user::{normalize_email, IdentityUser, UserId, UserLogin, UserStore};
use crate::domain::DomainError;

/// Storage-backed implementation of [`UserStore`].
///
/// Each user is one document keyed by user id, with login bindings embedded
/// in the document. Secondary lookups (username, email, login) run as
/// predicate queries over the collection.
#[derive(Debug)]
pub struct DocumentUserStore {
    documents: Arc<dyn DocumentStore<IdentityUser>>,
}

impl DocumentUserStore {
    /// Create a new store over the given document collection
    pub fn new(documents: Arc<dyn DocumentStore<IdentityUser>>) -> Self {
        Self { documents }
    }
}

#[async_trait]
impl UserStore for DocumentUserStore {
    async fn create(&self, user: IdentityUser) -> Result<IdentityUser, DomainError> {
        let mut user = user;

        if user.id().is_empty() {
            let id = UserId::generate();
            debug!(user_id = %id, username = %user.username(), "Assigning generated id to new user");
            user.assign_id(id);
        }

        info!(user_id = %user.id(), "Creating user");
        self.documents.insert(user).await
    }

    async fn update(&self, user: &IdentityUser) -> Result<IdentityUser, DomainError> {
        if user.id().is_empty() {
            return Err(DomainError::invalid_argument(
                "Cannot update a user without an assigned id",
            ));
        }

        info!(user_id = %user.id(), "Updating user");
        self.documents.update(user.clone()).await
    }

    async fn delete(&self, id: &UserId) -> Result<bool, DomainError> {
        info!(user_id = %id, "Deleting user");
        // Login bindings live inside the user document and go with it.
        self.documents.remove(id).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<IdentityUser>, DomainError> {
        self.documents.get(id).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<IdentityUser>, DomainError> {
        self.documents
            .find_first(&|u: &IdentityUser| u.username() == username)
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<IdentityUser>, DomainError> {
        let normalized = normalize_email(email);
        self.documents
            .find_first(&|u: &IdentityUser| normalize_email(u.email()) == normalized)
            .await
    }

    async fn find_by_login(
        &self,
        provider: &str,
        provider_key: &str,
    ) -> Result<Option<IdentityUser>, DomainError> {
        self.documents
            .find_first(&|u: &IdentityUser| u.has_login(provider, provider_key))
            .await
    }

    async fn add_login(&self, id: &UserId, login: UserLogin) -> Result<IdentityUser, DomainError> {
        if id.is_empty() {
            return Err(DomainError::invalid_argument(
                "Cannot bind a login to a user without an assigned id",
            ));
        }

        if let Some(owner) = self
            .find_by_login(login.provider(), login.provider_key())
            .await?
        {
            return Err(DomainError::duplicate_binding(format!(
                "Login ({}, {}) is already bound to user '{}'",
                login.provider(),
                login.provider_key(),
                owner.id()
            )));
        }

        let mut user = self
            .documents
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        info!(user_id = %id, provider = %login.provider(), "Binding login");
        user.add_login(login);
        self.documents.update(user).await
    }

    async fn remove_login(
        &self,
        id: &UserId,
        provider: &str,
        provider_key: &str,
    ) -> Result<IdentityUser, DomainError> {
        let mut user = self
            .documents
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if !user.remove_login(provider, provider_key) {
            return Ok(user);
        }

        info!(user_id = %id, provider = %provider, "Removing login binding");
        self.documents.update(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::storage::mock::MockDocumentStore;
    use crate::infrastructure::storage::InMemoryDocumentStore;

    fn create_store() -> DocumentUserStore {
        let documents = Arc::new(InMemoryDocumentStore::<IdentityUser>::new());
        DocumentUserStore::new(documents)
    }

    fn create_test_user(id: &str, username: &str, email: &str) -> IdentityUser {
        IdentityUser::new(username, email).with_id(id)
    }

    #[tokio::test]
    async fn test_create_and_find_by_id() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");

        store.create(user.clone()).await.unwrap();

        let retrieved = store.find_by_id(user.id()).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().username(), "testuser");
    }

    #[tokio::test]
    async fn test_create_assigns_generated_id() {
        let store = create_store();
        let user = IdentityUser::new("testuser", "test@example.com");

        let created = store.create(user).await.unwrap();

        assert!(!created.id().is_empty());
        assert!(uuid::Uuid::parse_str(created.id().as_str()).is_ok());

        let retrieved = store.find_by_id(created.id()).await.unwrap();
        assert!(retrieved.is_some());
    }

    #[tokio::test]
    async fn test_create_keeps_explicit_id() {
        let store = create_store();
        let user = create_test_user("custom-id", "testuser", "test@example.com");

        let created = store.create(user).await.unwrap();
        assert_eq!(created.id().as_str(), "custom-id");
    }

    #[tokio::test]
    async fn test_create_duplicate_id() {
        let store = create_store();
        store
            .create(create_test_user("user-1", "first", "first@example.com"))
            .await
            .unwrap();

        let result = store
            .create(create_test_user("user-1", "second", "second@example.com"))
            .await;
        assert!(matches!(result, Err(DomainError::DuplicateKey { .. })));
    }

    #[tokio::test]
    async fn test_update() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");
        store.create(user.clone()).await.unwrap();

        let mut updated = store.find_by_id(user.id()).await.unwrap().unwrap();
        updated.set_email_confirmed(true);
        updated.set_email("changed@example.com");
        store.update(&updated).await.unwrap();

        let retrieved = store.find_by_id(user.id()).await.unwrap().unwrap();
        assert!(retrieved.email_confirmed());
        assert_eq!(retrieved.email(), "changed@example.com");
    }

    #[tokio::test]
    async fn test_update_reflected_in_find_by_email() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");
        store.create(user.clone()).await.unwrap();

        let mut updated = store.find_by_id(user.id()).await.unwrap().unwrap();
        updated.set_email("changed@example.com");
        updated.set_email_confirmed(true);
        store.update(&updated).await.unwrap();

        let by_new_email = store
            .find_by_email("changed@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_new_email.id(), user.id());
        assert!(by_new_email.email_confirmed());

        let by_old_email = store.find_by_email("test@example.com").await.unwrap();
        assert!(by_old_email.is_none());
    }

    #[tokio::test]
    async fn test_update_nonexistent() {
        let store = create_store();
        let user = create_test_user("ghost", "testuser", "test@example.com");

        let result = store.update(&user).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_unassigned_id() {
        let store = create_store();
        let user = IdentityUser::new("testuser", "test@example.com");

        let result = store.update(&user).await;
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");
        store.create(user.clone()).await.unwrap();

        assert!(store.delete(user.id()).await.unwrap());
        assert!(store.find_by_id(user.id()).await.unwrap().is_none());

        // Second delete is a no-op
        assert!(!store.delete(user.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_login_bindings() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");
        store.create(user.clone()).await.unwrap();
        store
            .add_login(user.id(), UserLogin::new("google", "key-1"))
            .await
            .unwrap();

        store.delete(user.id()).await.unwrap();

        let found = store.find_by_login("google", "key-1").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_username_exact_match() {
        let store = create_store();
        store
            .create(create_test_user("user-1", "testuser", "test@example.com"))
            .await
            .unwrap();

        let found = store.find_by_username("testuser").await.unwrap();
        assert!(found.is_some());

        let miss = store.find_by_username("TestUser").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_find_by_email_case_insensitive() {
        let store = create_store();
        store
            .create(create_test_user("user-1", "testuser", "Bob@Example.COM"))
            .await
            .unwrap();

        let found = store.find_by_email("bob@example.com").await.unwrap();
        assert!(found.is_some());
        assert_eq!(found.unwrap().id().as_str(), "user-1");
    }

    #[tokio::test]
    async fn test_find_by_login() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");
        store.create(user.clone()).await.unwrap();
        store
            .add_login(user.id(), UserLogin::new("google", "key-1"))
            .await
            .unwrap();

        let found = store.find_by_login("google", "key-1").await.unwrap();
        assert_eq!(found.unwrap().id().as_str(), "user-1");

        let miss = store.find_by_login("google", "other-key").await.unwrap();
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_add_login_persists() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");
        store.create(user.clone()).await.unwrap();

        let returned = store
            .add_login(user.id(), UserLogin::new("google", "key-1"))
            .await
            .unwrap();
        assert!(returned.has_login("google", "key-1"));

        let retrieved = store.find_by_id(user.id()).await.unwrap().unwrap();
        assert!(retrieved.has_login("google", "key-1"));
    }

    #[tokio::test]
    async fn test_add_login_duplicate_binding_other_user() {
        let store = create_store();
        let first = create_test_user("user-1", "first", "first@example.com");
        let second = create_test_user("user-2", "second", "second@example.com");
        store.create(first.clone()).await.unwrap();
        store.create(second.clone()).await.unwrap();

        store
            .add_login(first.id(), UserLogin::new("google", "key-1"))
            .await
            .unwrap();

        let result = store
            .add_login(second.id(), UserLogin::new("google", "key-1"))
            .await;
        assert!(matches!(result, Err(DomainError::DuplicateBinding { .. })));
    }

    #[tokio::test]
    async fn test_add_login_duplicate_binding_same_user() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");
        store.create(user.clone()).await.unwrap();

        store
            .add_login(user.id(), UserLogin::new("google", "key-1"))
            .await
            .unwrap();

        let result = store
            .add_login(user.id(), UserLogin::new("google", "key-1"))
            .await;
        assert!(matches!(result, Err(DomainError::DuplicateBinding { .. })));
    }

    #[tokio::test]
    async fn test_add_login_unassigned_id() {
        let store = create_store();

        let result = store
            .add_login(&UserId::unassigned(), UserLogin::new("google", "key-1"))
            .await;
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn test_add_login_unknown_user() {
        let store = create_store();

        let result = store
            .add_login(&UserId::new("ghost"), UserLogin::new("google", "key-1"))
            .await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_remove_login_persists() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");
        store.create(user.clone()).await.unwrap();
        store
            .add_login(user.id(), UserLogin::new("google", "key-1"))
            .await
            .unwrap();

        let returned = store
            .remove_login(user.id(), "google", "key-1")
            .await
            .unwrap();
        assert!(!returned.has_login("google", "key-1"));

        let found = store.find_by_login("google", "key-1").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_remove_login_absent_binding_is_noop() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");
        store.create(user.clone()).await.unwrap();

        let returned = store
            .remove_login(user.id(), "google", "never-bound")
            .await
            .unwrap();
        assert_eq!(returned.id().as_str(), "user-1");
        assert!(returned.logins().is_empty());
    }

    #[tokio::test]
    async fn test_remove_login_unknown_user() {
        let store = create_store();

        let result = store.remove_login(&UserId::new("ghost"), "google", "key-1").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_exists() {
        let store = create_store();
        let user = create_test_user("user-1", "testuser", "test@example.com");

        assert!(!store.exists(user.id()).await.unwrap());

        store.create(user.clone()).await.unwrap();

        assert!(store.exists(user.id()).await.unwrap());
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let documents = Arc::new(
            MockDocumentStore::<IdentityUser>::new().with_error("Connection refused"),
        );
        let store = DocumentUserStore::new(documents);

        let result = store.find_by_username("anyone").await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_creates() {
        let store = Arc::new(create_store());
        let mut handles = Vec::new();

        for i in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create(IdentityUser::new(
                        format!("user{}", i),
                        format!("user{}@example.com", i),
                    ))
                    .await
            }));
        }

        let mut ids = Vec::new();
        for handle in handles {
            let created = handle.await.unwrap().unwrap();
            ids.push(created.id().clone());
        }

        for id in &ids {
            assert!(store.exists(id).await.unwrap());
        }
    }
}
