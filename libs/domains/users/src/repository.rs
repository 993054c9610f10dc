use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::{UserChanges, UserDocument};

/// Storage seam for user documents.
///
/// Each method is a single store request; there are no transactions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new document. Fails if the id is already taken.
    async fn insert(&self, user: UserDocument) -> UserResult<()>;

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<UserDocument>>;

    /// Every document in storage order
    async fn find_all(&self) -> UserResult<Vec<UserDocument>>;

    /// `$set` the given fields on the matching document, returning the matched count
    async fn update_fields(&self, id: ObjectId, changes: UserChanges) -> UserResult<u64>;

    /// Returns the deleted count, zero when nothing matched
    async fn delete(&self, id: ObjectId) -> UserResult<u64>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<Vec<UserDocument>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw stored documents, hashes included
    pub async fn documents(&self) -> Vec<UserDocument> {
        self.users.read().await.clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: UserDocument) -> UserResult<()> {
        let mut users = self.users.write().await;

        if users.iter().any(|u| u.id == user.id) {
            return Err(UserError::Store(format!(
                "duplicate key: _id {} already exists",
                user.id
            )));
        }

        tracing::debug!(user_id = %user.id, "Inserted user");
        users.push(user);
        Ok(())
    }

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<UserDocument>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_all(&self) -> UserResult<Vec<UserDocument>> {
        Ok(self.users.read().await.clone())
    }

    async fn update_fields(&self, id: ObjectId, changes: UserChanges) -> UserResult<u64> {
        let mut users = self.users.write().await;

        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                changes.apply(user);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: ObjectId) -> UserResult<u64> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }
}
