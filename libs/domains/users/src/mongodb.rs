//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database,
    bson::{Document, doc, oid::ObjectId},
};
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{UserChanges, UserDocument};
use crate::repository::UserRepository;

pub const DEFAULT_COLLECTION: &str = "users";

/// MongoDB implementation of the UserRepository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Repository over the `users` collection of `db`
    ///
    /// # Example
    /// ```ignore
    /// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
    /// let repo = MongoUserRepository::new(&client.database("app"));
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<UserDocument>(collection_name),
        }
    }
}

/// The `$set` body for `changes`, holding only the fields that change
pub fn set_document(changes: &UserChanges) -> Document {
    let mut set = Document::new();

    if let Some(ref username) = changes.username {
        set.insert("username", username);
    }
    if let Some(ref email) = changes.email {
        set.insert("email", email);
    }
    if let Some(ref name) = changes.name {
        set.insert("name", name);
    }
    if let Some(ref hash) = changes.password_hash {
        set.insert("password", hash);
    }
    if let Some(admin) = changes.admin {
        set.insert("admin", admin);
    }

    set
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn insert(&self, user: UserDocument) -> UserResult<()> {
        self.collection.insert_one(&user).await?;
        tracing::info!("User inserted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<UserDocument>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> UserResult<Vec<UserDocument>> {
        let mut cursor = self.collection.find(doc! {}).await?;

        // A document that fails to decode aborts the listing
        let mut users = Vec::new();
        while let Some(user) = cursor.try_next().await? {
            users.push(user);
        }

        tracing::debug!(count = users.len(), "Listed users");
        Ok(users)
    }

    #[instrument(skip(self, changes))]
    async fn update_fields(&self, id: ObjectId, changes: UserChanges) -> UserResult<u64> {
        let result = self
            .collection
            .update_one(doc! { "_id": id }, doc! { "$set": set_document(&changes) })
            .await?;

        tracing::info!(
            matched = result.matched_count,
            modified = result.modified_count,
            "User update applied"
        );
        Ok(result.matched_count)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> UserResult<u64> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        tracing::info!(deleted = result.deleted_count, "User delete applied");
        Ok(result.deleted_count)
    }
}
