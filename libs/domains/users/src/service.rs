use mongodb::bson::oid::ObjectId;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{CreateUser, UpdateUser, User, UserChanges, UserDocument, parse_user_id};
use crate::password::{Argon2Hashing, PasswordHashing};
use crate::repository::UserRepository;

/// Result of [`UserService::update_user`]
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The `$set` was sent; carries the echoed payload
    Applied(User),
    /// Nothing to change, storage was not touched
    Unchanged,
}

/// Service layer for User business logic
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    hasher: Arc<dyn PasswordHashing>,
    deadline: Option<Duration>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: Arc::clone(&self.hasher),
            deadline: self.deadline,
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
            hasher: Arc::new(Argon2Hashing),
            deadline: None,
        }
    }

    /// Replace the Argon2id default
    pub fn with_hasher(mut self, hasher: impl PasswordHashing + 'static) -> Self {
        self.hasher = Arc::new(hasher);
        self
    }

    /// Bound every repository call by `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    async fn bounded<T>(&self, call: impl Future<Output = UserResult<T>>) -> UserResult<T> {
        match self.deadline {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                UserError::Store(format!("operation timed out after {:?}", limit))
            })?,
            None => call.await,
        }
    }

    /// All users in storage order, possibly empty
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        let users = self.bounded(self.repository.find_all()).await?;
        Ok(users.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, id: &str) -> UserResult<Option<User>> {
        let id = parse_user_id(id)?;
        let user = self.bounded(self.repository.find_by_id(id)).await?;
        Ok(user.map(User::from))
    }

    /// Hash the password and insert, generating an id unless one is supplied
    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        let id = match input.id.as_deref() {
            Some(raw) if !raw.is_empty() => parse_user_id(raw)?,
            _ => ObjectId::new(),
        };

        let document = UserDocument {
            id,
            username: input.username,
            email: input.email,
            name: input.name,
            password: self.hasher.hash(&input.password)?,
            admin: input.admin,
        };
        let user = User::from(&document);

        self.bounded(self.repository.insert(document)).await?;

        tracing::info!(user_id = %id, "User created");
        Ok(user)
    }

    /// `$set` the non-empty fields of `input`, see [`UpdateUser`] for the rules.
    ///
    /// The response echoes `input` rather than re-reading the record, so an
    /// id that matches nothing still yields [`UpdateOutcome::Applied`].
    #[instrument(skip(self, input))]
    pub async fn update_user(&self, id: &str, input: UpdateUser) -> UserResult<UpdateOutcome> {
        let id = parse_user_id(id)?;

        let password_hash = input
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|plain| self.hasher.hash(plain))
            .transpose()?;
        let changes = UserChanges::from_update(&input, password_hash);

        if changes.is_empty() {
            tracing::debug!(user_id = %id, "Update has no changes, skipping store");
            return Ok(UpdateOutcome::Unchanged);
        }

        let matched = self.bounded(self.repository.update_fields(id, changes)).await?;
        if matched == 0 {
            tracing::info!(user_id = %id, "Update matched no user");
        }

        Ok(UpdateOutcome::Applied(User::echo(id, &input)))
    }

    /// Delete by id. Deleting a missing user succeeds.
    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        let id = parse_user_id(id)?;
        let deleted = self.bounded(self.repository.delete(id)).await?;
        tracing::info!(user_id = %id, deleted, "User delete handled");
        Ok(())
    }
}
