use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{UserError, UserResult};

/// Parse a path or payload identifier into an ObjectId
pub fn parse_user_id(raw: &str) -> UserResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| UserError::InvalidIdentifier(raw.to_string()))
}

/// User as stored in the `users` collection
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    /// Argon2id PHC string, never plaintext
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

impl std::fmt::Debug for UserDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDocument")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("admin", &self.admin)
            .finish()
    }
}

/// User as returned to callers. There is no password field to leak.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// 24 hex characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "65f1c0ffee0ddba11ad5eed1")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[schema(example = "bob")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[schema(example = "bob@example.com")]
    pub email: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    #[schema(example = "Bob Smith")]
    pub name: String,
    #[serde(default)]
    pub admin: bool,
}

impl From<&UserDocument> for User {
    fn from(doc: &UserDocument) -> Self {
        Self {
            id: Some(doc.id.to_hex()),
            username: doc.username.clone(),
            email: doc.email.clone(),
            name: doc.name.clone(),
            admin: doc.admin,
        }
    }
}

impl From<UserDocument> for User {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: Some(doc.id.to_hex()),
            username: doc.username,
            email: doc.email,
            name: doc.name,
            admin: doc.admin,
        }
    }
}

impl User {
    /// Echo of an applied update: the payload as sent, addressed to `id`
    pub fn echo(id: ObjectId, update: &UpdateUser) -> Self {
        Self {
            id: Some(id.to_hex()),
            username: update.username.clone().unwrap_or_default(),
            email: update.email.clone().unwrap_or_default(),
            name: update.name.clone().unwrap_or_default(),
            admin: update.admin.unwrap_or_default(),
        }
    }
}

/// Payload for `POST /users`
#[derive(Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    /// Generated when absent or empty
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    #[schema(format = Password, example = "hunter2")]
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

impl std::fmt::Debug for CreateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateUser")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"<redacted>")
            .field("admin", &self.admin)
            .finish()
    }
}

/// Payload for `PATCH /users/{id}`.
///
/// Fields are truthy: an absent or empty string leaves the stored value as
/// is, so a string field can never be cleared through an update. `admin`
/// only takes effect when `true`; an update cannot revoke admin.
/// A non-empty `password` is rehashed before it is stored.
#[derive(Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    #[schema(format = Password)]
    pub password: Option<String>,
    pub admin: Option<bool>,
}

impl std::fmt::Debug for UpdateUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("admin", &self.admin)
            .finish()
    }
}

/// Fields an update will `$set`. `None` means untouched.
#[derive(Clone, Default, PartialEq)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub admin: Option<bool>,
}

impl UserChanges {
    /// Keep only the non-empty fields of `update`, with the password already hashed
    pub fn from_update(update: &UpdateUser, password_hash: Option<String>) -> Self {
        fn non_empty(value: &Option<String>) -> Option<String> {
            value.as_ref().filter(|v| !v.is_empty()).cloned()
        }

        Self {
            username: non_empty(&update.username),
            email: non_empty(&update.email),
            name: non_empty(&update.name),
            password_hash,
            admin: update.admin.filter(|admin| *admin),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, doc: &mut UserDocument) {
        if let Some(ref username) = self.username {
            doc.username = username.clone();
        }
        if let Some(ref email) = self.email {
            doc.email = email.clone();
        }
        if let Some(ref name) = self.name {
            doc.name = name.clone();
        }
        if let Some(ref hash) = self.password_hash {
            doc.password = hash.clone();
        }
        if let Some(admin) = self.admin {
            doc.admin = admin;
        }
    }
}

impl std::fmt::Debug for UserChanges {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserChanges")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password_hash", &self.password_hash.as_ref().map(|_| "<redacted>"))
            .field("admin", &self.admin)
            .finish()
    }
}
