//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub telegram_id: Option<i64>,
    pub pachca_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// Data needed to insert a user; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Full profile replacement (PUT)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UserUpdate {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "guest@example.com")]
    pub email: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Ivan")]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Petrov")]
    pub last_name: Option<String>,
    pub telegram_id: Option<i64>,
    pub pachca_id: Option<i64>,
}

/// Partial profile update (PATCH); absent fields stay unchanged, `null` clears.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UserPatch {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    #[validate(length(min = 1, max = 100))]
    #[schema(value_type = Option<String>)]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    #[validate(length(min = 1, max = 100))]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    #[schema(value_type = Option<i64>)]
    pub telegram_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "super::double_option")]
    #[schema(value_type = Option<i64>)]
    pub pachca_id: Option<Option<i64>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.telegram_id.is_none()
            && self.pachca_id.is_none()
    }
}

impl From<UserUpdate> for UserPatch {
    fn from(update: UserUpdate) -> Self {
        Self {
            email: Some(update.email),
            first_name: Some(update.first_name),
            last_name: Some(update.last_name),
            telegram_id: Some(update.telegram_id),
            pachca_id: Some(update.pachca_id),
        }
    }
}

/// Query filters for `GET /users`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    /// Exact email, compared case-insensitively
    pub email: Option<String>,
}

/// User response (safe to return to client)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "guest@example.com")]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub telegram_id: Option<i64>,
    pub pachca_id: Option<i64>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            telegram_id: user.telegram_id,
            pachca_id: user.pachca_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_never_carries_the_hash() {
        let user = User {
            id: 7,
            email: "guest@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            first_name: None,
            last_name: None,
            telegram_id: Some(42),
            pachca_id: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user.clone())).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["telegram_id"], 42);
        assert!(json.get("password_hash").is_none());
        assert!(serde_json::to_value(user).unwrap().get("password_hash").is_none());
    }
}
