use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::UserModel;

/// External representation of a user, without the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub university: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserModel> for UserResponse {
    fn from(user: UserModel) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            university: user.university,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_omits_password_hash() {
        let now = Utc::now();
        let user = UserModel {
            id: 7,
            full_name: "Jo".to_string(),
            email: "a@b.com".to_string(),
            password_hash: "$2b$04$secret-hash".to_string(),
            university: Some("State U".to_string()),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(json.contains("a@b.com"));
        assert!(json.contains("State U"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("secret-hash"));
    }
}
