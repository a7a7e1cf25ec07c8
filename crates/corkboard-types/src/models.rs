use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles. ADMIN may delete any message; NORMAL only their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "NORMAL")]
    Normal,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Normal => "NORMAL",
        }
    }

    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "ADMIN" => Some(Role::Admin),
            "NORMAL" => Some(Role::Normal),
            _ => None,
        }
    }
}

/// Public view of a user. Never carries the password digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A feed entry: message fields joined with the author's display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageWithUserName {
    pub id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
}
