use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::MessageWithUserName;

// -- JWT Claims --

/// JWT claims shared by the issue path (sign_in) and the verify path (auth
/// middleware). Canonical definition lives here so both sides agree on the
/// token shape; decoding rejects tokens missing any field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: i64,
    pub content: String,
    pub author_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// One page of the feed, newest first.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessagesPage {
    pub messages: Vec<MessageWithUserName>,
    pub have_next_page: bool,
}
