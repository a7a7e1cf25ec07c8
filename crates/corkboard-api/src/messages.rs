use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use corkboard_db::models::{MessageFeedRow, MessageRow};
use corkboard_types::api::{CreateMessageRequest, MessageResponse, MessagesPage};
use corkboard_types::models::{MessageWithUserName, Role};

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;

pub(crate) const PAGE_SIZE: u32 = 20;
pub(crate) const MAX_CONTENT_LEN: usize = 255;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

/// An actor may delete a message if they authored it or hold the ADMIN role.
/// Total: false means deny, never an error.
pub fn can_delete(actor: &CurrentUser, message: &MessageRow) -> bool {
    actor.id.to_string() == message.author_id || actor.role == Role::Admin
}

fn feed_view(row: &MessageFeedRow) -> ApiResult<MessageWithUserName> {
    Ok(MessageWithUserName {
        id: row.id,
        content: row.content.clone(),
        created_at: DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| anyhow!("corrupt created_at on message {}: {}", row.id, e))?
            .with_timezone(&Utc),
        user_name: row.author_name.clone(),
    })
}

pub async fn list_messages(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> ApiResult<Json<MessagesPage>> {
    if query.page < 1 {
        return Err(ApiError::Validation("page must be >= 1".into()));
    }

    let offset = (query.page - 1).saturating_mul(PAGE_SIZE);
    let (rows, total) = state.db.messages_page(PAGE_SIZE, offset)?;

    let messages = rows.iter().map(feed_view).collect::<ApiResult<Vec<_>>>()?;
    let have_next_page = i64::from(query.page) * i64::from(PAGE_SIZE) < total;

    Ok(Json(MessagesPage {
        messages,
        have_next_page,
    }))
}

pub async fn create_message(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateMessageRequest>,
) -> ApiResult<impl IntoResponse> {
    let len = req.content.chars().count();
    if len < 1 || len > MAX_CONTENT_LEN {
        return Err(ApiError::Validation(format!(
            "content must be 1-{} characters",
            MAX_CONTENT_LEN
        )));
    }

    let now = Utc::now();
    let id = state
        .db
        .insert_message(&req.content, &user.id.to_string(), &now.to_rfc3339())?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            id,
            content: req.content,
            author_id: user.id,
            created_at: now,
        }),
    ))
}

/// Existence is checked before authorization: deleting a missing message is
/// NotFound for everyone, including admins.
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(message_id): Path<i64>,
) -> ApiResult<StatusCode> {
    let message = state
        .db
        .get_message(message_id)?
        .ok_or(ApiError::NotFound("message"))?;

    if !can_delete(&user, &message) {
        return Err(ApiError::Forbidden);
    }

    state.db.delete_message(message_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            name: "tester".into(),
            role,
            created_at: Utc::now(),
        }
    }

    fn message_by(author: &CurrentUser) -> MessageRow {
        MessageRow {
            id: 1,
            content: "hello".into(),
            author_id: author.id.to_string(),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn author_may_delete_own_message() {
        let alice = user(Role::Normal);
        assert!(can_delete(&alice, &message_by(&alice)));
    }

    #[test]
    fn normal_user_may_not_delete_others() {
        let alice = user(Role::Normal);
        let bob = user(Role::Normal);
        assert!(!can_delete(&bob, &message_by(&alice)));
    }

    #[test]
    fn admin_may_delete_anything() {
        let alice = user(Role::Normal);
        let root = user(Role::Admin);
        assert!(can_delete(&root, &message_by(&alice)));
    }
}
