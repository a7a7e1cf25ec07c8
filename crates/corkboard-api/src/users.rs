use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use corkboard_db::models::UserRow;
use corkboard_types::api::{SignInRequest, SignUpRequest, TokenResponse};
use corkboard_types::models::{Role, UserPublic};

use crate::error::{ApiError, ApiResult};
use crate::middleware::CurrentUser;
use crate::{AppState, password, token};

pub(crate) const MAX_NAME_LEN: usize = 32;

pub(crate) fn validate_credentials(name: &str, password: &str) -> ApiResult<()> {
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(ApiError::Validation(format!(
            "name must be 1-{} characters",
            MAX_NAME_LEN
        )));
    }
    if password.is_empty() {
        return Err(ApiError::Validation("password must not be empty".into()));
    }
    Ok(())
}

pub(crate) fn user_public(row: &UserRow) -> ApiResult<UserPublic> {
    Ok(UserPublic {
        id: row.id.parse().map_err(|e| anyhow!("corrupt user id '{}': {}", row.id, e))?,
        name: row.name.clone(),
        role: Role::parse(&row.role)
            .ok_or_else(|| anyhow!("unknown role '{}' for user '{}'", row.role, row.name))?,
        created_at: DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| anyhow!("corrupt created_at on user '{}': {}", row.name, e))?
            .with_timezone(&Utc),
    })
}

/// Create a user row and return its public view. Shared by sign_up and the
/// bootstrap admin route.
pub(crate) fn create_user(
    state: &AppState,
    name: &str,
    plain_password: &str,
    role: Role,
) -> ApiResult<UserPublic> {
    if state.db.get_user_by_name(name)?.is_some() {
        return Err(ApiError::Conflict("user name already exists".into()));
    }

    let digest = password::hash_password(plain_password)?;
    let id = Uuid::new_v4();
    let now = Utc::now();

    state
        .db
        .create_user(&id.to_string(), name, &digest, role.as_str(), &now.to_rfc3339())?;

    Ok(UserPublic {
        id,
        name: name.to_string(),
        role,
        created_at: now,
    })
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_credentials(&req.name, &req.password)?;
    let user = create_user(&state, &req.name, &req.password, Role::Normal)?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let user = state
        .db
        .get_user_by_name(&req.name)?
        .ok_or(ApiError::Unauthorized)?;

    if !password::verify_password(&req.password, &user.password) {
        return Err(ApiError::Unauthorized);
    }

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| anyhow!("corrupt user id '{}': {}", user.id, e))?;
    let access_token = token::issue(&state.auth, user_id, &user.name)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserPublic>>> {
    let users = state
        .db
        .list_users()?
        .iter()
        .map(user_public)
        .collect::<ApiResult<Vec<_>>>()?;
    Ok(Json(users))
}

pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<UserPublic> {
    Json(UserPublic {
        id: user.id,
        name: user.name,
        role: user.role,
        created_at: user.created_at,
    })
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<UserPublic>> {
    let row = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user_public(&row)?))
}
