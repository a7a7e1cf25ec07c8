use std::sync::atomic::Ordering;

use anyhow::anyhow;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use corkboard_db::models::UserRow;
use corkboard_types::models::Role;

use crate::error::ApiError;
use crate::{AppState, token};

/// The acting user, resolved from the bearer token and injected into request
/// extensions by `require_auth`.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl CurrentUser {
    pub fn from_row(row: &UserRow) -> anyhow::Result<Self> {
        Ok(Self {
            id: row.id.parse()?,
            name: row.name.clone(),
            role: Role::parse(&row.role).ok_or_else(|| anyhow!("unknown role '{}'", row.role))?,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)?.with_timezone(&Utc),
        })
    }
}

/// Resolve the acting user from the Authorization header. A missing header,
/// bad token, absent `sub`, or unknown user all fold into the same
/// Unauthorized outcome.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let claims = token::verify(&state.auth, token).map_err(|_| ApiError::Unauthorized)?;

    let row = state
        .db
        .get_user_by_id(&claims.sub.to_string())?
        .ok_or(ApiError::Unauthorized)?;
    let user = CurrentUser::from_row(&row)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Initialization gate. Until an ADMIN user exists every request fails; once
/// one is observed the result is latched in process memory and never
/// re-checked. Two racing requests may both run the existence query, which is
/// harmless: the latch only ever moves false to true.
pub async fn require_initialized(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !state.initialized.load(Ordering::Relaxed) {
        if !state.db.admin_exists()? {
            return Err(ApiError::NotInitialized);
        }
        state.initialized.store(true, Ordering::Relaxed);
    }
    Ok(next.run(req).await)
}
