use std::sync::atomic::Ordering;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use corkboard_types::api::SignUpRequest;
use corkboard_types::models::Role;

use crate::AppState;
use crate::error::{ApiError, ApiResult};
use crate::users::{create_user, validate_credentials};

/// Bootstrap route: create the first ADMIN account. The only route outside
/// the initialization gate; refuses to run twice.
pub async fn create_first_admin(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_credentials(&req.name, &req.password)?;

    if state.db.admin_exists()? {
        return Err(ApiError::Conflict("application already initialized".into()));
    }

    let user = create_user(&state, &req.name, &req.password, Role::Admin)?;
    state.initialized.store(true, Ordering::Relaxed);

    Ok((StatusCode::CREATED, Json(user)))
}
