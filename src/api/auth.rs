use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::{messages, validation};
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::UserRole;
use crate::repositories;
use crate::schemas::auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::schemas::user::UserResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if payload.user_type.is_empty() {
        return Err(ApiError::BadRequest(messages::USER_TYPE_MISSING.to_string()));
    }

    let role = match payload.user_type.as_str() {
        "siswa" => UserRole::Siswa,
        "guru" => UserRole::Guru,
        "orangtua" => UserRole::Orangtua,
        _ => return Err(ApiError::BadRequest(messages::USER_TYPE_INVALID.to_string())),
    };

    if payload.email.is_empty() || payload.password.is_empty() || payload.full_name.is_empty() {
        return Err(ApiError::BadRequest(messages::REGISTER_FIELDS_REQUIRED.to_string()));
    }

    validation::validate_password_len(&payload.password)?;

    let existing = repositories::users::exists_by_email(state.db(), &payload.email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to check existing user"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict(messages::EMAIL_TAKEN));
    }

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let now = primitive_now_utc();
    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            email: &payload.email,
            hashed_password,
            full_name: &payload.full_name,
            role,
            is_active: true,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create user"))?;

    tracing::info!(user_id = %user.id, role = ?user.role, "User registered");

    let response = RegisterResponse {
        message: messages::REGISTER_OK.to_string(),
        user: UserResponse::from_db(user),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = repositories::users::find_by_email(state.db(), &payload.email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load user"))?
        .ok_or(ApiError::Unauthorized(messages::BAD_CREDENTIALS))?;

    let verified = security::verify_password(&payload.password, &user.hashed_password)
        .map_err(|_| ApiError::Unauthorized(messages::BAD_CREDENTIALS))?;

    if !verified {
        return Err(ApiError::Unauthorized(messages::BAD_CREDENTIALS));
    }

    if !user.is_active {
        return Err(ApiError::BadRequest(messages::ACCOUNT_INACTIVE.to_string()));
    }

    let token = security::create_access_token(&user.id, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(Json(LoginResponse {
        message: messages::LOGIN_OK.to_string(),
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserResponse::from_db(user),
    }))
}

async fn me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from_db(user))
}
