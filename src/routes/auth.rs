use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    middleware::AuthUser,
    models::{
        user::{is_valid_email, normalize_email},
        NewUser, User, UserUpdate,
    },
    services::auth::MIN_PASSWORD_LEN,
};

use super::AppState;

const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=100;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_or_username: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: User,
}

fn validate_username(username: &str) -> AppResult<()> {
    if USERNAME_LEN.contains(&username.chars().count()) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(
            "Username must be between 3 and 100 characters".to_string(),
        ))
    }
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )))
    }
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<SessionResponse>)> {
    let email = normalize_email(&request.email);
    let username = request.username.trim().to_string();

    if !is_valid_email(&email) {
        return Err(AppError::InvalidInput("A valid email is required".to_string()));
    }
    validate_password(&request.password)?;
    validate_username(&username)?;

    if state.store.user_exists(&email, &username).await? {
        return Err(AppError::InvalidInput(
            "Email or username already exists".to_string(),
        ));
    }

    let password_hash = state.auth.hash_password(&request.password).await?;
    let user = state
        .store
        .create_user(&NewUser {
            email,
            username,
            password_hash,
        })
        .await?;

    let token = state.auth.issue_token(user.id)?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "User created successfully".to_string(),
            token,
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    let identifier = request
        .email_or_username
        .or(request.email)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Email or username is required".to_string()))?;

    if request.password.is_empty() {
        return Err(AppError::InvalidInput("Password is required".to_string()));
    }

    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let credentials = state
        .store
        .find_user_credentials(&identifier)
        .await?
        .ok_or_else(invalid)?;

    if !state
        .auth
        .verify_password(&request.password, &credentials.password_hash)
        .await?
    {
        return Err(invalid());
    }

    let token = state.auth.issue_token(credentials.id)?;
    Ok(Json(SessionResponse {
        message: "Login successful".to_string(),
        token,
        user: credentials.into(),
    }))
}

/// GET /api/auth/me
pub async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// PUT /api/auth/update
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let mut update = UserUpdate::default();

    if let Some(username) = request
        .username
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
    {
        validate_username(&username)?;
        if state.store.username_taken_by_other(&username, user.id).await? {
            return Err(AppError::InvalidInput("Username already exists".to_string()));
        }
        update.username = Some(username);
    }

    if let Some(password) = request.password.filter(|p| !p.is_empty()) {
        validate_password(&password)?;
        update.password_hash = Some(state.auth.hash_password(&password).await?);
    }

    if update.is_empty() {
        return Err(AppError::InvalidInput("No fields to update".to_string()));
    }

    let user = state
        .store
        .update_user(user.id, &update)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}
