//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use jsonwebtoken::{encode, Header, EncodingKey};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use chrono::{Utc, Duration};
use validator::Validate;

use crate::{AppState, AppError, AppResult};
use crate::config::Config;
use crate::middleware::auth::{require_admin, UserContext};
use crate::models::{CreateUser, LoginRequest, LoginResponse, User, UserInfo, UserRole};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // User ID
    pub role: String,     // User role
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = User::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::InternalError("Invalid password hash".to_string()))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    User::update_last_login(&state.pool, user.id).await?;

    let access_token = generate_jwt(&user, &state.config.jwt_secret, state.config.jwt_expiration_minutes)?;

    tracing::info!("User {} logged in", user.username);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user: user.to_info(),
    }))
}

/// Create a user (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    user: UserContext,
    Json(req): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserInfo>)> {
    require_admin(&user)?;
    req.validate()?;

    if User::exists(&state.pool, &req.username).await? {
        return Err(AppError::AlreadyExists("Username already registered".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let created = User::create(&state.pool, &req, password_hash).await?;

    tracing::info!("User {} created by {} with role {}", created.username, user.user_id, created.role);

    Ok((StatusCode::CREATED, Json(created.to_info())))
}

/// Create the configured administrator if it does not exist yet
pub async fn ensure_admin(pool: &PgPool, config: &Config) -> AppResult<()> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        return Ok(());
    };

    if User::exists(pool, username).await? {
        return Ok(());
    }

    let data = CreateUser {
        username: username.clone(),
        password: password.clone(),
        full_name: None,
        role: Some(UserRole::Admin),
    };
    data.validate()?;

    User::create(pool, &data, hash_password(password)?).await?;
    tracing::info!("Bootstrap administrator '{}' created", username);
    Ok(())
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// Generate JWT token
fn generate_jwt(user: &User, secret: &str, expiration_minutes: u64) -> AppResult<String> {
    sign_claims(&user.id.to_string(), &user.role, secret, expiration_minutes)
}

pub(crate) fn sign_claims(sub: &str, role: &str, secret: &str, expiration_minutes: u64) -> AppResult<String> {
    let now = Utc::now();
    let exp = now + Duration::minutes(expiration_minutes as i64);

    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes())
    ).map_err(|e| AppError::InternalError(e.to_string()))
}
