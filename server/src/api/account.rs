//! Account endpoints: sign-up, sign-in, profile

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use http::StatusCode;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::{Profile, SignInResponse};

use crate::auth::session::{SessionIdentity, create_token};
use crate::db;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

use super::ApiResult;

/// POST /signup
///
/// Body fields are camelCase on the wire. Credentials are stored as argon2
/// hashes, never in plaintext.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let first_name = required(req.first_name, "firstName")?;
    let last_name = required(req.last_name, "lastName")?;
    let email = required(req.email, "email")?.trim().to_lowercase();
    let password = required(req.password, "password")?;

    let hashed = hash_password(&password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let now = shared::util::now_millis();
    let user_id = db::users::create(&state.pool, &first_name, &last_name, &email, &hashed, now)
        .await
        .map_err(|e| {
            if crate::error::is_unique_violation(&e, "users_email_key") {
                AppError::new(ErrorCode::EmailExists)
            } else {
                tracing::error!("DB error during sign-up: {e}");
                AppError::new(ErrorCode::InternalError)
            }
        })?;

    tracing::info!(user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "User created" })),
    ))
}

/// POST /signin
#[derive(Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> ApiResult<SignInResponse> {
    let email = req.email.trim().to_lowercase();
    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(|e| {
            tracing::error!("DB error during sign-in: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(AppError::invalid_credentials)?;

    // Credential mismatch is a 401, distinguishable from a server error
    if !verify_password(&req.password, &user.hashed_password) {
        return Err(AppError::invalid_credentials());
    }

    let token = create_token(user.id, &user.email, &state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Json(SignInResponse {
        user_id: user.id,
        token,
        message: "Sign-in successful".to_string(),
    }))
}

/// GET /profile/:user_id
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
    Path(user_id): Path<i64>,
) -> ApiResult<Profile> {
    if identity.user_id != user_id {
        return Err(AppError::forbidden("Profile does not belong to this session"));
    }

    let user = db::users::find_by_id(&state.pool, user_id)
        .await
        .map_err(|e| {
            tracing::error!("DB error fetching profile: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    Ok(Json(Profile {
        firstname: user.first_name,
        lastname: user.last_name,
        email: user.email,
    }))
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::required_field(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_rejects_missing_and_blank() {
        assert!(required(None, "email").is_err());
        assert!(required(Some("   ".into()), "email").is_err());
        assert_eq!(required(Some("a@b.c".into()), "email").unwrap(), "a@b.c");
    }

    #[test]
    fn signup_body_accepts_camel_case() {
        let req: SignUpRequest = serde_json::from_str(
            r#"{"firstName":"Ana","lastName":"Lopez","email":"ana@example.com","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(req.first_name.as_deref(), Some("Ana"));
        assert_eq!(req.last_name.as_deref(), Some("Lopez"));
    }
}
