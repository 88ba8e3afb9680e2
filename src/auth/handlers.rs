use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{error::AppError, state::AppState};

use super::{
    dto::{LoginRequest, LoginResponse, PublicUser, SignupRequest, SignupResponse},
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::User,
    validate::{is_valid_email, is_valid_mobile},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    let mobile = payload.mobile.trim();
    if !is_valid_mobile(mobile) {
        return Err(AppError::Validation("Valid mobile number is required".into()));
    }
    let email = payload.email.trim();
    if !is_valid_email(email) {
        warn!(email = %email, "signup rejected: malformed email");
        return Err(AppError::Validation("Valid email is required".into()));
    }
    if payload.password.len() < 6 {
        return Err(AppError::Validation("Password must be 6+ chars".into()));
    }

    // Advisory fast path only; the unique index decides under concurrency
    // and User::create surfaces the same DuplicateEmail when it loses.
    if User::find_by_email(&state.db, email).await?.is_some() {
        warn!(email = %email, "signup rejected: email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, name, mobile, email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.name)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully",
            token,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = payload.email.trim();
    if !is_valid_email(email) {
        return Err(AppError::Validation("Valid email is required".into()));
    }

    // Unknown email and wrong password share one failure path.
    let Some(user) = User::find_by_email(&state.db, email).await? else {
        warn!(email = %email, "login failed");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %email, user_id = %user.id, "login failed");
        return Err(AppError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, &user.name)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(LoginResponse {
        message: "Login successful",
        token,
        user: PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            mobile: user.mobile,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_response_carries_message_and_token() {
        let json = serde_json::to_value(SignupResponse {
            message: "User created successfully",
            token: "abc.def.ghi".into(),
        })
        .expect("serialize");
        assert_eq!(json["message"], "User created successfully");
        assert_eq!(json["token"], "abc.def.ghi");
    }

    #[test]
    fn login_response_exposes_only_public_user_fields() {
        let json = serde_json::to_value(LoginResponse {
            message: "Login successful",
            token: "abc.def.ghi".into(),
            user: PublicUser {
                id: uuid::Uuid::new_v4(),
                name: "Vasu".into(),
                email: "vasu@example.com".into(),
                mobile: "9876543210".into(),
            },
        })
        .expect("serialize");
        let user = &json["user"];
        assert_eq!(user["name"], "Vasu");
        assert!(user.get("password").is_none());
        assert!(user.get("password_hash").is_none());
    }
}
