use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;

use crate::auth::{hash_password, verify_password, AuthUser};
use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::models::{
    InitDetailsResponse, LoginRequest, LoginResponse, MessageResponse, OtpRequest, SignupRequest,
    UserSummary, VerifyOtpRequest,
};
use moneta_core::users::NewUser;

async fn signup(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    if body.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters long".to_string(),
        ));
    }
    let password_hash = hash_password(&body.password)?;
    state
        .user_service
        .register(NewUser {
            full_name: body.full_name,
            email: body.email,
            password_hash,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User registered successfully.")),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    // "Invalid credentials" for both unknown email and bad password, so the
    // response does not reveal which emails are registered.
    let user = state
        .user_service
        .get_by_email(&body.email.trim().to_lowercase())
        .map_err(|_| ApiError::BadRequest("Invalid credentials.".to_string()))?;
    if !verify_password(&body.password, &user.password_hash) {
        return Err(ApiError::BadRequest("Invalid credentials.".to_string()));
    }

    let token = state.auth.issue(&user.email)?;
    Ok(Json(LoginResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

async fn send_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<OtpRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let now = Utc::now().naive_utc();
    let (user, otp) = state
        .user_service
        .issue_otp(&body.email.trim().to_lowercase(), now)
        .await?;
    state.mailer.send_otp(&user.email, &user.full_name, &otp).await?;
    Ok(Json(MessageResponse::new("OTP sent to email.")))
}

async fn verify_otp(
    State(state): State<Arc<AppState>>,
    Json(body): Json<VerifyOtpRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let now = Utc::now().naive_utc();
    let user = state
        .user_service
        .verify_otp(&body.email.trim().to_lowercase(), &body.otp, now)
        .await?;

    let token = state.auth.issue(&user.email)?;
    Ok(Json(LoginResponse {
        token,
        user: UserSummary::from(&user),
    }))
}

async fn init_details(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<InitDetailsResponse>> {
    let record = state.user_service.get_by_email(&user.email)?;
    Ok(Json(InitDetailsResponse {
        email: record.email,
        full_name: record.full_name,
        onboarding_done: record.onboarding_done,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/send-otp", post(send_otp))
        .route("/auth/verify-otp", post(verify_otp))
        .route("/auth/init-details", get(init_details))
}
