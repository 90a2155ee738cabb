use actix_web::{web, HttpResponse};

use crate::core::accounts;
use crate::error::ApiError;
use crate::models::{
    AccessTokenResponse, LoginRequest, LogoutRequest, MessageResponse, RefreshRequest,
    RegisterRequest, RegisterResponse, TokenPairResponse, UserResponse,
};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login))
        .route("/auth/logout", web::post().to(logout))
        .route("/auth/token/refresh", web::post().to(refresh));
}

/// POST /api/v1/auth/register
///
/// ```json
/// {
///   "username": "string",
///   "email": "string",
///   "password": "string",
///   "password2": "string",
///   "phone_number": "string"
/// }
/// ```
async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    let account = accounts::register(state.store.as_ref(), req.into_inner(), state.credits.signup_grant).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        user: UserResponse::from(&account),
        message: "User Created Successfully. Now perform Login to get your token".to_string(),
    }))
}

/// POST /api/v1/auth/login
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let pair = accounts::login(state.store.as_ref(), &state.tokens, req.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TokenPairResponse {
        access: pair.access,
        refresh: pair.refresh,
    }))
}

/// POST /api/v1/auth/logout
async fn logout(
    state: web::Data<AppState>,
    req: web::Json<LogoutRequest>,
) -> Result<HttpResponse, ApiError> {
    accounts::logout(state.store.as_ref(), &state.tokens, req.refresh_token.as_deref()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Logout successful".to_string(),
    }))
}

/// POST /api/v1/auth/token/refresh
async fn refresh(
    state: web::Data<AppState>,
    req: web::Json<RefreshRequest>,
) -> Result<HttpResponse, ApiError> {
    let access = accounts::refresh(state.store.as_ref(), &state.tokens, &req.refresh).await?;

    Ok(HttpResponse::Ok().json(AccessTokenResponse { access }))
}
