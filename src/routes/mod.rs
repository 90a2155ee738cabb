// Route exports
pub mod auth;
pub mod health;
pub mod me;
pub mod profiles;
pub mod users;

use std::sync::Arc;

use actix_web::dev::Payload;
use actix_web::{http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::config::CreditSettings;
use crate::core::PhotoLimits;
use crate::error::ApiError;
use crate::services::{LocalMediaStorage, Store, TokenIssuer, TokenType};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub tokens: Arc<TokenIssuer>,
    pub media: Arc<LocalMediaStorage>,
    pub photo_limits: PhotoLimits,
    pub credits: CreditSettings,
}

/// Identity of the caller, taken from a valid access token
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

impl AuthenticatedUser {
    fn from_http(req: &HttpRequest) -> Result<Self, ApiError> {
        let state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| ApiError::Internal("Application state is not configured".to_string()))?;

        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Auth("Authentication credentials were not provided.".to_string()))?;

        let claims = state.tokens.verify(token, TokenType::Access)?;
        Ok(Self { user_id: claims.sub })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_http(req))
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(auth::configure)
            .configure(profiles::configure)
            .configure(me::configure)
            .configure(users::configure),
    );
}
