use actix_web::{web, HttpResponse};
use uuid::Uuid;

use crate::core::accounts;
use crate::error::ApiError;
use crate::models::UserResponse;
use crate::routes::{AppState, AuthenticatedUser};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/users/{id}", web::get().to(get_user));
}

/// GET /api/v1/users/{id}
async fn get_user(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let account = accounts::get_user(state.store.as_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&account)))
}
