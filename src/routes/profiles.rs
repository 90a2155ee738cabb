use actix_web::{web, HttpResponse};

use crate::core::{credits, matching};
use crate::error::ApiError;
use crate::models::{CandidateFilters, CandidateResponse, ProfileResponse, UnlockResponse};
use crate::routes::{AppState, AuthenticatedUser};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles", web::get().to(list_candidates))
        .route("/profiles/{id}", web::get().to(profile_detail))
        .route("/profiles/{id}/unlock", web::post().to(unlock_profile));
}

/// Candidate list for the caller
///
/// GET /api/v1/profiles?caste={caste}&religion={religion}&mother_tongue={mother_tongue}
async fn list_candidates(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<CandidateFilters>,
) -> Result<HttpResponse, ApiError> {
    let candidates = matching::list_candidates(state.store.as_ref(), user.user_id, query.into_inner()).await?;

    let body: Vec<CandidateResponse> = candidates.into_iter().map(CandidateResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Full detail of an unlocked profile
///
/// GET /api/v1/profiles/{id}
async fn profile_detail(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let detail = credits::profile_detail(state.store.as_ref(), user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(detail)))
}

/// Spend a credit to unlock a profile
///
/// POST /api/v1/profiles/{id}/unlock
async fn unlock_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let remaining_credits = credits::unlock(state.store.as_ref(), user.user_id, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(UnlockResponse {
        detail: "Profile unlocked successfully.".to_string(),
        remaining_credits,
    }))
}
