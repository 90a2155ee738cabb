use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::TryStreamExt;

use crate::core::photos::{self, PhotoLimits, PhotoUpload};
use crate::core::{credits, profiles};
use crate::error::ApiError;
use crate::models::{
    CreditSummaryResponse, PhotoUploadResponse, ProfileChanges, ProfileResponse, PurchaseRequest,
    PurchaseResponse, UnlockedProfileResponse,
};
use crate::routes::{AppState, AuthenticatedUser};

/// Multipart field carrying the images
const PHOTO_FIELD: &str = "photo";

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/me/profile", web::get().to(get_own_profile))
        .route("/me/profile", web::put().to(update_own_profile))
        .route("/me/profile/upload-photos", web::post().to(upload_photos))
        .route("/me/unlocked-profiles", web::get().to(unlocked_profiles))
        .route("/me/credits", web::get().to(credit_summary))
        .route("/me/credits/purchase", web::post().to(purchase_credits));
}

/// GET /api/v1/me/profile
async fn get_own_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = profiles::own_profile(state.store.as_ref(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

/// PUT /api/v1/me/profile
///
/// Partial update: omitted fields keep their value.
async fn update_own_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<ProfileChanges>,
) -> Result<HttpResponse, ApiError> {
    let profile = profiles::update_own_profile(state.store.as_ref(), user.user_id, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ProfileResponse::from(profile)))
}

/// POST /api/v1/me/profile/upload-photos
///
/// multipart/form-data with one or more `photo` file fields.
async fn upload_photos(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let uploads = read_photo_fields(payload, &state.photo_limits).await?;

    let photos = photos::upload_photos(
        state.store.as_ref(),
        &state.media,
        user.user_id,
        uploads,
        &state.photo_limits,
    )
    .await?;

    Ok(HttpResponse::Created().json(PhotoUploadResponse::new(photos)))
}

/// Collect `photo` fields, stopping early once a limit is exceeded
async fn read_photo_fields(mut payload: Multipart, limits: &PhotoLimits) -> Result<Vec<PhotoUpload>, ApiError> {
    let mut uploads = Vec::new();

    while let Some(mut field) = payload.try_next().await.map_err(multipart_error)? {
        let is_photo = field.name() == Some(PHOTO_FIELD);
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
            if !is_photo {
                continue;
            }
            if bytes.len() + chunk.len() > limits.max_bytes {
                return Err(photos::image_too_large(limits));
            }
            bytes.extend_from_slice(&chunk);
        }

        if is_photo {
            uploads.push(PhotoUpload { file_name, bytes });
            if uploads.len() > limits.max_per_profile {
                return Err(photos::too_many_images(limits));
            }
        }
    }

    Ok(uploads)
}

fn multipart_error(err: actix_multipart::MultipartError) -> ApiError {
    ApiError::Validation(format!("Malformed multipart payload: {}", err))
}

/// GET /api/v1/me/unlocked-profiles
async fn unlocked_profiles(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let unlocked = credits::unlocked_profiles(state.store.as_ref(), user.user_id).await?;

    let body: Vec<UnlockedProfileResponse> = unlocked.into_iter().map(UnlockedProfileResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/v1/me/credits
async fn credit_summary(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let (balance, transactions) = credits::ledger(state.store.as_ref(), user.user_id).await?;

    Ok(HttpResponse::Ok().json(CreditSummaryResponse {
        credits: balance,
        transactions,
    }))
}

/// POST /api/v1/me/credits/purchase
///
/// ```json
/// { "credits": 10 }
/// ```
async fn purchase_credits(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<PurchaseRequest>,
) -> Result<HttpResponse, ApiError> {
    let balance = credits::purchase(
        state.store.as_ref(),
        user.user_id,
        req.credits,
        state.credits.max_purchase,
    )
    .await?;

    Ok(HttpResponse::Ok().json(PurchaseResponse {
        detail: "Credits purchased successfully.".to_string(),
        credits: balance,
    }))
}
