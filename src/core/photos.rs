use uuid::Uuid;

use crate::error::ApiError;
use crate::models::Photo;
use crate::services::{LocalMediaStorage, Store, StoreError};

/// One uploaded image as received from the client
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Upload bounds
#[derive(Debug, Clone, Copy)]
pub struct PhotoLimits {
    pub max_per_profile: usize,
    pub max_bytes: usize,
}

impl Default for PhotoLimits {
    fn default() -> Self {
        Self {
            max_per_profile: 3,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

pub fn too_many_images(limits: &PhotoLimits) -> ApiError {
    ApiError::Validation(format!(
        "You can upload a maximum of {} images.",
        limits.max_per_profile
    ))
}

pub fn image_too_large(limits: &PhotoLimits) -> ApiError {
    ApiError::Validation(format!(
        "Image exceeds the maximum size of {} bytes.",
        limits.max_bytes
    ))
}

/// Reject the whole batch unless every image fits the limits
///
/// Returns each image's extension in upload order.
pub fn check_upload(
    uploads: &[PhotoUpload],
    existing: usize,
    limits: &PhotoLimits,
) -> Result<Vec<String>, ApiError> {
    if uploads.is_empty() {
        return Err(ApiError::Validation("No images provided".to_string()));
    }

    if existing + uploads.len() > limits.max_per_profile {
        return Err(too_many_images(limits));
    }

    uploads
        .iter()
        .map(|upload| {
            if upload.bytes.is_empty() {
                return Err(ApiError::Validation("The submitted file is empty.".to_string()));
            }
            if upload.bytes.len() > limits.max_bytes {
                return Err(image_too_large(limits));
            }
            Ok(LocalMediaStorage::image_extension(upload.file_name.as_deref())?)
        })
        .collect()
}

/// Store a batch of photos for the caller's profile, all or nothing
pub async fn upload_photos(
    store: &dyn Store,
    media: &LocalMediaStorage,
    user_id: Uuid,
    uploads: Vec<PhotoUpload>,
    limits: &PhotoLimits,
) -> Result<Vec<Photo>, ApiError> {
    let profile = store.get_or_create_profile(user_id).await?;
    let existing = store.count_photos(profile.id).await?;

    let extensions = match check_upload(&uploads, existing, limits) {
        Ok(extensions) => extensions,
        Err(e) => {
            tracing::warn!("Photo upload rejected for user {}: {}", user_id, e);
            return Err(e);
        }
    };

    let mut stored = Vec::with_capacity(uploads.len());
    for (upload, extension) in uploads.iter().zip(&extensions) {
        match media.store(profile.id, extension, &upload.bytes).await {
            Ok(url) => stored.push(url),
            Err(e) => {
                discard(media, &stored).await;
                return Err(e.into());
            }
        }
    }

    // Limit is enforced again inside the store's write unit
    match store.add_photos(profile.id, &stored, limits.max_per_profile).await {
        Ok(photos) => {
            tracing::info!("{} photos uploaded for user {}", photos.len(), user_id);
            Ok(photos)
        }
        Err(e) => {
            if matches!(e, StoreError::PhotoLimit(_)) {
                tracing::warn!("Photo upload rejected for user {}: limit reached concurrently", user_id);
            }
            discard(media, &stored).await;
            Err(e.into())
        }
    }
}

async fn discard(media: &LocalMediaStorage, urls: &[String]) {
    for url in urls {
        media.remove(url).await;
    }
}
