use std::collections::HashMap;

use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{Photo, Profile, ProfileChanges, ProfileWithPhotos};
use crate::services::Store;

/// Load photos for a batch of profiles, preserving the profile order
pub async fn attach_photos(
    store: &dyn Store,
    profiles: Vec<Profile>,
) -> Result<Vec<ProfileWithPhotos>, ApiError> {
    if profiles.is_empty() {
        return Ok(vec![]);
    }

    let ids: Vec<i64> = profiles.iter().map(|p| p.id).collect();
    let mut by_profile: HashMap<i64, Vec<Photo>> = HashMap::new();
    for photo in store.list_photos(&ids).await? {
        by_profile.entry(photo.profile_id).or_default().push(photo);
    }

    Ok(profiles
        .into_iter()
        .map(|profile| {
            let photos = by_profile.get(&profile.id).cloned().unwrap_or_default();
            ProfileWithPhotos { profile, photos }
        })
        .collect())
}

/// Only this profile's photos
pub async fn with_photos(store: &dyn Store, profile: Profile) -> Result<ProfileWithPhotos, ApiError> {
    let photos = store.list_photos(&[profile.id]).await?;
    Ok(ProfileWithPhotos { profile, photos })
}

/// The caller's own profile, created on first access
pub async fn own_profile(store: &dyn Store, user_id: Uuid) -> Result<ProfileWithPhotos, ApiError> {
    tracing::debug!("Fetching or creating profile for user {}", user_id);
    let profile = store.get_or_create_profile(user_id).await?;
    with_photos(store, profile).await
}

/// Partial update of the caller's own profile
pub async fn update_own_profile(
    store: &dyn Store,
    user_id: Uuid,
    changes: ProfileChanges,
) -> Result<ProfileWithPhotos, ApiError> {
    if let Err(errors) = changes.validate() {
        tracing::info!("Profile update rejected for user {}: {}", user_id, errors);
        return Err(errors.into());
    }

    let profile = store.update_profile(user_id, &changes).await?;
    tracing::info!("Profile {} updated for user {}", profile.id, user_id);

    with_photos(store, profile).await
}
