//! Credit economy: unlocking profiles, buying credits, and the ledger-backed
//! access gate.
//!
//! The ledger is the only record of who unlocked whom. Access to a profile's
//! detail is re-derived from it on every read.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CreditTransaction, ProfileWithPhotos, TransactionKind, UnlockOutcome};
use crate::services::Store;

/// Credits spent per unlock
pub const UNLOCK_COST: i32 = 1;

/// Spend one credit to unlock `profile_id`; returns the remaining balance
pub async fn unlock(store: &dyn Store, user_id: Uuid, profile_id: i64) -> Result<i32, ApiError> {
    match store.unlock_profile(user_id, profile_id, UNLOCK_COST).await? {
        UnlockOutcome::Unlocked { remaining_credits } => {
            tracing::info!(
                "User {} unlocked profile {} ({} credits left)",
                user_id,
                profile_id,
                remaining_credits
            );
            Ok(remaining_credits)
        }
        UnlockOutcome::ProfileNotFound => Err(ApiError::NotFound("Profile not found.".to_string())),
        UnlockOutcome::AccountNotFound => Err(ApiError::NotFound("User not found.".to_string())),
        UnlockOutcome::InsufficientCredits { balance } => {
            tracing::warn!("User {} cannot unlock profile {}: balance {}", user_id, profile_id, balance);
            Err(ApiError::InsufficientCredits { required: UNLOCK_COST })
        }
        UnlockOutcome::AlreadyUnlocked => {
            tracing::warn!("User {} already unlocked profile {}", user_id, profile_id);
            Err(ApiError::AlreadyUnlocked)
        }
    }
}

/// Add credits to the caller's balance; returns the new balance
pub async fn purchase(
    store: &dyn Store,
    user_id: Uuid,
    credits: i32,
    max_purchase: i32,
) -> Result<i32, ApiError> {
    if credits < 1 || credits > max_purchase {
        return Err(ApiError::Validation(format!(
            "credits: must be between 1 and {}",
            max_purchase
        )));
    }

    let balance = store.purchase_credits(user_id, credits).await?;
    tracing::info!("User {} purchased {} credits (balance {})", user_id, credits, balance);
    Ok(balance)
}

/// Profiles the caller has unlocked, most recent unlock first
///
/// One entry per unlock transaction.
pub async fn unlocked_profiles(store: &dyn Store, user_id: Uuid) -> Result<Vec<ProfileWithPhotos>, ApiError> {
    let unlocked_ids: Vec<i64> = store
        .list_transactions(user_id, Some(TransactionKind::Unlock))
        .await?
        .into_iter()
        .filter_map(|t| t.profile_id)
        .collect();

    let profiles: HashMap<i64, _> = store
        .find_profiles(&unlocked_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let ordered = unlocked_ids
        .iter()
        .filter_map(|id| profiles.get(id).cloned())
        .collect();

    super::profiles::attach_photos(store, ordered).await
}

/// Full profile detail, only for profiles the caller has unlocked
pub async fn profile_detail(
    store: &dyn Store,
    user_id: Uuid,
    profile_id: i64,
) -> Result<ProfileWithPhotos, ApiError> {
    if !store.has_unlocked(user_id, profile_id).await? {
        tracing::info!("User {} denied detail of profile {}", user_id, profile_id);
        return Err(ApiError::Forbidden("You have not unlocked this profile.".to_string()));
    }

    let profile = store
        .find_profile(profile_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Profile not found.".to_string()))?;

    super::profiles::with_photos(store, profile).await
}

/// Current balance and full ledger, newest first
pub async fn ledger(store: &dyn Store, user_id: Uuid) -> Result<(i32, Vec<CreditTransaction>), ApiError> {
    let account = store
        .find_account(user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))?;
    let transactions = store.list_transactions(user_id, None).await?;
    Ok((account.credits, transactions))
}
