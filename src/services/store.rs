use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::core::matching::CandidateCriteria;
use crate::models::{
    Account, CreditTransaction, NewAccount, Photo, Profile, ProfileChanges, TransactionKind,
    UnlockOutcome,
};

/// Errors that can occur when talking to a store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    NotFound(String),

    /// A uniqueness rule rejected the write; the message names the field
    #[error("{0}")]
    Conflict(String),

    /// The profile would end up with more photos than allowed
    #[error("You can upload a maximum of {0} images.")]
    PhotoLimit(usize),
}

/// Persistence for accounts, profiles, photos, the credit ledger and
/// revoked tokens.
///
/// Implementations must make `create_account`, `unlock_profile`,
/// `purchase_credits` and `add_photos` atomic.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create an account together with its empty profile
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError>;

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    /// Return the account's profile, creating an empty one if absent
    async fn get_or_create_profile(&self, user_id: Uuid) -> Result<Profile, StoreError>;

    async fn find_profile(&self, id: i64) -> Result<Option<Profile>, StoreError>;

    async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// Profiles with the given ids, in no particular order
    async fn find_profiles(&self, ids: &[i64]) -> Result<Vec<Profile>, StoreError>;

    /// Apply a partial update to the account's profile (get-or-create first)
    async fn update_profile(&self, user_id: Uuid, changes: &ProfileChanges) -> Result<Profile, StoreError>;

    /// Profiles satisfying the candidate criteria
    async fn find_candidates(&self, criteria: &CandidateCriteria) -> Result<Vec<Profile>, StoreError>;

    /// Photos belonging to any of the given profiles, ordered by id
    async fn list_photos(&self, profile_ids: &[i64]) -> Result<Vec<Photo>, StoreError>;

    async fn count_photos(&self, profile_id: i64) -> Result<usize, StoreError>;

    /// Attach stored images to a profile, all or nothing.
    ///
    /// Fails with [`StoreError::PhotoLimit`] when existing plus new photos
    /// would exceed `max_per_profile`. The count and the insert form one unit.
    async fn add_photos(
        &self,
        profile_id: i64,
        images: &[String],
        max_per_profile: usize,
    ) -> Result<Vec<Photo>, StoreError>;

    /// Run the unlock unit for (user, profile).
    ///
    /// Checks happen in this order: target profile exists, actor exists,
    /// balance covers `cost`, no prior unlock. Only when all pass is the
    /// balance debited and an unlock entry appended.
    async fn unlock_profile(&self, user_id: Uuid, profile_id: i64, cost: i32) -> Result<UnlockOutcome, StoreError>;

    /// Credit the account and append a purchase entry; returns the new balance
    async fn purchase_credits(&self, user_id: Uuid, credits: i32) -> Result<i32, StoreError>;

    async fn has_unlocked(&self, user_id: Uuid, profile_id: i64) -> Result<bool, StoreError>;

    /// The account's ledger entries, newest first (ties broken by id)
    async fn list_transactions(
        &self,
        user_id: Uuid,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<CreditTransaction>, StoreError>;

    async fn revoke_token(&self, jti: Uuid, expires_at: DateTime<Utc>) -> Result<(), StoreError>;

    async fn is_token_revoked(&self, jti: Uuid) -> Result<bool, StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}
