use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::matching::{matches_candidate, CandidateCriteria};
use crate::models::{
    Account, CreditTransaction, NewAccount, Photo, Profile, ProfileChanges, TransactionKind,
    UnlockOutcome,
};
use crate::services::store::{Store, StoreError};

#[derive(Default)]
struct MemoryState {
    accounts: HashMap<Uuid, Account>,
    profiles: BTreeMap<i64, Profile>,
    photos: Vec<Photo>,
    transactions: Vec<CreditTransaction>,
    revoked_tokens: HashMap<Uuid, DateTime<Utc>>,
    next_profile_id: i64,
    next_photo_id: i64,
    next_transaction_id: i64,
}

impl MemoryState {
    fn profile_for_user(&self, user_id: Uuid) -> Option<&Profile> {
        self.profiles.values().find(|p| p.user_id == user_id)
    }

    fn ensure_profile(&mut self, user_id: Uuid) -> Profile {
        if let Some(profile) = self.profile_for_user(user_id) {
            return profile.clone();
        }
        self.next_profile_id += 1;
        let profile = Profile::empty(self.next_profile_id, user_id);
        self.profiles.insert(profile.id, profile.clone());
        profile
    }

    fn append_transaction(&mut self, user_id: Uuid, profile_id: Option<i64>, kind: TransactionKind, credits: i32) {
        self.next_transaction_id += 1;
        self.transactions.push(CreditTransaction {
            id: self.next_transaction_id,
            user_id,
            profile_id,
            kind,
            credits,
            created_at: Utc::now(),
        });
    }

    fn has_unlocked(&self, user_id: Uuid, profile_id: i64) -> bool {
        self.transactions.iter().any(|t| {
            t.user_id == user_id && t.profile_id == Some(profile_id) && t.kind == TransactionKind::Unlock
        })
    }
}

/// In-process store behind a single lock
///
/// Every operation takes the lock once, so multi-step units such as
/// unlocking are atomic. Used for local development and tests.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut state = self.state.write().await;

        if state.accounts.values().any(|a| a.username == account.username) {
            return Err(StoreError::Conflict("A user with that username already exists.".to_string()));
        }
        if let Some(phone) = &account.phone_number {
            if state.accounts.values().any(|a| a.phone_number.as_ref() == Some(phone)) {
                return Err(StoreError::Conflict(
                    "A user with that phone number already exists.".to_string(),
                ));
            }
        }

        let created = Account {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            phone_number: account.phone_number,
            password_hash: account.password_hash,
            credits: account.credits,
            date_joined: Utc::now(),
        };
        state.accounts.insert(created.id, created.clone());
        state.ensure_profile(created.id);

        Ok(created)
    }

    async fn find_account(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.state.read().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let state = self.state.read().await;
        Ok(state.accounts.values().find(|a| a.username == username).cloned())
    }

    async fn get_or_create_profile(&self, user_id: Uuid) -> Result<Profile, StoreError> {
        Ok(self.state.write().await.ensure_profile(user_id))
    }

    async fn find_profile(&self, id: i64) -> Result<Option<Profile>, StoreError> {
        Ok(self.state.read().await.profiles.get(&id).cloned())
    }

    async fn find_profile_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        Ok(self.state.read().await.profile_for_user(user_id).cloned())
    }

    async fn find_profiles(&self, ids: &[i64]) -> Result<Vec<Profile>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .profiles
            .values()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn update_profile(&self, user_id: Uuid, changes: &ProfileChanges) -> Result<Profile, StoreError> {
        let mut state = self.state.write().await;
        let id = state.ensure_profile(user_id).id;
        let profile = state
            .profiles
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("Profile not found.".to_string()))?;
        changes.apply_to(profile);
        Ok(profile.clone())
    }

    async fn find_candidates(&self, criteria: &CandidateCriteria) -> Result<Vec<Profile>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .profiles
            .values()
            .filter(|p| matches_candidate(criteria, p))
            .cloned()
            .collect())
    }

    async fn list_photos(&self, profile_ids: &[i64]) -> Result<Vec<Photo>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .photos
            .iter()
            .filter(|p| profile_ids.contains(&p.profile_id))
            .cloned()
            .collect())
    }

    async fn count_photos(&self, profile_id: i64) -> Result<usize, StoreError> {
        let state = self.state.read().await;
        Ok(state.photos.iter().filter(|p| p.profile_id == profile_id).count())
    }

    async fn add_photos(
        &self,
        profile_id: i64,
        images: &[String],
        max_per_profile: usize,
    ) -> Result<Vec<Photo>, StoreError> {
        let mut state = self.state.write().await;
        if !state.profiles.contains_key(&profile_id) {
            return Err(StoreError::NotFound("Profile not found.".to_string()));
        }

        let existing = state.photos.iter().filter(|p| p.profile_id == profile_id).count();
        if existing + images.len() > max_per_profile {
            return Err(StoreError::PhotoLimit(max_per_profile));
        }

        let mut added = Vec::with_capacity(images.len());
        for image in images {
            state.next_photo_id += 1;
            let photo = Photo {
                id: state.next_photo_id,
                profile_id,
                image: image.clone(),
            };
            state.photos.push(photo.clone());
            added.push(photo);
        }
        Ok(added)
    }

    async fn unlock_profile(&self, user_id: Uuid, profile_id: i64, cost: i32) -> Result<UnlockOutcome, StoreError> {
        let mut state = self.state.write().await;

        if !state.profiles.contains_key(&profile_id) {
            return Ok(UnlockOutcome::ProfileNotFound);
        }
        let balance = match state.accounts.get(&user_id) {
            Some(account) => account.credits,
            None => return Ok(UnlockOutcome::AccountNotFound),
        };
        if balance < cost {
            return Ok(UnlockOutcome::InsufficientCredits { balance });
        }
        if state.has_unlocked(user_id, profile_id) {
            return Ok(UnlockOutcome::AlreadyUnlocked);
        }

        let remaining_credits = balance - cost;
        if let Some(account) = state.accounts.get_mut(&user_id) {
            account.credits = remaining_credits;
        }
        state.append_transaction(user_id, Some(profile_id), TransactionKind::Unlock, cost);

        Ok(UnlockOutcome::Unlocked { remaining_credits })
    }

    async fn purchase_credits(&self, user_id: Uuid, credits: i32) -> Result<i32, StoreError> {
        let mut state = self.state.write().await;
        let account = state
            .accounts
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound("User not found.".to_string()))?;
        account.credits += credits;
        let balance = account.credits;
        state.append_transaction(user_id, None, TransactionKind::Purchase, credits);
        Ok(balance)
    }

    async fn has_unlocked(&self, user_id: Uuid, profile_id: i64) -> Result<bool, StoreError> {
        Ok(self.state.read().await.has_unlocked(user_id, profile_id))
    }

    async fn list_transactions(
        &self,
        user_id: Uuid,
        kind: Option<TransactionKind>,
    ) -> Result<Vec<CreditTransaction>, StoreError> {
        let state = self.state.read().await;
        let mut transactions: Vec<CreditTransaction> = state
            .transactions
            .iter()
            .filter(|t| t.user_id == user_id && kind.map_or(true, |k| t.kind == k))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(transactions)
    }

    async fn revoke_token(&self, jti: Uuid, expires_at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        state.revoked_tokens.retain(|_, exp| *exp > now);
        state.revoked_tokens.insert(jti, expires_at);
        Ok(())
    }

    async fn is_token_revoked(&self, jti: Uuid) -> Result<bool, StoreError> {
        Ok(self.state.read().await.revoked_tokens.contains_key(&jti))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
