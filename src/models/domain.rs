use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registered account with credentials and credit balance
///
/// Contains the password hash, never serialize this directly.
/// Use [`crate::models::UserResponse`] for API output.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub credits: i32,
    pub date_joined: DateTime<Utc>,
}

/// Fields needed to create an account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub password_hash: String,
    pub credits: i32,
}

/// Biodata record owned by exactly one account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub full_name: String,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub place_of_birth: String,
    /// Height in cm
    pub height: Option<f64>,
    pub mother_tongue: String,
    pub religion: String,
    pub caste: String,
    pub raasi: String,
    pub nakshatram: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub fathers_name: String,
    pub fathers_occupation: String,
    pub fathers_designation: String,
    pub mothers_name: String,
    pub mothers_occupation: String,
    pub siblings_details: String,
    pub education: String,
    pub occupation: String,
    pub designation: String,
    /// Annual salary in lakhs
    pub salary: Option<f64>,
    pub about: String,
}

impl Profile {
    /// Empty profile for a freshly registered account
    pub fn empty(id: i64, user_id: Uuid) -> Self {
        Self {
            id,
            user_id,
            ..Default::default()
        }
    }

    pub fn gender(&self) -> Option<Gender> {
        Gender::parse(&self.gender)
    }
}

/// The two genders the candidate query pairs against each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive parse; anything else is not a pairing gender
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Gender::Male => Gender::Female,
            Gender::Female => Gender::Male,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Photo attached to a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Photo {
    pub id: i64,
    pub profile_id: i64,
    /// Retrievable URL of the stored image
    pub image: String,
}

/// A profile together with the photos it owns
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileWithPhotos {
    pub profile: Profile,
    pub photos: Vec<Photo>,
}

/// Ledger entry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "credit_action", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Unlock,
    Purchase,
}

/// Immutable ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CreditTransaction {
    pub id: i64,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(rename = "profile_unlocked")]
    pub profile_id: Option<i64>,
    #[serde(rename = "action")]
    pub kind: TransactionKind,
    pub credits: i32,
    pub created_at: DateTime<Utc>,
}

/// Result of the atomic unlock unit, in check order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockOutcome {
    Unlocked { remaining_credits: i32 },
    ProfileNotFound,
    AccountNotFound,
    InsufficientCredits { balance: i32 },
    AlreadyUnlocked,
}
