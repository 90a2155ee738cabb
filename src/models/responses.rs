use chrono::{NaiveDate, DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{Account, CreditTransaction, Photo, Profile, ProfileWithPhotos};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub phone_number: Option<String>,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            email: account.email.clone(),
            phone_number: account.phone_number.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: UserResponse,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: i64,
    pub image: String,
}

impl From<Photo> for PhotoResponse {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            image: photo.image,
        }
    }
}

fn photo_responses(photos: Vec<Photo>) -> Vec<PhotoResponse> {
    photos.into_iter().map(PhotoResponse::from).collect()
}

/// Full profile with its photos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub photos: Vec<PhotoResponse>,
}

impl From<ProfileWithPhotos> for ProfileResponse {
    fn from(value: ProfileWithPhotos) -> Self {
        Self {
            profile: value.profile,
            photos: photo_responses(value.photos),
        }
    }
}

/// Candidate list entry
///
/// Contact, address and family details stay behind the unlock gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResponse {
    pub id: i64,
    pub full_name: String,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub height: Option<f64>,
    pub mother_tongue: String,
    pub religion: String,
    pub caste: String,
    pub city: String,
    pub education: String,
    pub occupation: String,
    pub photos: Vec<PhotoResponse>,
}

impl From<ProfileWithPhotos> for CandidateResponse {
    fn from(value: ProfileWithPhotos) -> Self {
        let p = value.profile;
        Self {
            id: p.id,
            full_name: p.full_name,
            gender: p.gender,
            date_of_birth: p.date_of_birth,
            height: p.height,
            mother_tongue: p.mother_tongue,
            religion: p.religion,
            caste: p.caste,
            city: p.city,
            education: p.education,
            occupation: p.occupation,
            photos: photo_responses(value.photos),
        }
    }
}

/// Summary shown in the recently-unlocked list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockedProfileResponse {
    pub id: i64,
    pub full_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub occupation: String,
    pub photos: Vec<PhotoResponse>,
}

impl From<ProfileWithPhotos> for UnlockedProfileResponse {
    fn from(value: ProfileWithPhotos) -> Self {
        Self {
            id: value.profile.id,
            full_name: value.profile.full_name,
            date_of_birth: value.profile.date_of_birth,
            occupation: value.profile.occupation,
            photos: photo_responses(value.photos),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockResponse {
    pub detail: String,
    pub remaining_credits: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseResponse {
    pub detail: String,
    pub credits: i32,
}

/// Balance plus the caller's ledger, newest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditSummaryResponse {
    pub credits: i32,
    pub transactions: Vec<CreditTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoUploadResponse {
    pub message: String,
    pub photos: Vec<PhotoResponse>,
}

impl PhotoUploadResponse {
    pub fn new(photos: Vec<Photo>) -> Self {
        Self {
            message: "Photos uploaded successfully".to_string(),
            photos: photo_responses(photos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_response_flattens_profile() {
        let user_id = Uuid::new_v4();
        let mut profile = Profile::empty(3, user_id);
        profile.full_name = "Anjali".to_string();
        let response = ProfileResponse::from(ProfileWithPhotos {
            profile,
            photos: vec![Photo { id: 1, profile_id: 3, image: "/media/a.jpg".to_string() }],
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["full_name"], "Anjali");
        assert_eq!(json["photos"][0]["image"], "/media/a.jpg");
        assert!(json["photos"][0].get("profile_id").is_none());
    }

    #[test]
    fn test_candidate_response_hides_contact_details() {
        let mut profile = Profile::empty(4, Uuid::new_v4());
        profile.address_line_1 = "12 Temple Street".to_string();
        profile.fathers_name = "Suresh".to_string();
        let json = serde_json::to_value(CandidateResponse::from(ProfileWithPhotos {
            profile,
            photos: vec![],
        }))
        .unwrap();

        assert!(json.get("address_line_1").is_none());
        assert!(json.get("fathers_name").is_none());
        assert_eq!(json["id"], 4);
    }
}
