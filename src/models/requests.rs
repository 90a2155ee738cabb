use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::Profile;

/// Request to register a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    pub password2: String,
    /// Blank values are stored as no phone number
    #[validate(length(max = 15))]
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Credentials for obtaining a token pair
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Exchange a refresh token for a new access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Buy credits for the calling account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    pub credits: i32,
}

/// Optional equality filters on the candidate list, all case-insensitive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateFilters {
    #[serde(default)]
    pub caste: Option<String>,
    #[serde(default)]
    pub religion: Option<String>,
    #[serde(default)]
    pub mother_tongue: Option<String>,
}

impl CandidateFilters {
    /// Drop filters whose value is blank
    pub fn normalized(self) -> Self {
        fn keep(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            caste: keep(self.caste),
            religion: keep(self.religion),
            mother_tongue: keep(self.mother_tongue),
        }
    }

    /// Active filters as (column, value) pairs
    pub fn active(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(caste) = &self.caste {
            pairs.push(("caste", caste.as_str()));
        }
        if let Some(religion) = &self.religion {
            pairs.push(("religion", religion.as_str()));
        }
        if let Some(mother_tongue) = &self.mother_tongue {
            pairs.push(("mother_tongue", mother_tongue.as_str()));
        }
        pairs
    }
}

/// Partial update of the caller's own profile
///
/// Only the supplied fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ProfileChanges {
    #[validate(length(max = 255))]
    pub full_name: Option<String>,
    #[validate(length(max = 10))]
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub place_of_birth: Option<String>,
    #[validate(range(min = 0.0, max = 300.0))]
    pub height: Option<f64>,
    #[validate(length(max = 50))]
    pub mother_tongue: Option<String>,
    #[validate(length(max = 50))]
    pub religion: Option<String>,
    #[validate(length(max = 50))]
    pub caste: Option<String>,
    #[validate(length(max = 50))]
    pub raasi: Option<String>,
    #[validate(length(max = 50))]
    pub nakshatram: Option<String>,
    #[validate(length(max = 255))]
    pub address_line_1: Option<String>,
    #[validate(length(max = 255))]
    pub address_line_2: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state: Option<String>,
    #[validate(length(max = 10))]
    pub pincode: Option<String>,
    #[validate(length(max = 255))]
    pub fathers_name: Option<String>,
    #[validate(length(max = 100))]
    pub fathers_occupation: Option<String>,
    #[validate(length(max = 100))]
    pub fathers_designation: Option<String>,
    #[validate(length(max = 255))]
    pub mothers_name: Option<String>,
    #[validate(length(max = 100))]
    pub mothers_occupation: Option<String>,
    pub siblings_details: Option<String>,
    #[validate(length(max = 255))]
    pub education: Option<String>,
    #[validate(length(max = 100))]
    pub occupation: Option<String>,
    #[validate(length(max = 100))]
    pub designation: Option<String>,
    #[validate(range(min = 0.0))]
    pub salary: Option<f64>,
    pub about: Option<String>,
}

impl ProfileChanges {
    /// Apply the supplied fields onto `profile`
    pub fn apply_to(&self, profile: &mut Profile) {
        fn set<T: Clone>(target: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *target = v.clone();
            }
        }
        fn set_opt<T: Clone>(target: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *target = value.clone();
            }
        }

        set(&mut profile.full_name, &self.full_name);
        set(&mut profile.gender, &self.gender);
        set_opt(&mut profile.date_of_birth, &self.date_of_birth);
        set(&mut profile.place_of_birth, &self.place_of_birth);
        set_opt(&mut profile.height, &self.height);
        set(&mut profile.mother_tongue, &self.mother_tongue);
        set(&mut profile.religion, &self.religion);
        set(&mut profile.caste, &self.caste);
        set(&mut profile.raasi, &self.raasi);
        set(&mut profile.nakshatram, &self.nakshatram);
        set(&mut profile.address_line_1, &self.address_line_1);
        set(&mut profile.address_line_2, &self.address_line_2);
        set(&mut profile.city, &self.city);
        set(&mut profile.state, &self.state);
        set(&mut profile.pincode, &self.pincode);
        set(&mut profile.fathers_name, &self.fathers_name);
        set(&mut profile.fathers_occupation, &self.fathers_occupation);
        set(&mut profile.fathers_designation, &self.fathers_designation);
        set(&mut profile.mothers_name, &self.mothers_name);
        set(&mut profile.mothers_occupation, &self.mothers_occupation);
        set(&mut profile.siblings_details, &self.siblings_details);
        set(&mut profile.education, &self.education);
        set(&mut profile.occupation, &self.occupation);
        set(&mut profile.designation, &self.designation);
        set_opt(&mut profile.salary, &self.salary);
        set(&mut profile.about, &self.about);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_filters_drop_blank_values() {
        let filters = CandidateFilters {
            caste: Some("  ".to_string()),
            religion: Some(" Hindu ".to_string()),
            mother_tongue: None,
        }
        .normalized();

        assert_eq!(filters.caste, None);
        assert_eq!(filters.religion.as_deref(), Some("Hindu"));
        assert_eq!(filters.active(), vec![("religion", "Hindu")]);
    }

    #[test]
    fn test_apply_changes_is_partial() {
        let mut profile = Profile::empty(1, Uuid::new_v4());
        profile.city = "Chennai".to_string();

        let changes = ProfileChanges {
            full_name: Some("Priya".to_string()),
            date_of_birth: NaiveDate::from_ymd_opt(1995, 4, 12),
            ..Default::default()
        };
        changes.apply_to(&mut profile);

        assert_eq!(profile.full_name, "Priya");
        assert_eq!(profile.date_of_birth, NaiveDate::from_ymd_opt(1995, 4, 12));
        assert_eq!(profile.city, "Chennai");
    }

    #[test]
    fn test_register_validation() {
        let request = RegisterRequest {
            username: "ravi".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            password2: "short".to_string(),
            phone_number: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_blank_phone_passes_validation() {
        let mut request = RegisterRequest {
            username: "ravi".to_string(),
            email: "ravi@example.com".to_string(),
            password: "correct-horse".to_string(),
            password2: "correct-horse".to_string(),
            phone_number: Some(String::new()),
        };
        assert!(request.validate().is_ok());

        request.phone_number = Some("9".repeat(16));
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_profile_changes_reject_long_gender() {
        let changes = ProfileChanges {
            gender: Some("x".repeat(11)),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }
}
