use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::{CandidateFilters, Gender, Profile, ProfileWithPhotos};
use crate::services::Store;

/// Which side of the requester's birth date a candidate must fall on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthOrder {
    /// Born strictly later (younger)
    After,
    /// Born strictly earlier (older)
    Before,
}

/// Gender and relative-age rule derived from the requester
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingRule {
    pub target_gender: Gender,
    pub born: BirthOrder,
    pub pivot: NaiveDate,
}

impl PairingRule {
    /// Men see younger women, women see older men
    pub fn for_requester(gender: Gender, date_of_birth: NaiveDate) -> Self {
        let born = match gender {
            Gender::Male => BirthOrder::After,
            Gender::Female => BirthOrder::Before,
        };
        Self {
            target_gender: gender.opposite(),
            born,
            pivot: date_of_birth,
        }
    }
}

/// Fully resolved candidate query
///
/// Built by [`candidate_criteria`]; stores evaluate it either in SQL or with
/// [`matches_candidate`].
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateCriteria {
    pub requester_user_id: Uuid,
    /// `None` when the requester's gender is set but is neither male nor female
    pub rule: Option<PairingRule>,
    pub filters: CandidateFilters,
}

/// Derive the criteria from the requester's profile.
///
/// Returns `None` when the requester has no gender or no birth date, which
/// means the candidate list is empty.
pub fn candidate_criteria(requester: &Profile, filters: CandidateFilters) -> Option<CandidateCriteria> {
    let date_of_birth = requester.date_of_birth?;
    if requester.gender.trim().is_empty() {
        return None;
    }

    let rule = requester
        .gender()
        .map(|gender| PairingRule::for_requester(gender, date_of_birth));

    Some(CandidateCriteria {
        requester_user_id: requester.user_id,
        rule,
        filters: filters.normalized(),
    })
}

/// Check a single profile against the criteria
#[inline]
pub fn matches_candidate(criteria: &CandidateCriteria, profile: &Profile) -> bool {
    // Never list the requester
    if profile.user_id == criteria.requester_user_id {
        return false;
    }

    let date_of_birth = match profile.date_of_birth {
        Some(dob) => dob,
        None => return false,
    };

    if let Some(rule) = &criteria.rule {
        if profile.gender() != Some(rule.target_gender) {
            return false;
        }
        let in_order = match rule.born {
            BirthOrder::After => date_of_birth > rule.pivot,
            BirthOrder::Before => date_of_birth < rule.pivot,
        };
        if !in_order {
            return false;
        }
    }

    criteria
        .filters
        .active()
        .into_iter()
        .all(|(column, expected)| {
            let actual = match column {
                "caste" => &profile.caste,
                "religion" => &profile.religion,
                "mother_tongue" => &profile.mother_tongue,
                _ => return false,
            };
            actual.to_lowercase() == expected.to_lowercase()
        })
}

/// Candidate list for the calling account
pub async fn list_candidates(
    store: &dyn Store,
    user_id: Uuid,
    filters: CandidateFilters,
) -> Result<Vec<ProfileWithPhotos>, ApiError> {
    let requester = match store.find_profile_by_user(user_id).await? {
        Some(profile) => profile,
        None => {
            tracing::warn!("User {} has no profile, returning empty candidate list", user_id);
            return Ok(vec![]);
        }
    };

    let criteria = match candidate_criteria(&requester, filters) {
        Some(criteria) => criteria,
        None => {
            tracing::info!(
                "Profile {} is missing gender or date of birth, returning empty candidate list",
                requester.id
            );
            return Ok(vec![]);
        }
    };

    tracing::debug!("Candidate criteria for {}: {:?}", user_id, criteria);

    let candidates = store.find_candidates(&criteria).await?;

    tracing::info!("Found {} candidates for user {}", candidates.len(), user_id);

    super::profiles::attach_photos(store, candidates).await
}
