// Core workflow exports
pub mod accounts;
pub mod credits;
pub mod matching;
pub mod photos;
pub mod profiles;

pub use credits::UNLOCK_COST;
pub use matching::{candidate_criteria, matches_candidate, BirthOrder, CandidateCriteria, PairingRule};
pub use photos::{PhotoLimits, PhotoUpload};
