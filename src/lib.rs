//! Mangalya - matrimonial matching backend
//!
//! Accounts with a credit balance, biodata profiles with photos, an
//! opposite-gender candidate list, and a ledger of paid profile unlocks that
//! gates access to full profile details.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{candidate_criteria, matches_candidate, CandidateCriteria, PhotoLimits};
pub use error::ApiError;
pub use models::{Account, CandidateFilters, CreditTransaction, Profile, ProfileWithPhotos};
pub use routes::AppState;
pub use services::{LocalMediaStorage, MemoryStore, PostgresClient, Store, TokenIssuer};
