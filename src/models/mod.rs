// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Account, CreditTransaction, Gender, NewAccount, Photo, Profile, ProfileWithPhotos,
    TransactionKind, UnlockOutcome,
};
pub use requests::{
    CandidateFilters, LoginRequest, LogoutRequest, ProfileChanges, PurchaseRequest,
    RefreshRequest, RegisterRequest,
};
pub use responses::{
    AccessTokenResponse, CandidateResponse, CreditSummaryResponse, ErrorResponse, HealthResponse,
    MessageResponse, PhotoResponse, PhotoUploadResponse, ProfileResponse, PurchaseResponse,
    RegisterResponse, TokenPairResponse, UnlockResponse, UnlockedProfileResponse, UserResponse,
};
