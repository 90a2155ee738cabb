use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{Account, LoginRequest, NewAccount, RegisterRequest};
use crate::services::tokens::{TokenIssuer, TokenPair, TokenType};
use crate::services::{Store, TokenError};

/// Hash a password into an argon2id PHC string
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

/// Create an account with the signup credit grant and an empty profile
pub async fn register(
    store: &dyn Store,
    request: RegisterRequest,
    signup_grant: i32,
) -> Result<Account, ApiError> {
    if let Err(errors) = request.validate() {
        tracing::info!("Registration rejected: {}", errors);
        return Err(errors.into());
    }

    if request.password != request.password2 {
        return Err(ApiError::Validation("password: Passwords must match.".to_string()));
    }

    let account = store
        .create_account(NewAccount {
            username: request.username.trim().to_string(),
            email: request.email.trim().to_string(),
            phone_number: request
                .phone_number
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            password_hash: hash_password(&request.password)?,
            credits: signup_grant,
        })
        .await?;

    tracing::info!("User '{}' created with {} credits", account.username, account.credits);

    Ok(account)
}

/// Exchange credentials for an access/refresh pair
pub async fn login(
    store: &dyn Store,
    tokens: &TokenIssuer,
    request: LoginRequest,
) -> Result<TokenPair, ApiError> {
    request.validate()?;

    let rejected = || ApiError::Auth("No active account found with the given credentials".to_string());

    let account = store
        .find_account_by_username(&request.username)
        .await?
        .ok_or_else(rejected)?;

    if !verify_password(&request.password, &account.password_hash) {
        tracing::info!("Failed login for '{}'", request.username);
        return Err(rejected());
    }

    tracing::info!("User '{}' logged in", account.username);
    Ok(tokens.issue_pair(account.id)?)
}

/// New access token from a live refresh token
pub async fn refresh(store: &dyn Store, tokens: &TokenIssuer, refresh_token: &str) -> Result<String, ApiError> {
    let claims = tokens.verify(refresh_token, TokenType::Refresh)?;

    if store.is_token_revoked(claims.jti).await? {
        return Err(TokenError::Revoked.into());
    }

    Ok(tokens.issue_access(claims.sub)?)
}

/// Revoke a refresh token
pub async fn logout(
    store: &dyn Store,
    tokens: &TokenIssuer,
    refresh_token: Option<&str>,
) -> Result<(), ApiError> {
    let refresh_token = refresh_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("Refresh token required".to_string()))?;

    let claims = match tokens.verify(refresh_token, TokenType::Refresh) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Logout failed: {}", e);
            return Err(ApiError::Validation("Invalid token".to_string()));
        }
    };

    store.revoke_token(claims.jti, claims.expires_at()).await?;
    tracing::info!("User {} logged out", claims.sub);

    Ok(())
}

/// Look up any account by id
pub async fn get_user(store: &dyn Store, id: Uuid) -> Result<Account, ApiError> {
    store
        .find_account(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong-pass", &hash));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
