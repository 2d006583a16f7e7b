use crate::error::{AppError, AuthFailure};
use crate::models::User;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of an issued session token, in seconds.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Represents the claims encoded within a session JWT.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub user_id: Uuid,
    pub firstname: String,
    pub lastname: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Issues a token for `user` that expires one hour from now.
pub fn generate_token(user: &User, secret: &str) -> Result<String, AppError> {
    issue_token_at(user, secret, Utc::now())
}

/// Issues a token for `user` as if it were signed at `issued_at`.
pub fn issue_token_at(
    user: &User,
    secret: &str,
    issued_at: DateTime<Utc>,
) -> Result<String, AppError> {
    let claims = Claims {
        user_id: user.id,
        firstname: user.firstname.clone(),
        lastname: user.lastname.clone(),
        iat: issued_at.timestamp(),
        exp: (issued_at + Duration::seconds(TOKEN_TTL_SECONDS)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
}

/// Verifies a JWT string and decodes its claims.
///
/// Fails with `Unauthorized(TokenInvalid)` when the token is malformed, the signature
/// does not match `secret`, or the expiry has passed. No leeway is granted on expiry.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("token rejected: {:?}", e.kind());
        AppError::Unauthorized(AuthFailure::TokenInvalid)
    })
}
