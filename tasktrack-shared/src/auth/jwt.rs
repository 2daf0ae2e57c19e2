/// JWT token generation and validation
///
/// Tokens are signed with HS256 and carry the user's identity and role.
/// Two token types exist:
///
/// - **Access token**: short-lived (1 hour), sent as a Bearer token on
///   every authenticated request.
/// - **Refresh token**: long-lived (7 days), exchanged for new access
///   tokens and blacklisted on logout via its `jti` claim.
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::jwt::{create_token, validate_token, Claims, TokenType};
/// use tasktrack_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
///
/// let claims = Claims::new(user_id, Role::User, TokenType::Access);
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long")?;
///
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long")?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::Role;

/// Issuer claim on every token
const ISSUER: &str = "tasktrack";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Token has been revoked (logout blacklist)
    #[error("Token has been revoked")]
    Revoked,
}

/// Token type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token (1 hour)
    Access,

    /// Refresh token (7 days)
    Refresh,
}

impl TokenType {
    /// Gets default expiration duration for the token type
    pub fn default_expiration(&self) -> Duration {
        match self {
            TokenType::Access => Duration::hours(1),
            TokenType::Refresh => Duration::days(7),
        }
    }

    /// Gets token type as string
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

/// JWT claims
///
/// Standard claims (`sub`, `iss`, `iat`, `exp`, `nbf`, `jti`) plus the
/// user's role and the token type. The role travels in the token so
/// permission checks don't need a user lookup on every request; the `jti`
/// identifies refresh tokens in the revocation blacklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Issuer - always "tasktrack"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Token ID, unique per token
    pub jti: Uuid,

    /// User role (custom claim)
    pub role: Role,

    /// Token type (custom claim)
    pub token_type: TokenType,
}

impl Claims {
    /// Creates new claims with the default expiration for the token type
    pub fn new(user_id: Uuid, role: Role, token_type: TokenType) -> Self {
        Self::with_expiration(user_id, role, token_type, token_type.default_expiration())
    }

    /// Creates claims with a custom expiration
    pub fn with_expiration(
        user_id: Uuid,
        role: Role,
        token_type: TokenType,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4(),
            role,
            token_type,
        }
    }

    /// Checks if the token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// When the token expires, as a chrono timestamp
    pub fn expires_at(&self) -> chrono::DateTime<Utc> {
        chrono::DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Creates a JWT token from claims
///
/// Signs with HS256. The secret should be at least 32 bytes, randomly
/// generated, and supplied via configuration.
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts claims
///
/// Verifies the signature, expiration, not-before, and issuer.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}

/// Validates a token and checks it's an access token
pub fn validate_access_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Access {
        return Err(JwtError::ValidationError(
            "Expected access token, got refresh token".to_string(),
        ));
    }

    Ok(claims)
}

/// Validates a token and checks it's a refresh token
pub fn validate_refresh_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let claims = validate_token(token, secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(JwtError::ValidationError(
            "Expected refresh token, got access token".to_string(),
        ));
    }

    Ok(claims)
}
