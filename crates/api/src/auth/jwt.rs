//! Bearer token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying the registered claims `iss`, `sub`,
//! `iat` and `exp` plus two private claims, `user_id` and `user_role`. They
//! are valid for one hour and verified with zero leeway.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use noda_core::error::{CoreError, TokenFailure};
use noda_core::roles::Role;
use noda_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Value of the `iss` claim.
pub const ISSUER: &str = "noda";
/// Value of the `sub` claim.
pub const SUBJECT: &str = "authentication";
/// Token lifetime in seconds.
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in seconds.
    pub lifetime_secs: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            lifetime_secs: TOKEN_LIFETIME_SECS,
        }
    }
}

/// Claims embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    pub user_id: DbId,
    /// Numeric role id, see [`Role::id`].
    pub user_role: i16,
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// The verified identity behind a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: DbId,
    pub role: Role,
}

/// Claims as decoded before the private claims are checked.
///
/// `user_id` and `user_role` stay untyped so a malformed value is reported
/// as a corrupted claim rather than a malformed token.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    user_id: serde_json::Value,
    #[serde(default)]
    user_role: serde_json::Value,
}

/// Sign a token for `user_id` issued now.
pub fn issue_token(
    user_id: DbId,
    role: Role,
    config: &JwtConfig,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    issue_token_at(user_id, role, config, chrono::Utc::now().timestamp())
}

/// Sign a token as if issued at `issued_at`.
pub fn issue_token_at(
    user_id: DbId,
    role: Role,
    config: &JwtConfig,
    issued_at: i64,
) -> Result<IssuedToken, jsonwebtoken::errors::Error> {
    let claims = Claims {
        iss: ISSUER.to_string(),
        sub: SUBJECT.to_string(),
        iat: issued_at,
        exp: issued_at + config.lifetime_secs,
        user_id,
        user_role: role.id(),
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;
    Ok(IssuedToken { token, claims })
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.sub = Some(SUBJECT.to_string());
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);
    validation
}

/// Verify a token and extract the caller it identifies.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Principal, CoreError> {
    let data = decode::<RawClaims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation(),
    )
    .map_err(|e| CoreError::JwtFailure(classify(&e)))?;
    let raw = data.claims;

    if raw.iat.is_some_and(|iat| iat > chrono::Utc::now().timestamp()) {
        return Err(CoreError::JwtFailure(TokenFailure::NotYetValid));
    }

    let user_id = raw
        .user_id
        .as_str()
        .and_then(|s| uuid::Uuid::try_parse(s).ok())
        .ok_or(CoreError::CorruptedClaim { claim: "user_id" })?;
    let role =
        Role::from_json(&raw.user_role).ok_or(CoreError::CorruptedClaim { claim: "user_role" })?;

    Ok(Principal { user_id, role })
}

/// Map a verification failure to the cause reported to the client.
fn classify(err: &jsonwebtoken::errors::Error) -> TokenFailure {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenFailure::BadSignature,
        ErrorKind::ExpiredSignature => TokenFailure::Expired,
        ErrorKind::ImmatureSignature => TokenFailure::NotYetValid,
        ErrorKind::InvalidIssuer
        | ErrorKind::InvalidSubject
        | ErrorKind::InvalidAudience
        | ErrorKind::MissingRequiredClaim(_) => TokenFailure::BadClaims,
        ErrorKind::InvalidEcdsaKey | ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
            TokenFailure::InvalidKey
        }
        _ => TokenFailure::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use serde_json::json;

    fn test_config() -> JwtConfig {
        JwtConfig::new("test-secret-that-is-long-enough-for-hmac")
    }

    fn sign(config: &JwtConfig, claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed")
    }

    #[test]
    fn issued_token_verifies() {
        let config = test_config();
        let user_id = uuid::Uuid::new_v4();
        let issued = issue_token(user_id, Role::Admin, &config).expect("issue should succeed");

        assert_eq!(issued.claims.exp - issued.claims.iat, 3600);
        assert_eq!(issued.claims.iss, "noda");
        assert_eq!(issued.claims.sub, "authentication");

        let principal = verify_token(&issued.token, &config).expect("verify should succeed");
        assert_eq!(principal, Principal { user_id, role: Role::Admin });
    }

    #[test]
    fn different_secret_is_bad_signature() {
        let token = issue_token(uuid::Uuid::new_v4(), Role::Regular, &JwtConfig::new("alpha"))
            .unwrap()
            .token;
        assert_eq!(
            verify_token(&token, &JwtConfig::new("bravo")),
            Err(CoreError::JwtFailure(TokenFailure::BadSignature))
        );
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let token = issue_token_at(uuid::Uuid::new_v4(), Role::Regular, &config, now - 7200)
            .unwrap()
            .token;
        assert_eq!(
            verify_token(&token, &config),
            Err(CoreError::JwtFailure(TokenFailure::Expired))
        );
    }

    #[test]
    fn future_issue_time_is_not_yet_valid() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let token = issue_token_at(uuid::Uuid::new_v4(), Role::Regular, &config, now + 600)
            .unwrap()
            .token;
        assert_eq!(
            verify_token(&token, &config),
            Err(CoreError::JwtFailure(TokenFailure::NotYetValid))
        );
    }

    #[test]
    fn wrong_issuer_is_bad_claims() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let token = sign(
            &config,
            json!({
                "iss": "someone-else", "sub": SUBJECT, "iat": now, "exp": now + 60,
                "user_id": uuid::Uuid::new_v4(), "user_role": 2,
            }),
        );
        assert_eq!(
            verify_token(&token, &config),
            Err(CoreError::JwtFailure(TokenFailure::BadClaims))
        );
    }

    #[test]
    fn garbage_is_malformed() {
        assert_eq!(
            verify_token("not.a.token", &test_config()),
            Err(CoreError::JwtFailure(TokenFailure::Malformed))
        );
    }

    #[test]
    fn private_claims_are_checked() {
        let config = test_config();
        let now = chrono::Utc::now().timestamp();
        let base = |user_id: serde_json::Value, role: serde_json::Value| {
            sign(
                &config,
                json!({
                    "iss": ISSUER, "sub": SUBJECT, "iat": now, "exp": now + 60,
                    "user_id": user_id, "user_role": role,
                }),
            )
        };

        assert_matches!(
            verify_token(&base(json!("nope"), json!(2)), &config),
            Err(CoreError::CorruptedClaim { claim: "user_id" })
        );
        assert_matches!(
            verify_token(&base(json!(uuid::Uuid::new_v4()), json!(9)), &config),
            Err(CoreError::CorruptedClaim { claim: "user_role" })
        );

        let widened = verify_token(&base(json!(uuid::Uuid::new_v4()), json!(1.0)), &config)
            .expect("integral float roles are accepted");
        assert_eq!(widened.role, Role::Admin);
    }

    proptest! {
        #[test]
        fn prop_round_trip_keeps_identity(bits in any::<u128>(), admin in any::<bool>()) {
            let config = test_config();
            let user_id = uuid::Uuid::from_u128(bits);
            let role = if admin { Role::Admin } else { Role::Regular };

            let issued = issue_token(user_id, role, &config).unwrap();
            let principal = verify_token(&issued.token, &config).unwrap();
            prop_assert_eq!(principal.user_id, user_id);
            prop_assert_eq!(principal.role, role);
        }
    }
}
