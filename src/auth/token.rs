use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, instrument};

use super::types::SessionClaims;
use crate::shared::AppError;
use crate::user::UserModel;

/// Lifetime of every issued session token
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// 2^63, the first value that no longer fits in an `i64`
const I64_UPPER_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Claims as read back from an incoming token, before `user_id` is trusted
#[derive(Debug, Deserialize)]
struct UnverifiedClaims {
    exp: i64,
    #[serde(default)]
    user_id: Option<Value>,
}

/// Issues and verifies HS256 session tokens signed with a shared secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime: Duration::hours(TOKEN_LIFETIME_HOURS),
        }
    }

    /// Creates a new JWT for the user, valid for 24 hours from now
    pub fn issue(&self, user: &UserModel) -> Result<String, AppError> {
        self.issue_at(user, Utc::now())
    }

    #[instrument(skip(self, user), fields(user_id = user.id))]
    pub fn issue_at(&self, user: &UserModel, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = SessionClaims {
            user_id: user.id,
            email: user.email.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.lifetime).timestamp(),
        };

        debug!(exp_timestamp = claims.exp, "Creating JWT token with expiration");

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "Failed to encode JWT token");
            AppError::Internal(format!("sign token: {e}"))
        })
    }

    /// Validates a JWT and returns the user id it was issued for
    pub fn verify(&self, token: &str) -> Result<i64, AppError> {
        self.verify_at(token, Utc::now())
    }

    /// Validates a JWT against the given instant.
    ///
    /// Every failure (signature, algorithm, expiry, bad `user_id`) is reported
    /// as [`AppError::InvalidCredentials`]; the cause is only logged.
    #[instrument(skip(self, token))]
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i64, AppError> {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is compared against `now` below, with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let claims = decode::<UnverifiedClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!(error = %e, "Failed to decode JWT token");
                AppError::InvalidCredentials
            })?
            .claims;

        if now.timestamp() >= claims.exp {
            debug!(exp = claims.exp, "JWT token has expired");
            return Err(AppError::InvalidCredentials);
        }

        let user_id = parse_user_id(claims.user_id.as_ref()).ok_or_else(|| {
            debug!(user_id = ?claims.user_id, "JWT token carries an invalid user_id claim");
            AppError::InvalidCredentials
        })?;

        debug!(user_id, "JWT token decoded successfully");
        Ok(user_id)
    }
}

/// Accepts only whole JSON numbers in `1..=i64::MAX`. The range is checked on
/// the JSON number itself so nothing is silently truncated.
fn parse_user_id(value: Option<&Value>) -> Option<i64> {
    let Value::Number(number) = value? else {
        return None;
    };

    if let Some(id) = number.as_i64() {
        return (id > 0).then_some(id);
    }
    if number.is_u64() {
        return None;
    }

    let id = number.as_f64()?;
    if id.fract() != 0.0 || id <= 0.0 || id >= I64_UPPER_BOUND {
        return None;
    }
    Some(id as i64)
}
