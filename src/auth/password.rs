use bcrypt::BcryptError;
use tracing::{debug, error, warn};

use crate::shared::AppError;

/// bcrypt only reads this many bytes of input; longer passwords are refused
pub const MAX_PASSWORD_BYTES: usize = 72;

/// One-way salted password hashing backed by bcrypt.
///
/// The work factor is fixed per hasher. Production uses
/// [`bcrypt::DEFAULT_COST`]; tests build a hasher with a lower cost.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::with_cost(bcrypt::DEFAULT_COST)
    }

    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a plaintext password with a fresh random salt.
    ///
    /// CPU-bound; async callers run it on the blocking pool.
    pub fn hash(&self, plaintext: &str) -> Result<String, AppError> {
        bcrypt::non_truncating_hash(plaintext, self.cost).map_err(|e| match e {
            BcryptError::Truncation(len) => {
                warn!(len, "Password exceeds bcrypt input limit");
                too_long()
            }
            e => {
                error!(error = %e, cost = self.cost, "Password hashing failed");
                AppError::Internal(format!("hash password: {e}"))
            }
        })
    }

    /// Checks a plaintext password against a stored hash using bcrypt's own
    /// comparison. A stored hash that cannot be parsed never matches, and
    /// neither does a password longer than [`MAX_PASSWORD_BYTES`].
    pub fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        match bcrypt::non_truncating_verify(plaintext, stored_hash) {
            Ok(matches) => {
                debug!(matches, "Password verification completed");
                matches
            }
            Err(BcryptError::Truncation(len)) => {
                debug!(len, "Password exceeds bcrypt input limit");
                false
            }
            Err(e) => {
                error!(error = %e, "Stored password hash could not be verified");
                false
            }
        }
    }
}

pub(crate) fn too_long() -> AppError {
    AppError::Validation(format!(
        "password must be at most {MAX_PASSWORD_BYTES} bytes"
    ))
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
