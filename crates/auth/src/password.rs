//! Password hashing (bcrypt).

use crate::authenticate::AuthError;

/// bcrypt hasher with a fixed work factor.
///
/// Hashing is CPU-bound; async callers should run it on a blocking thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub const MIN_COST: u32 = 4;
    pub const MAX_COST: u32 = 31;

    pub fn new(cost: u32) -> Result<Self, AuthError> {
        if !(Self::MIN_COST..=Self::MAX_COST).contains(&cost) {
            return Err(AuthError::InvalidCost(cost));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// A malformed stored hash counts as a mismatch.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}
