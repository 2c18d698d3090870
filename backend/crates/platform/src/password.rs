//! Password Hashing and Verification
//!
//! - Argon2id hashing with a configurable time cost
//! - Zeroization of clear-text input
//! - Hashing and verification run on the blocking pool so a slow hash never
//!   stalls other in-flight requests

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Constants
// ============================================================================

/// Minimum password length (in characters)
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length (in characters)
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Default hashing cost ("rounds")
pub const DEFAULT_HASH_ROUNDS: u32 = 10;

/// Argon2 memory cost in KiB (19 MiB, OWASP baseline)
const DEFAULT_MEMORY_KIB: u32 = 19 * 1024;

// ============================================================================
// Error Types
// ============================================================================

/// Password policy violation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password cannot be empty or contain only whitespace")]
    EmptyOrWhitespace,

    #[error("Password contains invalid control characters")]
    InvalidCharacter,
}

/// Password hashing/verification errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash format")]
    InvalidHashFormat,

    #[error("Password hashing task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

// ============================================================================
// Hash cost
// ============================================================================

/// Work factor for new hashes.
///
/// `rounds` maps to the Argon2 time cost (iterations). Existing hashes keep
/// the parameters they were created with; verification reads them from the
/// PHC string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    rounds: u32,
    memory_kib: u32,
}

impl HashCost {
    pub fn from_rounds(rounds: u32) -> Self {
        Self {
            rounds: rounds.clamp(1, 64),
            memory_kib: DEFAULT_MEMORY_KIB,
        }
    }

    /// Cheapest valid parameters. Tests only.
    pub fn minimal() -> Self {
        Self {
            rounds: 1,
            memory_kib: Params::MIN_M_COST,
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    fn hasher(&self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.rounds, 1, None)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl Default for HashCost {
    fn default() -> Self {
        Self::from_rounds(DEFAULT_HASH_ROUNDS)
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// Not `Clone`; debug output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// NFKC-normalizes, then checks length (in code points) and rejects
    /// control characters other than space/tab/newline.
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        let normalized: String = raw.nfkc().collect();

        if normalized.trim().is_empty() {
            return Err(PasswordPolicyError::EmptyOrWhitespace);
        }

        let char_count = normalized.chars().count();

        if char_count < MIN_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        if normalized
            .chars()
            .any(|ch| ch.is_control() && ch != '\t' && ch != '\n')
        {
            return Err(PasswordPolicyError::InvalidCharacter);
        }

        Ok(Self(normalized))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash on the current thread. Prefer [`hash_blocking`] from async code.
    pub fn hash(&self, cost: HashCost) -> Result<HashedPassword, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);

        let hash = cost
            .hasher()?
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        Ok(HashedPassword {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Argon2id hash in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Constant-time verification using the parameters embedded in the hash.
    pub fn verify(&self, password: &ClearTextPassword) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Blocking-pool helpers
// ============================================================================

/// Hash on tokio's blocking pool.
pub async fn hash_blocking(
    password: ClearTextPassword,
    cost: HashCost,
) -> Result<HashedPassword, PasswordHashError> {
    tokio::task::spawn_blocking(move || password.hash(cost)).await?
}

/// Verify on tokio's blocking pool.
pub async fn verify_blocking(
    hashed: HashedPassword,
    password: ClearTextPassword,
) -> Result<bool, PasswordHashError> {
    Ok(tokio::task::spawn_blocking(move || hashed.verify(&password)).await?)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn password(raw: &str) -> ClearTextPassword {
        ClearTextPassword::new(raw.to_string()).unwrap()
    }

    #[test]
    fn test_password_too_short() {
        let result = ClearTextPassword::new("short".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::TooShort { .. })));
    }

    #[test]
    fn test_password_too_long() {
        let result = ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1));
        assert!(matches!(result, Err(PasswordPolicyError::TooLong { .. })));
    }

    #[test]
    fn test_password_whitespace_only() {
        let result = ClearTextPassword::new("        ".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::EmptyOrWhitespace)));
    }

    #[test]
    fn test_password_control_character() {
        let result = ClearTextPassword::new("abc\u{0007}defgh".to_string());
        assert!(matches!(result, Err(PasswordPolicyError::InvalidCharacter)));
    }

    #[test]
    fn test_unicode_password_counts_code_points() {
        // 8 code points, far more than 8 bytes
        assert!(ClearTextPassword::new("パスワード安全だ".to_string()).is_ok());
    }

    #[test]
    fn test_hash_and_verify() {
        let hashed = password("correct horse").hash(HashCost::minimal()).unwrap();
        assert!(hashed.verify(&password("correct horse")));
        assert!(!hashed.verify(&password("wrong horse")));
    }

    #[test]
    fn test_cost_is_encoded_in_hash() {
        let hashed = password("correct horse").hash(HashCost::minimal()).unwrap();
        assert!(hashed.as_phc_string().starts_with("$argon2id$"));
        assert!(hashed.as_phc_string().contains("t=1"));
    }

    #[test]
    fn test_from_rounds_clamps() {
        assert_eq!(HashCost::from_rounds(0).rounds(), 1);
        assert_eq!(HashCost::default().rounds(), DEFAULT_HASH_ROUNDS);
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedPassword::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let debug_output = format!("{:?}", password("super secret"));
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));
    }

    #[tokio::test]
    async fn test_blocking_helpers() {
        let hashed = hash_blocking(password("correct horse"), HashCost::minimal())
            .await
            .unwrap();
        assert!(verify_blocking(hashed.clone(), password("correct horse")).await.unwrap());
        assert!(!verify_blocking(hashed, password("battery staple")).await.unwrap());
    }
}
