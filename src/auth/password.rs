use thiserror::Error;

/// Why a password did not verify.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password cannot be empty")]
    Empty,

    #[error("password is incorrect")]
    Mismatch,

    #[error("stored password hash is malformed")]
    MalformedHash,
}

/// Salted bcrypt hashing with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hashes `plaintext` with a fresh salt.
    ///
    /// # Panics
    ///
    /// If bcrypt itself fails. The cost is range-checked when settings load, so a failure
    /// here means the primitive is broken rather than the input being bad.
    pub fn hash(&self, plaintext: &str) -> String {
        match bcrypt::hash(plaintext, self.cost) {
            Ok(hash) => hash,
            Err(e) => panic!("bcrypt hashing failed: {}", e),
        }
    }

    /// Checks `plaintext` against a hash produced by [`PasswordHasher::hash`].
    ///
    /// Salt and cost are read from the hash, so hashes made under an older cost still verify.
    pub fn verify(&self, hash: &str, plaintext: &str) -> Result<(), PasswordError> {
        if hash.is_empty() || plaintext.is_empty() {
            return Err(PasswordError::Empty);
        }
        match bcrypt::verify(plaintext, hash) {
            Ok(true) => Ok(()),
            Ok(false) => Err(PasswordError::Mismatch),
            Err(_) => Err(PasswordError::MalformedHash),
        }
    }
}
