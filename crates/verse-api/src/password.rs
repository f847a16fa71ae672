use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as HashError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hash a plaintext password with Argon2id and a fresh random salt. The PHC
/// string embeds salt and parameters, so verification needs no side-channel
/// state.
pub fn hash(plaintext: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);

    let digest = Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)?
        .to_string();

    Ok(digest)
}

/// Check a plaintext against a stored digest. Mismatch is `Ok(false)`;
/// `Err` only means the digest itself could not be parsed.
pub fn verify(plaintext: &str, digest: &str) -> Result<bool, HashError> {
    let parsed = PasswordHash::new(digest)?;

    match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(e),
    }
}
