//! Password hashing: PBKDF2-HMAC-SHA256, hex encoded

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

/// Bytes of derived key (SHA-256 output size).
const DERIVED_KEY_LEN: usize = 32;

/// Draw a fresh random salt of `n_bytes`, hex encoded.
#[must_use]
pub fn generate_salt(n_bytes: usize) -> String {
    let mut bytes = vec![0u8; n_bytes];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Hash `password` with `salt` using `iterations` PBKDF2 rounds.
#[must_use]
pub fn hash_password(password: &str, salt: &str, iterations: u32) -> String {
    let mut derived = [0u8; DERIVED_KEY_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut derived);
    hex::encode(derived)
}
