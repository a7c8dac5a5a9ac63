use sha2::{Digest, Sha256};

/// Hash a plaintext password into a lowercase hex SHA-256 digest
///
/// This is a single unsalted digest, not a password-hashing KDF. Swap in
/// argon2 or similar here; callers only rely on `hash_password` and
/// `verify_password`.
pub fn hash_password(plain: &str) -> String {
    hex::encode(Sha256::digest(plain.as_bytes()))
}

/// Check a plaintext password against a stored digest
pub fn verify_password(plain: &str, hash: &str) -> bool {
    constant_time_eq(hash_password(plain).as_bytes(), hash.as_bytes())
}

/// Compare two byte strings without short-circuiting on the first mismatch
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b.iter())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}
