//! Salted PBKDF2-HMAC-SHA256 password hashes.
//!
//! Stored form: `pbkdf2_sha256$<iterations>$<salt b64>$<hash b64>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::CryptoError;

pub const ALGORITHM: &str = "pbkdf2_sha256";
pub const DEFAULT_ITERATIONS: u32 = 600_000;
pub const HASH_LENGTH: usize = 32;
pub const SALT_LENGTH: usize = 16;

/// Hash `password` with a fresh random salt.
pub fn hash_password(password: &str, iterations: u32) -> String {
    let salt = generate_salt();
    let hash = derive(password, &salt, iterations);
    format!(
        "{ALGORITHM}${iterations}${}${}",
        STANDARD.encode(salt),
        STANDARD.encode(hash)
    )
}

/// Check `password` against a stored hash. Comparison is constant-time.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, CryptoError> {
    let mut parts = stored.split('$');
    let (Some(algorithm), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(CryptoError::MalformedHash);
    };

    if algorithm != ALGORITHM {
        return Err(CryptoError::UnsupportedAlgorithm(algorithm.to_string()));
    }
    let iterations: u32 = iterations.parse().map_err(|_| CryptoError::MalformedHash)?;
    let salt = STANDARD.decode(salt).map_err(|_| CryptoError::MalformedHash)?;
    let expected = STANDARD.decode(expected).map_err(|_| CryptoError::MalformedHash)?;

    let actual = derive(password, &salt, iterations);
    Ok(actual.as_slice().ct_eq(expected.as_slice()).unwrap_u8() == 1)
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Generate a cryptographically random salt
fn generate_salt() -> [u8; SALT_LENGTH] {
    use rand::RngCore;
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: u32 = 1_000;

    #[test]
    fn correct_password_verifies() {
        let stored = hash_password("s3cret-pass", FAST);
        assert!(verify_password("s3cret-pass", &stored).unwrap());
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let stored = hash_password("s3cret-pass", FAST);
        assert!(!verify_password("s3cret-pasS", &stored).unwrap());
    }

    #[test]
    fn same_password_gets_different_salts() {
        let a = hash_password("password", FAST);
        let b = hash_password("password", FAST);
        assert_ne!(a, b);
    }

    #[test]
    fn stored_form_records_algorithm_and_iterations() {
        let stored = hash_password("password", FAST);
        assert!(stored.starts_with("pbkdf2_sha256$1000$"));
        assert_eq!(stored.split('$').count(), 4);
    }

    #[test]
    fn malformed_hashes_are_errors() {
        assert_eq!(verify_password("x", "garbage"), Err(CryptoError::MalformedHash));
        assert_eq!(
            verify_password("x", "pbkdf2_sha256$abc$AAAA$AAAA"),
            Err(CryptoError::MalformedHash)
        );
        assert_eq!(
            verify_password("x", "md5$1$AAAA$AAAA"),
            Err(CryptoError::UnsupportedAlgorithm("md5".into()))
        );
    }
}
