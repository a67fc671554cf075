use bcrypt::{DEFAULT_COST, hash, verify};
use rand::{RngCore, rngs::OsRng};

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// `len` bytes from the OS random source, hex encoded.
///
/// Failure of the random source is returned, never papered over with a
/// weaker generator.
pub fn random_hex(len: usize) -> Result<String, rand::Error> {
    let mut bytes = vec![0u8; len];
    OsRng.try_fill_bytes(&mut bytes)?;
    Ok(hex::encode(bytes))
}

pub fn build_info() -> String {
    format!(
        "Version: {}\nOS/Arch: {}/{}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_hex_has_expected_length() {
        let id = random_hex(8).unwrap();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(random_hex(8).unwrap(), id);
    }

    #[test]
    fn hash_roundtrip() {
        let hashed = hash_password("hunter22").unwrap();
        assert_eq!(hashed.len(), 60);
        assert!(verify_password("hunter22", &hashed).unwrap());
        assert!(!verify_password("hunter23", &hashed).unwrap());
    }

    #[test]
    fn build_info_mentions_version() {
        let info = build_info();
        assert!(info.contains(env!("CARGO_PKG_VERSION")));
        assert!(info.contains("OS/Arch:"));
    }
}
