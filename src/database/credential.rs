use std::future::Future;

use crate::{error::StoreError, utils::verify_password};

/// Length of every bcrypt hash. Anything shorter predates hashing.
const BCRYPT_HASH_LEN: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialMatch {
    /// Matched a bcrypt hash
    Hashed,
    /// Matched a plaintext credential that should now be re-stored hashed
    Legacy,
    Mismatch,
}

impl CredentialMatch {
    pub fn is_valid(self) -> bool {
        !matches!(self, CredentialMatch::Mismatch)
    }
}

/// Compares a submitted secret with the stored credential.
///
/// Stored values shorter than a bcrypt hash are plaintext left over from
/// before hashing was introduced and are compared for equality. An empty
/// stored value never matches.
pub fn check_credential(
    stored: &str,
    submitted: &str,
) -> Result<CredentialMatch, bcrypt::BcryptError> {
    if stored.len() < BCRYPT_HASH_LEN {
        return Ok(if !stored.is_empty() && stored == submitted {
            CredentialMatch::Legacy
        } else {
            CredentialMatch::Mismatch
        });
    }

    Ok(if verify_password(submitted, stored)? {
        CredentialMatch::Hashed
    } else {
        CredentialMatch::Mismatch
    })
}

/// Verifies `submitted` against `stored` and, on a legacy plaintext match,
/// re-stores it hashed through `upgrade`. A failed upgrade is logged and
/// does not fail the login.
pub async fn verify_and_upgrade<F, Fut>(
    stored: &str,
    submitted: &str,
    upgrade: F,
) -> Result<bool, StoreError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), StoreError>>,
{
    let outcome = check_credential(stored, submitted)?;
    if outcome == CredentialMatch::Legacy {
        tracing::warn!("Admin credential stored in plaintext, upgrading to bcrypt");
        if let Err(e) = upgrade().await {
            tracing::error!(error = %e, "Failed to upgrade legacy admin credential");
        }
    }

    Ok(outcome.is_valid())
}
