//! Argon2id password hashing.
//!
//! Every submission is hashed with the same fixed cost parameters and a fresh
//! random salt. The PHC string stored in the database carries both, so
//! [`verify_password`] needs nothing but the stored value.

use argon2::password_hash::SaltString;
use argon2::{password_hash, Algorithm, Argon2, Params, PasswordHasher, Version};
use rand::rngs::OsRng;

const MEMORY_COST_KIB: u32 = 19 * 1024;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

fn argon2_config() -> Result<Argon2<'static>, password_hash::Error> {
    let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hashes `plaintext` and returns the PHC string.
pub fn hash_password(plaintext: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = argon2_config()?;
    let password_hash = argon2.hash_password(plaintext.as_bytes(), &salt)?.to_string();
    Ok(password_hash)
}

/// Hashes on the blocking pool so that the async workers keep serving requests.
pub async fn hash_password_blocking(plaintext: String) -> Result<String, anyhow::Error> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&plaintext)).await?;
    hash.map_err(|err| anyhow::anyhow!("Could not hash password: {err}"))
}

#[cfg(test)]
pub fn verify_password(plaintext: &str, stored_hash: &str) -> bool {
    use argon2::{PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(stored_hash) {
        Ok(hash) => hash,
        Err(_) => return false,
    };

    match argon2_config() {
        Ok(argon2) => argon2
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok(),
        Err(_) => false,
    }
}
