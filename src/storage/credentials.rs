use super::Result;
use crate::error::StorageError;
use std::env;

/// Environment variable holding the personal access token secret
pub const TOKEN_SECRET_ENV: &str = "TABLEAU_PAT_SECRET";

#[cfg(not(test))]
const SECRET_VAR: &str = TOKEN_SECRET_ENV;
#[cfg(test)]
const SECRET_VAR: &str = "TEST_TABLEAU_PAT_SECRET";

fn read_secret_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|secret| !secret.trim().is_empty())
}

/// PAT secret from the environment, if set and non-blank
pub fn get_token_secret() -> Option<String> {
    read_secret_var(SECRET_VAR)
}

pub fn has_token_secret() -> bool {
    get_token_secret().is_some()
}

/// Ask for the secret on the terminal without echoing it
pub fn prompt_token_secret(token_name: &str) -> Result<String> {
    let secret = rpassword::prompt_password(format!("Token secret for '{}': ", token_name))
        .map_err(|e| StorageError::SecretInput {
            message: e.to_string(),
        })?;
    if secret.trim().is_empty() {
        return Err(StorageError::SecretInput {
            message: "no secret entered".to_string(),
        });
    }
    Ok(secret)
}

/// Explicit value first, then the environment, then an interactive prompt
pub fn resolve_token_secret(explicit: Option<String>, token_name: &str) -> Result<String> {
    if let Some(secret) = explicit.filter(|s| !s.trim().is_empty()) {
        return Ok(secret);
    }
    if let Some(secret) = get_token_secret() {
        log::debug!("Using token secret from {}", TOKEN_SECRET_ENV);
        return Ok(secret);
    }
    prompt_token_secret(token_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases touch the same variable, so they run in one test
    #[test]
    fn test_token_secret_from_env() {
        let original = env::var(SECRET_VAR).ok();

        unsafe {
            env::set_var(SECRET_VAR, "s3cr3t");
        }
        assert!(has_token_secret());
        assert_eq!(get_token_secret().as_deref(), Some("s3cr3t"));
        assert_eq!(
            resolve_token_secret(None, "ci-token").unwrap(),
            "s3cr3t".to_string()
        );

        unsafe {
            env::set_var(SECRET_VAR, "   ");
        }
        assert!(!has_token_secret());

        unsafe {
            match original {
                Some(value) => env::set_var(SECRET_VAR, value),
                None => env::remove_var(SECRET_VAR),
            }
        }
    }

    #[test]
    fn test_explicit_secret_wins() {
        let secret = resolve_token_secret(Some("from-flag".to_string()), "ci-token").unwrap();
        assert_eq!(secret, "from-flag");
    }

    #[test]
    fn test_read_secret_var_missing() {
        assert_eq!(read_secret_var("BLEAU_TEST_UNSET_SECRET_VAR"), None);
    }
}
