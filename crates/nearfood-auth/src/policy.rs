//! Credential shape validation, applied before any backend call.

use crate::AuthError;

/// Minimum sign-up password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Validate a password for account creation. Requires at least
/// [`MIN_PASSWORD_LEN`] characters with uppercase, lowercase, a digit,
/// and a special character.
pub fn validate_new_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_alphanumeric());

    if !(has_upper && has_lower && has_digit && has_special) {
        return Err(AuthError::WeakPassword(
            "must contain uppercase, lowercase, a number, and a special character".to_string(),
        ));
    }

    Ok(())
}

/// Shape check for an email address. The backend does the real
/// verification; this only rejects obvious garbage early.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AuthError::InvalidEmail);
    };
    if local.is_empty()
        || domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || email.contains(char::is_whitespace)
    {
        return Err(AuthError::InvalidEmail);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes() {
        assert!(validate_new_password("Secure#Pass1").is_ok());
    }

    #[test]
    fn weak_passwords_fail() {
        assert!(validate_new_password("short1!").is_err());
        assert!(validate_new_password("alllowercase1!").is_err());
        assert!(validate_new_password("ALLUPPERCASE1!").is_err());
        assert!(validate_new_password("NoDigitsHere!").is_err());
        assert!(validate_new_password("NoSpecial123").is_err());
    }

    #[test]
    fn email_shapes() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email(" ada@example.com ").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ada@").is_err());
        assert!(validate_email("ada@nodot").is_err());
        assert!(validate_email("ada@.com").is_err());
        assert!(validate_email("a da@example.com").is_err());
    }
}
