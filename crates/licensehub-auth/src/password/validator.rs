//! Password policy enforcement for new accounts.

use licensehub_core::config::AuthConfig;
use licensehub_core::error::AppError;

/// Validates password strength against configured policies.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Validates a password for a new account.
    ///
    /// `user_inputs` (username, email, nick) are passed to zxcvbn so a
    /// password built from them scores low.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> Result<(), AppError> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if estimate.score() < zxcvbn::Score::Three {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password with more entropy.",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PasswordValidator {
        PasswordValidator::new(&AuthConfig::default())
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(validator().validate("aB3$", &[]).is_err());
    }

    #[test]
    fn test_weak_password_rejected() {
        assert!(validator().validate("password1", &[]).is_err());
        assert!(validator().validate("operator2026", &["operator2026"]).is_err());
    }

    #[test]
    fn test_strong_password_accepted() {
        assert!(
            validator()
                .validate("correct-Horse-battery-staple-91", &["admin"])
                .is_ok()
        );
    }
}
