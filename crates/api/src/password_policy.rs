// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password rules for console users.
//!
//! Applied whenever a password is set or changed through the API. Seeded
//! demo accounts are not re-validated.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password uses too few kinds of characters.
    #[error(
        "Password must mix at least {required} of: letters, digits, symbols (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password repeats an account identifier.
    #[error("Password must not match the {field}")]
    MatchesAccountField { field: &'static str },
}

/// Password policy configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
    /// Minimum number of character kinds required (out of 3).
    pub min_kinds: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            min_kinds: 2,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password for the account it is being set on.
    ///
    /// # Arguments
    ///
    /// * `password` - The plain-text password
    /// * `user_id` - The account's user id (password must not match)
    /// * `username` - The account's login name (password must not match)
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` if the password does not meet policy requirements.
    pub fn validate(
        &self,
        password: &str,
        user_id: &str,
        username: &str,
    ) -> Result<(), PasswordPolicyError> {
        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let found: usize = Self::character_kinds(password);
        if found < self.min_kinds {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_kinds,
                found,
            });
        }

        if password.eq_ignore_ascii_case(user_id) {
            return Err(PasswordPolicyError::MatchesAccountField { field: "user id" });
        }
        if password.eq_ignore_ascii_case(username) {
            return Err(PasswordPolicyError::MatchesAccountField { field: "username" });
        }

        Ok(())
    }

    /// Counts how many of letters, digits and symbols appear.
    fn character_kinds(password: &str) -> usize {
        let letters: bool = password.chars().any(char::is_alphabetic);
        let digits: bool = password.chars().any(|c| c.is_ascii_digit());
        let symbols: bool = password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace());
        [letters, digits, symbols].into_iter().filter(|k| *k).count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_style_password_is_accepted() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        assert!(policy.validate("admin123", "USR-QA-1", "qa").is_ok());
        assert!(policy.validate("pdi-desk!", "USR-QA-1", "qa").is_ok());
    }

    #[test]
    fn test_password_too_short() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        let result: Result<(), PasswordPolicyError> = policy.validate("ab12", "USR-QA-1", "qa");

        assert_eq!(result, Err(PasswordPolicyError::TooShort { min_length: 8 }));
    }

    #[test]
    fn test_single_kind_is_rejected() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        let result: Result<(), PasswordPolicyError> =
            policy.validate("onlyletters", "USR-QA-1", "qa");

        assert_eq!(
            result,
            Err(PasswordPolicyError::InsufficientComplexity {
                required: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_password_cannot_repeat_account_ids() {
        let policy: PasswordPolicy = PasswordPolicy::default();

        let as_id: Result<(), PasswordPolicyError> =
            policy.validate("usr-qa-1", "USR-QA-1", "qa-desk");
        let as_username: Result<(), PasswordPolicyError> =
            policy.validate("QA-Desk-01", "USR-QA-1", "qa-desk-01");

        assert_eq!(
            as_id,
            Err(PasswordPolicyError::MatchesAccountField { field: "user id" })
        );
        assert_eq!(
            as_username,
            Err(PasswordPolicyError::MatchesAccountField { field: "username" })
        );
    }

    #[test]
    fn test_character_kinds() {
        assert_eq!(PasswordPolicy::character_kinds("a1!"), 3);
        assert_eq!(PasswordPolicy::character_kinds("abc1"), 2);
        assert_eq!(PasswordPolicy::character_kinds("a b"), 1);
        assert_eq!(PasswordPolicy::character_kinds(""), 0);
    }
}
