//! Credential policy: email shape and password rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Aggregate, CoreError};
use crate::limits::PASSWORD_MAX_BYTES;

/// Shape every email address must have.
pub const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%-]+@[A-Za-z0-9.-]+[.][A-Za-z]+$";

/// Characters that satisfy the "special character" rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*? ";

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const PASSWORD_IN_EMAIL: &str = "Password must not be part of the email address.";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters long.";
pub const PASSWORD_NO_DIGIT: &str = "Password must contain at least one digit.";
pub const PASSWORD_NO_UPPERCASE: &str = "Password must contain at least one uppercase letter.";
pub const PASSWORD_NO_LOWERCASE: &str = "Password must contain at least one lowercase letter.";
pub const PASSWORD_NO_SPECIAL: &str =
    "Password must contain at least one special character (!@#$%^&*?).";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("email pattern is a valid regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn is_upper(c: char) -> bool {
    c.is_ascii_uppercase() || "ÁÉÍÓÚ".contains(c)
}

fn is_lower(c: char) -> bool {
    c.is_ascii_lowercase() || "áéíóú".contains(c)
}

/// Check a password against every rule and report all failures together.
///
/// The email is used for the "not contained in the local part" rule.
pub fn check_password_policy(password: &str, email: &str) -> Result<(), CoreError> {
    let mut failures = Aggregate::new();
    let local_part = email.split('@').next().unwrap_or_default();

    if local_part.contains(password) {
        failures.push(PASSWORD_IN_EMAIL);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        failures.push(PASSWORD_TOO_SHORT);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        failures.push(PASSWORD_NO_DIGIT);
    }
    if !password.chars().any(is_upper) {
        failures.push(PASSWORD_NO_UPPERCASE);
    }
    if !password.chars().any(is_lower) {
        failures.push(PASSWORD_NO_LOWERCASE);
    }
    if !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        failures.push(PASSWORD_NO_SPECIAL);
    }

    failures.into_result(CoreError::PasswordRestrictions)
}

/// The adaptive hash only accepts inputs up to [`PASSWORD_MAX_BYTES`].
pub fn check_password_size(password: &str) -> Result<(), CoreError> {
    if password.len() > PASSWORD_MAX_BYTES {
        return Err(CoreError::PasswordTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn failures(password: &str, email: &str) -> Vec<String> {
        match check_password_policy(password, email) {
            Ok(()) => vec![],
            Err(CoreError::PasswordRestrictions(agg)) => agg.into_messages(),
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn strong_password_passes() {
        assert!(check_password_policy("Abcdef1!", "a@b.co").is_ok());
    }

    #[test]
    fn weak_password_reports_every_rule() {
        let found = failures("abc", "a@b.co");
        assert_eq!(
            found,
            vec![
                PASSWORD_TOO_SHORT,
                PASSWORD_NO_DIGIT,
                PASSWORD_NO_UPPERCASE,
                PASSWORD_NO_SPECIAL,
            ]
        );
    }

    #[test]
    fn password_inside_local_part_fails() {
        let found = failures("Secret1!", "xxSecret1!yy@mail.com");
        assert!(found.contains(&PASSWORD_IN_EMAIL.to_string()));
    }

    #[test]
    fn domain_part_does_not_count() {
        assert!(check_password_policy("Mail.co1!", "someone@Mail.co1!").is_ok());
    }

    #[test]
    fn accented_letters_count_for_case_rules() {
        assert!(check_password_policy("ÁÉÍÓÚ12!x", "a@b.co").is_ok());
        assert!(check_password_policy("áéíóú12!X", "a@b.co").is_ok());
    }

    #[test]
    fn space_counts_as_special() {
        assert!(check_password_policy("Abc def1", "a@b.co").is_ok());
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last%tag@mail.example.org"));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a+b@c.com"));
        assert!(!is_valid_email("a@b.c0"));
    }

    #[test]
    fn password_size_is_measured_in_bytes() {
        assert!(check_password_size(&"a".repeat(72)).is_ok());
        assert_eq!(
            check_password_size(&"a".repeat(73)),
            Err(CoreError::PasswordTooLong)
        );
        // 37 two-byte characters exceed 72 bytes.
        assert_eq!(
            check_password_size(&"é".repeat(37)),
            Err(CoreError::PasswordTooLong)
        );
    }

    proptest! {
        #[test]
        fn prop_policy_is_total(password in "\\PC{0,20}", local in "[a-z0-9.]{1,12}") {
            let email = format!("{local}@example.com");
            let found = failures(&password, &email);

            // Every reported rule appears exactly once.
            let mut deduped = found.clone();
            deduped.sort();
            deduped.dedup();
            prop_assert_eq!(deduped.len(), found.len());

            // A failure is reported iff some rule is actually broken.
            let broken = local.contains(password.as_str())
                || password.chars().count() < MIN_PASSWORD_LENGTH
                || !password.chars().any(|c| c.is_ascii_digit())
                || !password.chars().any(is_upper)
                || !password.chars().any(is_lower)
                || !password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));
            prop_assert_eq!(broken, !found.is_empty());
        }
    }
}
