/// Registration and login payload validation
///
/// Email addresses must pass both the `validator` crate's RFC 5322 check and
/// a stricter pattern that requires a dotted domain with an alphabetic TLD.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use validator::ValidateEmail;

use super::{char_len, ValidationResult};

pub const NAME_TOO_SHORT_MESSAGE: &str = "name has to be at least 3 characters long";
pub const EMAIL_INVALID_MESSAGE: &str = "email invalid";
pub const PASSWORD_TOO_SHORT_MESSAGE: &str = "password has to be at least 5 characters long";
pub const PASSWORD_TOO_LONG_MESSAGE: &str = "password too long";

pub const LOGIN_EMAIL_MISSING_MESSAGE: &str = "missing e-mail";
pub const LOGIN_PASSWORD_MESSAGE: &str = "password is missing or has invalid length";
pub const LOGIN_EMAIL_INVALID_MESSAGE: &str = "e-mail invalid";

const NAME_MIN: usize = 3;
const PASSWORD_MIN: usize = 5;
const PASSWORD_MAX: usize = 72;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9\-]+(\.[a-zA-Z0-9\-]+)*\.[a-zA-Z]{2,}$")
        .expect("Invalid email regex pattern")
});

/// Body of `POST /register`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Body of `POST /login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Returns true if the address passes the RFC check and the strict pattern
pub fn is_valid_email(email: &str) -> bool {
    email.validate_email() && EMAIL_PATTERN.is_match(email)
}

/// Validates a registration payload
pub fn validate_register(request: &RegisterRequest) -> ValidationResult {
    let mut result = ValidationResult::passed();

    result.check(char_len(request.name.trim()) < NAME_MIN, NAME_TOO_SHORT_MESSAGE);
    result.check(!is_valid_email(&request.email), EMAIL_INVALID_MESSAGE);

    let password_len = char_len(request.password.trim());
    result.check(password_len < PASSWORD_MIN, PASSWORD_TOO_SHORT_MESSAGE);
    result.check(password_len > PASSWORD_MAX, PASSWORD_TOO_LONG_MESSAGE);

    result
}

/// Validates login credentials
///
/// Presence and format of the email are checked independently, so an empty
/// address reports both messages.
pub fn validate_login(request: &LoginRequest) -> ValidationResult {
    let mut result = ValidationResult::passed();

    result.check(request.email.trim().is_empty(), LOGIN_EMAIL_MISSING_MESSAGE);

    let password_len = char_len(request.password.trim());
    result.check(
        !(1..=PASSWORD_MAX).contains(&password_len),
        LOGIN_PASSWORD_MESSAGE,
    );

    result.check(!is_valid_email(&request.email), LOGIN_EMAIL_INVALID_MESSAGE);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(name: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_valid_emails() {
        for email in [
            "lorem@ipsum.com",
            "lorem+ipsum@dolor.et",
            "lorem.ipsum+dolor@est.co.uk",
            "lorem@ipsum.dolor.com",
        ] {
            assert!(is_valid_email(email), "{} should be valid", email);
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "lorem ipsum",
            "@ipsum.dolor.com",
            "lorem@",
            "lorem@com",
            "lorem@.com",
            "lorem@ipsum",
            "lorem ipsum@dolor",
            "lorem\"ipsum\"@dolor.com",
        ] {
            assert!(!is_valid_email(email), "{:?} should be invalid", email);
        }
    }

    #[test]
    fn test_register_valid() {
        let result = validate_register(&register("Lorem Ipsum", "lorem@ipsum.com", "l0r3mIpsum"));
        assert!(result.validated);
        assert!(result.message.is_empty());
    }

    #[test]
    fn test_register_short_names() {
        for name in ["", "Lo", "  Lo  ", "\tL\n"] {
            let result = validate_register(&register(name, "lorem@ipsum.com", "l0r3mIpsum"));
            assert!(!result.validated, "name {:?} should fail", name);
            assert!(result.message.contains(NAME_TOO_SHORT_MESSAGE));
        }
    }

    #[test]
    fn test_register_password_bounds() {
        let result = validate_register(&register("Lorem", "lorem@ipsum.com", "  abcd  "));
        assert_eq!(result.message, PASSWORD_TOO_SHORT_MESSAGE);

        let result = validate_register(&register("Lorem", "lorem@ipsum.com", &"p".repeat(73)));
        assert_eq!(result.message, PASSWORD_TOO_LONG_MESSAGE);

        assert!(validate_register(&register("Lorem", "lorem@ipsum.com", &"p".repeat(72))).validated);
        assert!(validate_register(&register("Lorem", "lorem@ipsum.com", "abcde")).validated);
    }

    #[test]
    fn test_register_accumulates_messages() {
        let result = validate_register(&register("L", "lorem@", "abc"));
        assert_eq!(
            result.message,
            "name has to be at least 3 characters long, email invalid, password has to be at least 5 characters long"
        );
    }

    #[test]
    fn test_login_valid() {
        let request = LoginRequest {
            email: "lorem@ipsum.com".to_string(),
            password: "l0r3mIpsum".to_string(),
        };
        assert!(validate_login(&request).validated);
    }

    #[test]
    fn test_login_empty_email_reports_presence_and_format() {
        let request = LoginRequest {
            email: "  ".to_string(),
            password: "l0r3mIpsum".to_string(),
        };

        let result = validate_login(&request);
        assert!(!result.validated);
        assert_eq!(result.message, "missing e-mail, e-mail invalid");
    }

    #[test]
    fn test_login_password_bounds() {
        let mut request = LoginRequest {
            email: "lorem@ipsum.com".to_string(),
            password: "   ".to_string(),
        };
        assert_eq!(validate_login(&request).message, LOGIN_PASSWORD_MESSAGE);

        request.password = "x".repeat(73);
        assert_eq!(validate_login(&request).message, LOGIN_PASSWORD_MESSAGE);

        request.password = "x".to_string();
        assert!(validate_login(&request).validated);
    }

    #[test]
    fn test_login_request_tolerates_missing_fields() {
        let request: LoginRequest = serde_json::from_str("{}").unwrap();
        let result = validate_login(&request);
        assert_eq!(
            result.message,
            "missing e-mail, password is missing or has invalid length, e-mail invalid"
        );
    }
}
