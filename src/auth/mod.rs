pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::UserSummary;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password, verify_unknown_account};
pub use token::{generate_token, verify_token, Claims};

lazy_static! {
    static ref ALPHANUMERIC_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9]+$").unwrap();
}

/// Symbols a password may contain; at least one is required.
const PASSWORD_SYMBOLS: &str = "@#$%^&!";

/// Represents the payload for a new user signup request.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Between 3 and 20 characters, letters and digits only.
    #[validate(
        length(min = 3, max = 20),
        regex(path = "ALPHANUMERIC_REGEX", message = "First name must be alphanumeric")
    )]
    pub firstname: String,
    /// Between 3 and 20 characters.
    #[validate(length(min = 3, max = 20))]
    pub lastname: String,
    /// Must be a valid email. The top-level domain is checked separately against configuration.
    #[validate(email)]
    pub email: String,
    /// 6 to 30 characters mixing lowercase, uppercase, digits and a symbol from `@#$%^&!`.
    #[validate(custom = "validate_password_strength")]
    pub password: String,
}

impl SignupRequest {
    /// Runs the field rules plus the email domain rule for `allowed_tlds`.
    pub fn validate_for_signup(&self, allowed_tlds: &[String]) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Err(error) = validate_email_domain(&self.email, allowed_tlds) {
            errors.add("email", error);
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Represents the payload for a user login request.
///
/// No format rules are applied: any mismatch is reported as invalid credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Represents the payload for a profile update. All four fields are required.
///
/// The password rule here is only "non-empty", looser than signup.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1))]
    pub firstname: String,
    #[validate(length(min = 1))]
    pub lastname: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response body for a successful login. The same token is also set as a cookie.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserSummary,
    pub token: String,
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let length = password.chars().count();
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if (6..=30).contains(&length) && allowed && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(Cow::from(
            "Password must be 6-30 characters with lowercase, uppercase, digit and one of @#$%^&!",
        ));
        Err(error)
    }
}

/// Requires at least two domain labels and, when `allowed_tlds` is non-empty, a listed TLD.
fn validate_email_domain(email: &str, allowed_tlds: &[String]) -> Result<(), ValidationError> {
    let domain = email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("");
    let labels: Vec<&str> = domain.split('.').collect();

    let tld_ok = match labels.last() {
        Some(tld) if labels.len() >= 2 => {
            allowed_tlds.is_empty() || allowed_tlds.iter().any(|allowed| allowed.eq_ignore_ascii_case(tld))
        }
        _ => false,
    };

    if tld_ok {
        Ok(())
    } else {
        let mut error = ValidationError::new("email_tld");
        error.message = Some(Cow::from("Email domain is not allowed"));
        Err(error)
    }
}
