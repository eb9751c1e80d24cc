//! Client-side form checks.
//!
//! These run in the client handles before any message reaches a store, so an invalid form
//! never produces a network call. Every failing field is reported, not just the first.

use crate::model::{ActionForm, Credentials};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

static HEX_COLOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").expect("hex color pattern")
});

pub const PASSWORD_MIN_LEN: usize = 6;
pub const NAME_LEN: (usize, usize) = (3, 100);
pub const DESCRIPTION_LEN: (usize, usize) = (10, 500);

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every rejected field of a form, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn render(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationErrors {
    /// The message for `field`, if it was rejected.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn reject(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn length(&mut self, field: &'static str, label: &str, value: &str, (min, max): (usize, usize)) {
        let len = value.chars().count();
        if value.trim().is_empty() {
            self.reject(field, format!("{label} is required"));
        } else if len < min {
            self.reject(field, format!("{label} must be at least {min} characters"));
        } else if len > max {
            self.reject(field, format!("{label} cannot exceed {max} characters"));
        }
    }

    fn finish(self) -> Result<(), ValidationErrors> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

/// Login form: e-mail shaped username, password of at least six characters.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();

    let username = credentials.username.trim();
    if username.is_empty() {
        errors.reject("username", "Email is required");
    } else if !EMAIL_RE.is_match(username) {
        errors.reject("username", "Enter a valid email address");
    }

    if credentials.password.is_empty() {
        errors.reject("password", "Password is required");
    } else if credentials.password.chars().count() < PASSWORD_MIN_LEN {
        errors.reject(
            "password",
            format!("Password must be at least {PASSWORD_MIN_LEN} characters"),
        );
    }

    errors.finish()
}

/// Create form: name and description lengths, optional hex color and image icon.
pub fn validate_action_form(form: &ActionForm) -> Result<(), ValidationErrors> {
    let mut errors = Collector::default();

    errors.length("name", "Name", &form.name, NAME_LEN);
    errors.length("description", "Description", &form.description, DESCRIPTION_LEN);

    if let Some(color) = form.normalized_color() {
        if !HEX_COLOR_RE.is_match(&color) {
            errors.reject("color", "Color must be a hex value like #1e3a5f");
        }
    }

    if let Some(icon) = &form.icon {
        if !icon.content_type.starts_with("image/") {
            errors.reject("icon", "Icon must be an image");
        }
    }

    errors.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IconFile;

    #[test]
    fn test_credentials_rules() {
        assert!(validate_credentials(&Credentials::new("admin@example.com", "secret1")).is_ok());

        let errors = validate_credentials(&Credentials::new("admin", "123")).unwrap_err();
        assert_eq!(errors.field("username"), Some("Enter a valid email address"));
        assert_eq!(errors.field("password"), Some("Password must be at least 6 characters"));

        let errors = validate_credentials(&Credentials::new(" ", "")).unwrap_err();
        assert_eq!(errors.field("username"), Some("Email is required"));
        assert_eq!(errors.field("password"), Some("Password is required"));
    }

    #[test]
    fn test_form_lengths() {
        let ok = ActionForm::new("Recycle", "Sort the weekly trash");
        assert!(validate_action_form(&ok).is_ok());

        let errors = validate_action_form(&ActionForm::new("ab", "short")).unwrap_err();
        assert_eq!(errors.0.len(), 2);
        assert_eq!(errors.field("name"), Some("Name must be at least 3 characters"));
        assert_eq!(
            errors.field("description"),
            Some("Description must be at least 10 characters")
        );

        let long = ActionForm::new("x".repeat(101), "d".repeat(501));
        let errors = validate_action_form(&long).unwrap_err();
        assert_eq!(errors.field("name"), Some("Name cannot exceed 100 characters"));
        assert_eq!(errors.field("description"), Some("Description cannot exceed 500 characters"));
    }

    #[test]
    fn test_color_gets_hash_prefix_before_checking() {
        let form = ActionForm::new("Recycle", "Sort the weekly trash");
        assert!(validate_action_form(&form.clone().with_color("1e3a5f")).is_ok());
        assert!(validate_action_form(&form.clone().with_color("#abc")).is_ok());
        assert!(validate_action_form(&form.clone().with_color("")).is_ok());

        let errors = validate_action_form(&form.with_color("#12345")).unwrap_err();
        assert!(errors.field("color").is_some());
    }

    #[test]
    fn test_icon_must_be_an_image() {
        let icon = |content_type: &str| IconFile {
            file_name: "icon".into(),
            content_type: content_type.into(),
            bytes: vec![0; 4],
        };
        let form = ActionForm::new("Recycle", "Sort the weekly trash");
        assert!(validate_action_form(&form.clone().with_icon(icon("image/png"))).is_ok());

        let errors = validate_action_form(&form.with_icon(icon("application/pdf"))).unwrap_err();
        assert_eq!(errors.to_string(), "icon: Icon must be an image");
    }
}
