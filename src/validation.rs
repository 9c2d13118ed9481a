// Request bodies and their field checks. The client sends the same types.
//
// Every field is optional at the serde level so a missing field reports the
// same structured error as a blank one instead of a deserialization failure.

use serde::{Deserialize, Serialize};

use crate::database::models::{ProfileFields, Social};
use crate::error::FieldError;

pub const INVALID_EMAIL: &str = "Please include a valid email";
pub const SHORT_PASSWORD: &str = "Please enter a password with 6 or more characters";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const NAME_REQUIRED: &str = "Name is required";
pub const TEXT_REQUIRED: &str = "Text is required";

const MIN_PASSWORD_LEN: usize = 6;

pub type Checked = Result<(), Vec<FieldError>>;

fn finish(errors: Vec<FieldError>) -> Checked {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Loose address check: one `@`, a local part and a dotted domain.
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let mut parts = value.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !local.is_empty()
        && domain
            .split('.')
            .collect::<Vec<_>>()
            .split_first()
            .map_or(false, |(head, rest)| {
                !head.is_empty() && !rest.is_empty() && rest.iter().all(|label| !label.is_empty())
            })
}

fn check_email(email: &Option<String>, errors: &mut Vec<FieldError>) {
    if !email.as_deref().map_or(false, is_email) {
        errors.push(FieldError::body("email", INVALID_EMAIL, email.as_deref()));
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Checked {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);

        let long_enough = self
            .password
            .as_deref()
            .map_or(false, |p| p.chars().count() >= MIN_PASSWORD_LEN);
        if !long_enough {
            errors.push(FieldError::body("password", SHORT_PASSWORD, self.password.as_deref()));
        }

        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginRequest {
    pub fn validate(&self) -> Checked {
        let mut errors = Vec::new();
        check_email(&self.email, &mut errors);

        if self.password.as_deref().map_or(true, str::is_empty) {
            errors.push(FieldError::body("password", PASSWORD_REQUIRED, self.password.as_deref()));
        }

        finish(errors)
    }
}

/// Flat profile form; social links arrive as top-level fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub youtube: Option<String>,
    pub facebook: Option<String>,
    pub linkedin: Option<String>,
    pub instagram: Option<String>,
}

impl ProfileRequest {
    pub fn validate(&self) -> Checked {
        let mut errors = Vec::new();
        if blank(&self.name) {
            errors.push(FieldError::body("name", NAME_REQUIRED, self.name.as_deref()));
        }
        finish(errors)
    }

    /// Empty strings clear a field, matching a form that was left blank.
    pub fn into_fields(self) -> ProfileFields {
        fn present(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.is_empty())
        }

        ProfileFields {
            name: self.name.unwrap_or_default(),
            bio: present(self.bio),
            location: present(self.location),
            website: present(self.website),
            social: Social {
                youtube: present(self.youtube),
                facebook: present(self.facebook),
                linkedin: present(self.linkedin),
                instagram: present(self.instagram),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TweetRequest {
    pub text: Option<String>,
}

impl TweetRequest {
    pub fn validate(&self) -> Checked {
        let mut errors = Vec::new();
        if blank(&self.text) {
            errors.push(FieldError::body("text", TEXT_REQUIRED, self.text.as_deref()));
        }
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_check() {
        assert!(is_email("a@x.com"));
        assert!(is_email("first.last@mail.example.org"));
        assert!(!is_email("not-an-email"));
        assert!(!is_email("a@x"));
        assert!(!is_email("@x.com"));
        assert!(!is_email("a@@x.com"));
        assert!(!is_email("a b@x.com"));
        assert!(!is_email("a@x..com"));
    }

    #[test]
    fn register_reports_every_failing_field() {
        let req = RegisterRequest {
            email: Some("nope".into()),
            password: Some("123".into()),
        };
        let errors = req.validate().unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].param, "email");
        assert_eq!(errors[0].msg, INVALID_EMAIL);
        assert_eq!(errors[1].param, "password");
        assert_eq!(errors[1].msg, SHORT_PASSWORD);
    }

    #[test]
    fn missing_login_password_is_required() {
        let req = LoginRequest {
            email: Some("a@x.com".into()),
            password: None,
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].msg, PASSWORD_REQUIRED);
        assert!(errors[0].value.is_none());
    }

    #[test]
    fn whitespace_text_is_blank() {
        let req = TweetRequest {
            text: Some("   ".into()),
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].param, "text");
        assert_eq!(errors[0].location, "body");
    }

    #[test]
    fn profile_form_maps_social_links() {
        let req = ProfileRequest {
            name: Some("Ann".into()),
            bio: Some(String::new()),
            youtube: Some("yt/ann".into()),
            ..Default::default()
        };
        assert!(req.validate().is_ok());

        let fields = req.into_fields();
        assert_eq!(fields.name, "Ann");
        assert_eq!(fields.bio, None);
        assert_eq!(fields.social.youtube.as_deref(), Some("yt/ann"));
    }
}
