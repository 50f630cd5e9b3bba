//! Field validation for signup and profile updates.
//!
//! Every rule is checked and all violations are reported together, formatted as
//! `field: reason; field: reason`.

use chrono::{NaiveDate, Utc};
use std::fmt;
use url::Url;

use crate::db::models::{
    ExperienceLevel, NewUser, ProfileUpdate, UpdateUserRequest, UserType, ValidatedUser,
};
use crate::error::AppError;

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 100;
pub const PASSWORD_MIN_LENGTH: usize = 6;
/// bcrypt ignores everything past 72 bytes.
pub const PASSWORD_MAX_BYTES: usize = 72;
pub const EMAIL_MAX_LENGTH: usize = 254;
pub const ORGANISATION_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<(), AppError> {
        if self.0.is_empty() {
            return Ok(());
        }
        let message = self
            .0
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(AppError::ValidationError(message))
    }
}

/// Lower-cases and trims an address so lookups and the unique index agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    if email.len() > EMAIL_MAX_LENGTH || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2
        && labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

fn check_name(v: &mut Violations, field: &'static str, value: &str) -> String {
    let value = value.trim();
    let len = value.chars().count();
    if !(NAME_MIN_LENGTH..=NAME_MAX_LENGTH).contains(&len) {
        v.push(
            field,
            format!(
                "must be between {} and {} characters",
                NAME_MIN_LENGTH, NAME_MAX_LENGTH
            ),
        );
    }
    value.to_string()
}

fn check_email(v: &mut Violations, value: &str) -> String {
    let email = normalize_email(value);
    if !is_valid_email(&email) {
        v.push("email", "must be a valid email address");
    }
    email
}

fn check_date_of_birth(v: &mut Violations, value: NaiveDate) {
    if value > Utc::now().date_naive() {
        v.push("date_of_birth", "cannot be in the future");
    }
}

fn check_organisation(v: &mut Violations, field: &'static str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.chars().count() > ORGANISATION_MAX_LENGTH {
        v.push(
            field,
            format!("must be at most {} characters", ORGANISATION_MAX_LENGTH),
        );
    }
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// Unlike signup, an update that names a field must give it a value.
fn check_updated_organisation(
    v: &mut Violations,
    field: &'static str,
    value: &str,
) -> Option<String> {
    let checked = check_organisation(v, field, value);
    if checked.is_none() {
        v.push(field, "cannot be blank");
    }
    checked
}

fn check_user_type(v: &mut Violations, value: &str) -> Option<UserType> {
    match value.parse::<UserType>() {
        Ok(t) => Some(t),
        Err(_) => {
            v.push("user_type", "must be one of: Student, Professional");
            None
        }
    }
}

fn check_experience_level(v: &mut Violations, value: &str) -> Option<ExperienceLevel> {
    match value.parse::<ExperienceLevel>() {
        Ok(level) => Some(level),
        Err(_) => {
            v.push(
                "experience_level",
                "must be one of: Fresher, Entry-level, Mid-level, Senior-level",
            );
            None
        }
    }
}

fn check_resume_url(v: &mut Violations, value: &str) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => v.push("resume_urls", format!("'{}' is not a valid http(s) URL", value)),
    }
}

/// Validates a signup body.
///
/// A missing password is reported on its own, after the other field checks pass, with the
/// message "password cannot be null".
pub fn validate_new_user(candidate: NewUser) -> Result<ValidatedUser, AppError> {
    let mut v = Violations::default();

    let first_name = match candidate.first_name.as_deref() {
        Some(name) => check_name(&mut v, "first_name", name),
        None => {
            v.push("first_name", "is required");
            String::new()
        }
    };
    let last_name = match candidate.last_name.as_deref() {
        Some(name) => check_name(&mut v, "last_name", name),
        None => {
            v.push("last_name", "is required");
            String::new()
        }
    };
    match candidate.date_of_birth {
        Some(dob) => check_date_of_birth(&mut v, dob),
        None => v.push("date_of_birth", "is required"),
    }
    let email = match candidate.email.as_deref() {
        Some(email) => check_email(&mut v, email),
        None => {
            v.push("email", "is required");
            String::new()
        }
    };
    if let Some(password) = candidate.password.as_deref() {
        if password.chars().count() < PASSWORD_MIN_LENGTH {
            v.push(
                "password",
                format!("must be at least {} characters", PASSWORD_MIN_LENGTH),
            );
        } else if password.len() > PASSWORD_MAX_BYTES {
            v.push(
                "password",
                format!("must be at most {} bytes", PASSWORD_MAX_BYTES),
            );
        }
    }
    let user_type = match candidate.user_type.as_deref() {
        Some(t) => check_user_type(&mut v, t),
        None => {
            v.push("user_type", "is required");
            None
        }
    };
    let experience_level = match candidate.experience_level.as_deref() {
        Some(level) => check_experience_level(&mut v, level),
        None => {
            v.push("experience_level", "is required");
            None
        }
    };
    let college = candidate
        .college
        .as_deref()
        .and_then(|c| check_organisation(&mut v, "college", c));
    let current_company = candidate
        .current_company
        .as_deref()
        .and_then(|c| check_organisation(&mut v, "current_company", c));
    for url in &candidate.resume_urls {
        check_resume_url(&mut v, url);
    }

    v.into_result()?;

    let password = candidate
        .password
        .ok_or_else(|| AppError::ValidationError("password cannot be null".to_string()))?;

    match (candidate.date_of_birth, user_type, experience_level) {
        (Some(date_of_birth), Some(user_type), Some(experience_level)) => Ok(ValidatedUser {
            first_name,
            last_name,
            date_of_birth,
            email,
            password,
            user_type,
            experience_level,
            college,
            current_company,
            resume_urls: candidate.resume_urls,
        }),
        _ => Err(AppError::ValidationError("incomplete user record".to_string())),
    }
}

/// Validates a profile update. Only present fields are checked; an update with no fields
/// is rejected.
pub fn validate_profile_update(request: UpdateUserRequest) -> Result<ProfileUpdate, AppError> {
    let mut v = Violations::default();

    let update = ProfileUpdate {
        first_name: request
            .first_name
            .as_deref()
            .map(|n| check_name(&mut v, "first_name", n)),
        last_name: request
            .last_name
            .as_deref()
            .map(|n| check_name(&mut v, "last_name", n)),
        email: request.email.as_deref().map(|e| check_email(&mut v, e)),
        date_of_birth: request.date_of_birth.map(|dob| {
            check_date_of_birth(&mut v, dob);
            dob
        }),
        user_type: request
            .user_type
            .as_deref()
            .and_then(|t| check_user_type(&mut v, t)),
        experience_level: request
            .experience_level
            .as_deref()
            .and_then(|l| check_experience_level(&mut v, l)),
        college: request
            .college
            .as_deref()
            .and_then(|c| check_updated_organisation(&mut v, "college", c)),
        current_company: request
            .current_company
            .as_deref()
            .and_then(|c| check_updated_organisation(&mut v, "current_company", c)),
    };

    v.into_result()?;

    if update.is_empty() {
        return Err(AppError::ValidationError(
            "request contains no updatable fields".to_string(),
        ));
    }
    Ok(update)
}
