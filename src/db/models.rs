use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    Student,
    Professional,
}

impl UserType {
    pub const ALL: [UserType; 2] = [UserType::Student, UserType::Professional];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Student => "Student",
            UserType::Professional => "Professional",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Fresher,
    #[serde(rename = "Entry-level")]
    EntryLevel,
    #[serde(rename = "Mid-level")]
    MidLevel,
    #[serde(rename = "Senior-level")]
    SeniorLevel,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 4] = [
        ExperienceLevel::Fresher,
        ExperienceLevel::EntryLevel,
        ExperienceLevel::MidLevel,
        ExperienceLevel::SeniorLevel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Fresher => "Fresher",
            ExperienceLevel::EntryLevel => "Entry-level",
            ExperienceLevel::MidLevel => "Mid-level",
            ExperienceLevel::SeniorLevel => "Senior-level",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant(pub String);

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl FromStr for UserType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl FromStr for ExperienceLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered account.
///
/// The password hash and the session tokens are never serialized; responses that need the
/// tokens carry them explicitly.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub user_type: UserType,
    pub experience_level: ExperienceLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub college: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    pub resume_urls: Vec<String>,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted by the signup endpoint, before validation.
///
/// Enumerations arrive as raw strings so an out-of-range value is reported as a field
/// violation rather than a body parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub user_type: Option<String>,
    pub experience_level: Option<String>,
    pub college: Option<String>,
    pub current_company: Option<String>,
    #[serde(default)]
    pub resume_urls: Vec<String>,
}

/// Validated registration input. The password is still plaintext here.
#[derive(Debug, Clone)]
pub struct ValidatedUser {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub email: String,
    pub password: String,
    pub user_type: UserType,
    pub experience_level: ExperienceLevel,
    pub college: Option<String>,
    pub current_company: Option<String>,
    pub resume_urls: Vec<String>,
}

/// Raw body of `PUT /users/{user_id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub user_type: Option<String>,
    pub experience_level: Option<String>,
    pub college: Option<String>,
    pub current_company: Option<String>,
}

/// Validated profile changes; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub user_type: Option<UserType>,
    pub experience_level: Option<ExperienceLevel>,
    pub college: Option<String>,
    pub current_company: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        *self == ProfileUpdate::default()
    }

    /// Applies the changes to an in-memory record.
    pub fn apply_to(&self, user: &mut User, now: DateTime<Utc>) {
        if let Some(v) = &self.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            user.email = v.clone();
        }
        if let Some(v) = self.date_of_birth {
            user.date_of_birth = v;
        }
        if let Some(v) = self.user_type {
            user.user_type = v;
        }
        if let Some(v) = self.experience_level {
            user.experience_level = v;
        }
        if let Some(v) = &self.college {
            user.college = Some(v.clone());
        }
        if let Some(v) = &self.current_company {
            user.current_company = Some(v.clone());
        }
        user.updated_at = now;
    }
}

/// Access and refresh tokens issued together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub total_count: i64,
    pub users: Vec<User>,
    pub page: i64,
    #[serde(rename = "recordPerPage")]
    pub record_per_page: i64,
}
