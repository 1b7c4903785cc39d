//! User identity and scalar profile attributes.
//!
//! Two identifiers exist for every user. [`UserId`] is the opaque UUID used
//! in every external exchange (session cookie, analysis requests, API
//! payloads). [`UserKey`] is the compact numeric key used for joins inside
//! the persistence layer; it deliberately implements neither `Serialize`
//! nor `Display` so it cannot leak into responses by accident.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
    UnknownDietType { value: String },
    UnknownGender { value: String },
    EmptyAgeRange,
    AgeRangeTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::UnknownDietType { value } => write!(
                f,
                "diet type must be one of vegetarian, vegan, halal, kosher, pescatarian, none (got {value})"
            ),
            Self::UnknownGender { value } => {
                write!(f, "gender must be one of male, female, other (got {value})")
            }
            Self::EmptyAgeRange => write!(f, "age range must not be empty"),
            Self::AgeRangeTooLong { max } => {
                write!(f, "age range must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque external user identifier.
///
/// # Examples
/// ```
/// use allergy_scan_backend::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// assert!(UserId::new(" 3fa85f64-5717-4562-b3fc-2c963f66afa6").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap a UUID read from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Internal numeric user key. Never leaves the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserKey(i64);

impl UserKey {
    /// Wrap a primary key read from storage.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw key for persistence adapters.
    pub const fn get(self) -> i64 {
        self.0
    }
}

/// Maximum length of a profile name, matching the storage column.
pub const PROFILE_NAME_MAX: usize = 100;

/// Human readable profile name. Cannot be blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct ProfileName(String);

impl ProfileName {
    /// Validate and construct a [`ProfileName`]; surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > PROFILE_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: PROFILE_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ProfileName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<ProfileName> for String {
    fn from(value: ProfileName) -> Self {
        value.0
    }
}

/// Dietary regime declared by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    Vegetarian,
    Vegan,
    Halal,
    Kosher,
    Pescatarian,
    None,
}

impl DietType {
    /// Stable storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::Halal => "halal",
            Self::Kosher => "kosher",
            Self::Pescatarian => "pescatarian",
            Self::None => "none",
        }
    }
}

impl FromStr for DietType {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "vegetarian" => Ok(Self::Vegetarian),
            "vegan" => Ok(Self::Vegan),
            "halal" => Ok(Self::Halal),
            "kosher" => Ok(Self::Kosher),
            "pescatarian" => Ok(Self::Pescatarian),
            "none" => Ok(Self::None),
            other => Err(UserValidationError::UnknownDietType {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Gender as understood by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Stable storage and wire representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl FromStr for Gender {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            other => Err(UserValidationError::UnknownGender {
                value: other.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum length of an age-range bucket label.
pub const AGE_RANGE_MAX: usize = 20;

/// Free-form age bucket label such as `"20s"` or `"30-39"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct AgeRange(String);

impl AgeRange {
    /// Validate and construct an [`AgeRange`]; surrounding whitespace is trimmed.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyAgeRange);
        }
        if trimmed.chars().count() > AGE_RANGE_MAX {
            return Err(UserValidationError::AgeRangeTooLong { max: AGE_RANGE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the label.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<AgeRange> for String {
    fn from(value: AgeRange) -> Self {
        value.0
    }
}
