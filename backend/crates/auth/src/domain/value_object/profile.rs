//! Profile field value objects: names, bio and academic year.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

pub const NAME_MAX_LENGTH: usize = 25;
pub const BIO_MAX_LENGTH: usize = 200;
pub const MAX_ACADEMIC_YEAR: i16 = 8;

/// First or last name: trimmed, required, at most 25 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// `label` names the field in error messages ("First name").
    pub fn new(label: &str, raw: impl AsRef<str>) -> AppResult<Self> {
        let name = raw.as_ref().trim();
        if name.is_empty() {
            return Err(AppError::bad_request(format!("{} is required", label)));
        }
        if name.chars().count() > NAME_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "{} cannot exceed {} characters",
                label, NAME_MAX_LENGTH
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn first(raw: impl AsRef<str>) -> AppResult<Self> {
        Self::new("First name", raw)
    }

    pub fn last(raw: impl AsRef<str>) -> AppResult<Self> {
        Self::new("Last name", raw)
    }

    pub fn from_db(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text bio, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bio(String);

impl Bio {
    /// Blank input means "no bio".
    pub fn parse(raw: Option<String>) -> AppResult<Option<Self>> {
        let Some(raw) = raw else {
            return Ok(None);
        };
        let bio = raw.trim();
        if bio.is_empty() {
            return Ok(None);
        }
        if bio.chars().count() > BIO_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "Bio cannot exceed {} characters",
                BIO_MAX_LENGTH
            )));
        }
        Ok(Some(Self(bio.to_string())))
    }

    pub fn from_db(bio: String) -> Self {
        Self(bio)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Year of study, 1 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AcademicYear(i16);

impl AcademicYear {
    pub fn new(year: i64) -> AppResult<Self> {
        if !(1..=i64::from(MAX_ACADEMIC_YEAR)).contains(&year) {
            return Err(AppError::bad_request(format!(
                "Academic year must be between 1 and {}",
                MAX_ACADEMIC_YEAR
            )));
        }
        Ok(Self(year as i16))
    }

    pub fn from_db(year: i16) -> Self {
        Self(year)
    }

    pub fn value(&self) -> i16 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_name() {
        assert_eq!(PersonName::first("  Jane ").unwrap().as_str(), "Jane");
        assert_eq!(
            PersonName::first("").unwrap_err().message(),
            "First name is required"
        );
        assert_eq!(
            PersonName::last("x".repeat(26)).unwrap_err().message(),
            "Last name cannot exceed 25 characters"
        );
    }

    #[test]
    fn test_bio() {
        assert_eq!(Bio::parse(None).unwrap(), None);
        assert_eq!(Bio::parse(Some("   ".into())).unwrap(), None);
        assert_eq!(
            Bio::parse(Some(" CS student ".into())).unwrap().unwrap().as_str(),
            "CS student"
        );
        assert!(Bio::parse(Some("b".repeat(BIO_MAX_LENGTH + 1))).is_err());
    }

    #[test]
    fn test_academic_year() {
        assert_eq!(AcademicYear::new(1).unwrap().value(), 1);
        assert_eq!(AcademicYear::new(8).unwrap().value(), 8);
        assert!(AcademicYear::new(0).is_err());
        assert!(AcademicYear::new(9).is_err());
        assert!(AcademicYear::new(-3).is_err());
    }
}
