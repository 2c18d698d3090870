//! Post Type Value Object

use std::fmt;
use std::str::FromStr;

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostType {
    #[default]
    Discussion,
    Question,
    Announcement,
    Resource,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Discussion => "DISCUSSION",
            PostType::Question => "QUESTION",
            PostType::Announcement => "ANNOUNCEMENT",
            PostType::Resource => "RESOURCE",
        }
    }

    /// Optional request field: absent or blank means `DISCUSSION`.
    pub fn parse_optional(raw: Option<&str>) -> AppResult<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) => value.parse(),
        }
    }

    /// Database value; unknown values fall back to the default.
    pub fn from_db(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }
}

impl FromStr for PostType {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        match s {
            "DISCUSSION" => Ok(PostType::Discussion),
            "QUESTION" => Ok(PostType::Question),
            "ANNOUNCEMENT" => Ok(PostType::Announcement),
            "RESOURCE" => Ok(PostType::Resource),
            _ => Err(AppError::bad_request("Invalid post type provided")),
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_optional() {
        assert_eq!(PostType::parse_optional(None).unwrap(), PostType::Discussion);
        assert_eq!(PostType::parse_optional(Some(" ")).unwrap(), PostType::Discussion);
        assert_eq!(
            PostType::parse_optional(Some("QUESTION")).unwrap(),
            PostType::Question
        );
        assert!(PostType::parse_optional(Some("question")).is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&PostType::Announcement).unwrap(),
            "\"ANNOUNCEMENT\""
        );
    }
}
