//! Reaction Type Value Object

use std::fmt;
use std::str::FromStr;

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReactionType {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl ReactionType {
    pub const ALL: [ReactionType; 6] = [
        ReactionType::Like,
        ReactionType::Love,
        ReactionType::Haha,
        ReactionType::Wow,
        ReactionType::Sad,
        ReactionType::Angry,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionType::Like => "LIKE",
            ReactionType::Love => "LOVE",
            ReactionType::Haha => "HAHA",
            ReactionType::Wow => "WOW",
            ReactionType::Sad => "SAD",
            ReactionType::Angry => "ANGRY",
        }
    }

    /// Required request field.
    pub fn parse(raw: &str) -> AppResult<Self> {
        match raw.trim() {
            "" => Err(AppError::bad_request("reactionType is required")),
            value => value.parse(),
        }
    }
}

impl FromStr for ReactionType {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::bad_request("Invalid reaction type provided"))
    }
}

impl fmt::Display for ReactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
