//! Validated name newtypes for domain entities
//!
//! Names are valid by construction:
//! - Non-empty after trimming
//! - Within length limits
//! - Free of control characters

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for a player name, in characters
pub const MAX_PLAYER_NAME_LENGTH: usize = 32;

// ============================================================================
// PlayerName
// ============================================================================

/// A validated player name (non-empty, <=32 chars, trimmed)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Create a new validated player name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if:
    /// - The name is empty after trimming
    /// - The name exceeds 32 characters after trimming
    /// - The name contains control characters
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Player name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_PLAYER_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Player name cannot exceed {} characters",
                MAX_PLAYER_NAME_LENGTH
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(DomainError::validation(
                "Player name cannot contain control characters",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison used for uniqueness checks.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PlayerName {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> String {
        name.0
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
