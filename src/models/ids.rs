//! Identifier types for transactions and users
//!
//! Transaction IDs are opaque strings: freshly created ones are UUIDs, but
//! IDs loaded from older data files are kept verbatim. User IDs double as
//! file name components, so they are validated on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::BudgetError;

/// Maximum length of a user identifier
pub const MAX_USER_ID_LEN: usize = 64;

/// Opaque unique identifier of a transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Create a new random ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for table display (first 8 characters)
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of the user owning a transaction list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Parse and validate a user identifier
    pub fn parse(s: &str) -> Result<Self, BudgetError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(BudgetError::Validation("User ID cannot be empty".into()));
        }
        if s.len() > MAX_USER_ID_LEN {
            return Err(BudgetError::Validation(format!(
                "User ID cannot exceed {} characters",
                MAX_USER_ID_LEN
            )));
        }
        if s.starts_with('.') {
            return Err(BudgetError::Validation(format!(
                "User ID cannot start with '.': {}",
                s
            )));
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        {
            return Err(BudgetError::Validation(format!(
                "User ID may only contain letters, digits, '_', '-' and '.': {}",
                s
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for UserId {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UserId {
    type Error = BudgetError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = TransactionId::generate();
        let b = TransactionId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_legacy_ids_kept_verbatim() {
        let id: TransactionId = serde_json::from_str("\"local_1712345678901\"").unwrap();
        assert_eq!(id.as_str(), "local_1712345678901");
        assert_eq!(id.short(), "local_17");
    }

    #[test]
    fn test_short_id_for_short_values() {
        assert_eq!(TransactionId::new("abc").short(), "abc");
    }

    #[test]
    fn test_user_id_validation() {
        assert!(UserId::parse("alice").is_ok());
        assert!(UserId::parse("uid_8f3-Kx.2").is_ok());
        assert!(UserId::parse("").is_err());
        assert!(UserId::parse("   ").is_err());
        assert!(UserId::parse("../etc").is_err());
        assert!(UserId::parse("a/b").is_err());
        assert!(UserId::parse(".hidden").is_err());
        assert!(UserId::parse(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_user_id_trims_whitespace() {
        assert_eq!(UserId::parse("  bob ").unwrap().as_str(), "bob");
    }

    #[test]
    fn test_user_id_serde_validates() {
        assert!(serde_json::from_str::<UserId>("\"carol\"").is_ok());
        assert!(serde_json::from_str::<UserId>("\"no/slash\"").is_err());
    }
}
