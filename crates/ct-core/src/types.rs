//! Core type definitions with validation.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Generates a validated string newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new value after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A validated calendar identifier.
    ///
    /// Calendar IDs are the export's source column (usually an email address
    /// or a `...@group.calendar.google.com` id). They must be non-empty.
    CalendarId, "calendar ID"
);

define_string_id!(
    /// A validated category name (e.g. "work", "sleep").
    CategoryName, "category name"
);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn calendar_id_rejects_empty() {
        assert!(CalendarId::new("").is_err());
        assert!(CalendarId::new("me@example.com").is_ok());
    }

    #[test]
    fn category_name_rejects_empty() {
        let err = CategoryName::new("").unwrap_err();
        assert_eq!(err.to_string(), "category name cannot be empty");
    }

    #[test]
    fn calendar_id_serde_rejects_empty() {
        let result: Result<CalendarId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());

        let parsed: CalendarId = serde_json::from_str("\"cal1\"").unwrap();
        assert_eq!(parsed.as_str(), "cal1");
    }

    #[test]
    fn calendar_id_set_lookup_by_str() {
        let ids: HashSet<CalendarId> = [CalendarId::new("cal1").unwrap()].into_iter().collect();
        assert!(ids.contains("cal1"));
        assert!(!ids.contains("cal2"));
    }
}
