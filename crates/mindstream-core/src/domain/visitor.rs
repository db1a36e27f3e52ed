use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// How long a sighting stays visible, in milliseconds.
pub const ACTIVE_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Longest accepted visitor name, in characters.
pub const MAX_NAME_CHARS: usize = 32;

/// Most records kept in the visitor file.
pub const MAX_STORED_VISITORS: usize = 100;

/// Visitor entity - the last sighting of an anonymous reader by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visitor {
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl Visitor {
    /// First sighting of a name.
    pub fn new(name: String, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            timestamp,
        }
    }

    /// Same person seen again: keep the id, take the new casing and time.
    pub fn refreshed(&self, name: String, timestamp: i64) -> Self {
        Self {
            id: self.id.clone(),
            name,
            timestamp,
        }
    }

    pub fn is_active_at(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp <= ACTIVE_WINDOW_MS
    }

    pub fn same_name(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.to_lowercase()
    }
}

/// Trim and cap a submitted name. Blank names are rejected.
pub fn normalize_visitor_name(raw: &str) -> Result<String, StoreError> {
    let name: String = raw.trim().chars().take(MAX_NAME_CHARS).collect();
    if name.is_empty() {
        return Err(StoreError::validation("name is required"));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_truncates() {
        assert_eq!(normalize_visitor_name("  Ana \n").unwrap(), "Ana");

        let long = "x".repeat(40);
        assert_eq!(normalize_visitor_name(&long).unwrap().chars().count(), 32);

        let wide = "é".repeat(33);
        assert_eq!(normalize_visitor_name(&wide).unwrap(), "é".repeat(32));
    }

    #[test]
    fn test_normalize_rejects_blank() {
        assert!(matches!(
            normalize_visitor_name("   "),
            Err(StoreError::Validation(_))
        ));
    }

    #[test]
    fn test_active_window_is_inclusive() {
        let visitor = Visitor::new("Sam".to_string(), 0);
        assert!(visitor.is_active_at(ACTIVE_WINDOW_MS));
        assert!(!visitor.is_active_at(ACTIVE_WINDOW_MS + 1));
    }

    #[test]
    fn test_same_name_ignores_case() {
        let visitor = Visitor::new("Ana".to_string(), 0);
        assert!(visitor.same_name("aNA"));
        assert!(!visitor.same_name("Anna"));

        let again = visitor.refreshed("ana".to_string(), 5);
        assert_eq!(again.id, visitor.id);
        assert_eq!(again.name, "ana");
        assert_eq!(again.timestamp, 5);
    }
}
