//! SQLite helper utilities for type conversion
//!
//! SQLite has no native array or timestamp types; lists (a user's friend ids,
//! a post's extra image URLs) are stored as JSON strings and timestamps as
//! ISO8601 TEXT.

use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

/// Get current UTC timestamp as ISO8601 string for SQLite
#[inline]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

/// Serialize a Vec to a JSON string for SQLite storage
#[inline]
pub fn vec_to_json<T: Serialize>(v: &[T]) -> String {
    serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())
}

/// Deserialize a JSON string from SQLite to a Vec
#[inline]
pub fn json_to_vec<T: DeserializeOwned>(s: &str) -> Vec<T> {
    serde_json::from_str(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_json_roundtrip() {
        let v = vec!["u1".to_string(), "u2".to_string()];
        let json = vec_to_json(&v);
        let parsed: Vec<String> = json_to_vec(&json);
        assert_eq!(v, parsed);
    }

    #[test]
    fn test_empty_vec() {
        let v: Vec<String> = vec![];
        assert_eq!(vec_to_json(&v), "[]");
        let parsed: Vec<String> = json_to_vec("[]");
        assert!(parsed.is_empty());
    }
}
