//! Strongly-typed migration base name.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::path::Path;

/// Base name of a migration: its source file name without the extension.
///
/// File names carry a UTC timestamp prefix, so the derived `Ord` (plain
/// lexicographic on the string) sorts migrations in creation order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationName(String);

impl MigrationName {
    /// Create a new `MigrationName`, panicking in debug builds if the name is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        debug_assert!(!s.is_empty(), "MigrationName must not be empty");
        Self(s)
    }

    /// Try to create a new `MigrationName`, returning `None` if the name is empty.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Derive the base name from a source file path (as produced by `file!()`).
    ///
    /// Both `/` and `\` are accepted as separators so names derived on one
    /// platform match names recorded on another.
    pub fn from_source_file(path: &str) -> Option<Self> {
        let file_name = path.rsplit(['/', '\\']).next()?;
        let stem = Path::new(file_name).file_stem()?.to_str()?;
        Self::try_new(stem)
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MigrationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MigrationName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MigrationName {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl PartialEq<str> for MigrationName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_source_file_unix() {
        let name = MigrationName::from_source_file(
            "crates/app/src/migrations/2024_01_05_101500_add_status.rs",
        )
        .unwrap();
        assert_eq!(name, "2024_01_05_101500_add_status");
    }

    #[test]
    fn test_from_source_file_windows() {
        let name =
            MigrationName::from_source_file(r"src\migrations\2024_01_05_101500_add_status.rs")
                .unwrap();
        assert_eq!(name.as_str(), "2024_01_05_101500_add_status");
    }

    #[test]
    fn test_from_source_file_bare() {
        let name = MigrationName::from_source_file("2024_01_05_101500_x.rs").unwrap();
        assert_eq!(name, "2024_01_05_101500_x");
    }

    #[test]
    fn test_from_source_file_empty() {
        assert!(MigrationName::from_source_file("").is_none());
        assert!(MigrationName::from_source_file("src/").is_none());
    }

    #[test]
    fn test_ordering_follows_timestamp_prefix() {
        let mut names = vec![
            MigrationName::new("2024_03_01_000000_c"),
            MigrationName::new("2023_12_31_235959_a"),
            MigrationName::new("2024_01_01_000000_b"),
        ];
        names.sort();
        let sorted: Vec<&str> = names.iter().map(|n| n.as_str()).collect();
        assert_eq!(
            sorted,
            vec![
                "2023_12_31_235959_a",
                "2024_01_01_000000_b",
                "2024_03_01_000000_c"
            ]
        );
    }

    #[test]
    fn test_borrow_lookup() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(MigrationName::new("2024_01_01_000000_b"), 1);
        assert_eq!(map.get("2024_01_01_000000_b"), Some(&1));
    }

    #[test]
    fn test_serde_transparent() {
        let name = MigrationName::new("2024_01_01_000000_b");
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, r#""2024_01_01_000000_b""#);
    }
}
