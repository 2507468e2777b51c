//! Configuration for aggregation and labeling.
//!
//! The column drop list is data, not code: the built-in table ships as
//! `data/default_drop_columns.json` and can be replaced from a file at runtime.

use crate::error::{Error, Result};
use indexmap::IndexSet;
use serde::Deserialize;
use std::path::Path;

/// Largest page window a single label request may ask for.
pub const MAX_LABEL_LIMIT: usize = 300;

const BUILTIN_DROP_LIST: &str = include_str!("../data/default_drop_columns.json");

/// How columns are removed from the aggregated output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropMode {
    /// Keep every column (only `extra` names are dropped)
    #[default]
    None,
    /// Drop the built-in list
    Default,
    /// Drop the built-in list plus caller-supplied names
    Custom,
}

impl std::str::FromStr for DropMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Ok(DropMode::None),
            "default" => Ok(DropMode::Default),
            "custom" => Ok(DropMode::Custom),
            other => Err(Error::InvalidDropConfig(format!("unknown drop mode '{}'", other))),
        }
    }
}

/// A named set of columns to remove.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct DropList {
    /// Column names, in file order
    pub columns: IndexSet<String>,
}

impl DropList {
    /// The built-in list of financial and internal columns.
    pub fn builtin() -> Self {
        // The embedded table is validated by `test_builtin_drop_list_parses`.
        Self::from_json(BUILTIN_DROP_LIST).unwrap_or_default()
    }

    /// Parse a drop list from JSON (`{"columns": [...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        let list: DropList = serde_json::from_str(json)?;
        Ok(list)
    }

    /// Load a drop list from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    /// Whether the list contains a column name.
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Number of names in the list.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Column drop policy for [`aggregate`](crate::aggregate::aggregate).
#[derive(Debug, Clone)]
pub struct DropConfig {
    /// Drop mode
    pub mode: DropMode,
    /// Extra names supplied by the caller
    pub extra: IndexSet<String>,
    /// Base list used for `Default` and `Custom` modes
    pub base: DropList,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DropConfig {
    /// Create a configuration that drops nothing.
    pub fn new() -> Self {
        Self {
            mode: DropMode::None,
            extra: IndexSet::new(),
            base: DropList::builtin(),
        }
    }

    /// Set the drop mode.
    pub fn with_mode(mut self, mode: DropMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add caller-supplied column names.
    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra.extend(
            names
                .into_iter()
                .map(|s| s.into().trim().to_string())
                .filter(|s| !s.is_empty()),
        );
        self
    }

    /// Replace the base drop list.
    pub fn with_base(mut self, base: DropList) -> Self {
        self.base = base;
        self
    }

    /// The effective set of dropped column names.
    pub fn resolve(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        if matches!(self.mode, DropMode::Default | DropMode::Custom) {
            names.extend(self.base.columns.iter().cloned());
        }
        if self.mode != DropMode::Default {
            names.extend(self.extra.iter().cloned());
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_drop_list_parses() {
        let parsed = DropList::from_json(BUILTIN_DROP_LIST).unwrap();
        assert!(!parsed.is_empty());
        assert!(parsed.contains("Line Item Price"));
        assert_eq!(DropList::builtin(), parsed);
    }

    #[test]
    fn test_drop_mode_parsing() {
        assert_eq!("none".parse::<DropMode>().unwrap(), DropMode::None);
        assert_eq!("Default".parse::<DropMode>().unwrap(), DropMode::Default);
        assert_eq!(" custom ".parse::<DropMode>().unwrap(), DropMode::Custom);
        assert!("everything".parse::<DropMode>().is_err());
    }

    #[test]
    fn test_resolve_none_keeps_everything() {
        let config = DropConfig::new();
        assert!(config.resolve().is_empty());
    }

    #[test]
    fn test_resolve_none_with_extra_starts_empty() {
        let config = DropConfig::new().with_extra(["Gift Message"]);
        let names = config.resolve();
        assert_eq!(names.len(), 1);
        assert!(names.contains("Gift Message"));
    }

    #[test]
    fn test_resolve_custom_unions_extra() {
        let config = DropConfig::new()
            .with_mode(DropMode::Custom)
            .with_extra(["Gift Message", "  "]);
        let names = config.resolve();
        assert!(names.contains("Gift Message"));
        assert!(names.contains("Subtotal"));
        assert!(!names.contains(""));
    }

    #[test]
    fn test_resolve_default_ignores_extra() {
        let config = DropConfig::new()
            .with_mode(DropMode::Default)
            .with_extra(["Gift Message"]);
        let names = config.resolve();
        assert!(!names.contains("Gift Message"));
        assert!(names.contains("Tax"));
    }

    #[test]
    fn test_custom_base_list() {
        let base = DropList::from_json(r#"{"columns": ["Secret"]}"#).unwrap();
        let config = DropConfig::new().with_mode(DropMode::Default).with_base(base);
        let names = config.resolve();
        assert_eq!(names.len(), 1);
        assert!(names.contains("Secret"));
    }
}
