//! First-non-empty field resolution.
//!
//! Equivalent fields appear under different names across exports
//! (`OD SPH`, `OD_SPH`, `Sphere OD`). Lookups take an ordered candidate list,
//! most preferred first, and return the first value that is not blank.

use crate::table::Row;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `"<name> (Bundle N)"`
    static ref RE_BUNDLE_SUFFIX: Regex = Regex::new(r"^(.*) \(Bundle (\d+)\)$").unwrap();
}

/// Column name for a field within bundle block `index` (1-based).
pub fn bundle_column(name: &str, index: usize) -> String {
    format!("{} (Bundle {})", name, index)
}

/// Split `"<name> (Bundle N)"` into `(name, N)`.
pub fn split_bundle_suffix(column: &str) -> Option<(&str, usize)> {
    let caps = RE_BUNDLE_SUFFIX.captures(column)?;
    let base = caps.get(1)?.as_str();
    let index = caps.get(2)?.as_str().parse().ok()?;
    Some((base, index))
}

/// Anything that can look up a field by exact name.
pub trait FieldSource {
    /// Raw value of a field, if the source has it.
    fn field(&self, name: &str) -> Option<&str>;
}

impl FieldSource for Row {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn field(&self, name: &str) -> Option<&str> {
        (**self).field(name)
    }
}

/// Value of `name` if it is not blank.
pub fn non_empty<'a, S: FieldSource + ?Sized>(source: &'a S, name: &str) -> Option<&'a str> {
    source.field(name).filter(|v| !v.trim().is_empty())
}

/// First candidate with a non-blank value, or `""`.
pub fn first_non_empty<'a, S, I>(source: &'a S, candidates: I) -> &'a str
where
    S: FieldSource + ?Sized,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    candidates
        .into_iter()
        .find_map(|name| non_empty(source, name.as_ref()))
        .unwrap_or("")
}

/// A wide-table row seen through one bundle block.
///
/// `"<name> (Bundle i)"` is preferred; the bare `<name>` is the fallback.
#[derive(Debug, Clone, Copy)]
pub struct BundleScope<'a> {
    row: &'a Row,
    index: usize,
}

impl<'a> BundleScope<'a> {
    /// View `row` through bundle block `index` (1-based).
    pub fn new(row: &'a Row, index: usize) -> Self {
        Self { row, index }
    }

    /// Bundle index of this view.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Underlying row.
    pub fn row(&self) -> &'a Row {
        self.row
    }
}

impl FieldSource for BundleScope<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        let scoped = bundle_column(name, self.index);
        non_empty(self.row, &scoped).or_else(|| self.row.field(name))
    }
}

/// A map where the first non-blank write to a key wins.
///
/// Blank writes never set a value; later writes to a set key are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstWins {
    values: IndexMap<String, String>,
}

impl FirstWins {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a value for `key`. Returns true if it was stored.
    pub fn offer(&mut self, key: &str, value: &str) -> bool {
        if value.trim().is_empty() || self.values.contains_key(key) {
            return false;
        }
        self.values.insert(key.to_string(), value.to_string());
        true
    }

    /// Offer every listed column of `row`.
    pub fn merge_from<S, I>(&mut self, row: &S, columns: I)
    where
        S: FieldSource + ?Sized,
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        for col in columns {
            let col = col.as_ref();
            if let Some(value) = row.field(col) {
                self.offer(col, value);
            }
        }
    }

    /// Stored value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Stored value for `key`, or `""`.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    /// Number of keys set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing has been set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FieldSource for FirstWins {
    fn field(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}
