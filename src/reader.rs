//! Reading tables that are already aggregated.
//!
//! A wide table carries one order per row and spreads bundle data over
//! `"<field> (Bundle N)"` columns. This module detects that shape and exposes
//! each bundle block of a row as a field source.

use crate::aggregate::{Category, CategoryItems, ITEM_SEPARATOR};
use crate::columns::{BUNDLE_COUNT, BUNDLE_ID, ORDER_ID};
use crate::error::{Error, Result};
use crate::resolve::{bundle_column, non_empty, split_bundle_suffix, BundleScope, FieldSource};
use crate::table::{Row, Table};
use std::collections::{BTreeMap, BTreeSet};

/// Shape of an input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    /// One line item per row
    Raw,
    /// One order per row, bundle blocks in suffixed columns
    Aggregated,
}

impl TableShape {
    /// Detect the shape from header names.
    pub fn detect<S: AsRef<str>>(header: &[S]) -> Self {
        let aggregated = header.iter().any(|h| {
            let h = h.as_ref();
            h == BUNDLE_COUNT || split_bundle_suffix(h).is_some()
        });
        if aggregated {
            TableShape::Aggregated
        } else {
            TableShape::Raw
        }
    }
}

/// Bundle block layout of an aggregated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedLayout {
    /// Columns of every bundle block, keyed by bundle index
    blocks: BTreeMap<usize, Vec<String>>,
}

impl AggregatedLayout {
    /// Collect bundle blocks from a header.
    ///
    /// A header that has no `(Bundle N)` column at all is rejected, since the
    /// table cannot be read either as raw or as aggregated.
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Result<Self> {
        let mut blocks: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        for h in header {
            if let Some((_, index)) = split_bundle_suffix(h.as_ref()) {
                blocks.entry(index).or_default().push(h.as_ref().to_string());
            }
        }
        if blocks.is_empty() {
            return Err(Error::AmbiguousTable(
                "table has a Bundle Count column but no \"(Bundle N)\" columns".to_string(),
            ));
        }
        Ok(Self { blocks })
    }

    /// Distinct bundle indices present in the header, ascending.
    pub fn indices(&self) -> BTreeSet<usize> {
        self.blocks.keys().copied().collect()
    }

    /// Whether a bundle block is present.
    pub fn has_index(&self, index: usize) -> bool {
        self.blocks.contains_key(&index)
    }

    /// Effective bundle count of a row.
    ///
    /// An explicit positive `Bundle Count` wins (floored). Otherwise the
    /// highest bundle index with any non-empty cell counts.
    pub fn bundle_count(&self, row: &Row) -> usize {
        if let Some(count) = non_empty(row, BUNDLE_COUNT)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|c| c.is_finite() && *c > 0.0)
        {
            return count.floor() as usize;
        }

        self.blocks
            .iter()
            .rev()
            .find(|(_, cols)| cols.iter().any(|c| non_empty(row, c).is_some()))
            .map(|(index, _)| *index)
            .unwrap_or(0)
    }
}

/// One bundle block of a wide row.
#[derive(Debug, Clone, Copy)]
pub struct WideBundle<'a> {
    scope: BundleScope<'a>,
}

impl<'a> WideBundle<'a> {
    /// View bundle `index` (1-based) of `row`.
    pub fn new(row: &'a Row, index: usize) -> Self {
        Self {
            scope: BundleScope::new(row, index),
        }
    }

    /// Bundle index.
    pub fn index(&self) -> usize {
        self.scope.index()
    }

    /// Order identifier of the row.
    pub fn order_id(&self) -> &'a str {
        self.scope.row().get(ORDER_ID).map(String::as_str).unwrap_or("")
    }

    /// Bundle identifier of this block.
    pub fn bundle_id(&self) -> &str {
        let scoped = bundle_column(BUNDLE_ID, self.index());
        non_empty(self.scope.row(), &scoped).unwrap_or("")
    }

    /// Category lists split back out of the joined cells.
    pub fn items(&self) -> CategoryItems {
        let mut items = CategoryItems::new();
        for category in Category::ALL {
            let column = bundle_column(category.items_column(), self.index());
            if let Some(cell) = self.scope.row().get(&column) {
                for entry in split_items(cell) {
                    items.push(category, entry);
                }
            }
        }
        items
    }
}

impl FieldSource for WideBundle<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        self.scope.field(name)
    }
}

/// Split a joined category cell into entries.
///
/// Entries are separated by [`ITEM_SEPARATOR`]; a bare `;` inside an item is
/// kept. An item whose own text contains `"; "` cannot be told apart from two
/// entries and comes back split.
pub fn split_items(cell: &str) -> Vec<String> {
    cell.split(ITEM_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A wide table checked for label extraction.
#[derive(Debug, Clone)]
pub struct AggregatedTable<'a> {
    table: &'a Table,
    layout: AggregatedLayout,
}

impl<'a> AggregatedTable<'a> {
    /// Validate `table` as aggregated input.
    pub fn new(table: &'a Table) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::EmptyInput);
        }
        let layout = AggregatedLayout::from_header(&table.columns)?;
        log::debug!(
            "Aggregated input: {} rows, bundle blocks {:?}",
            table.len(),
            layout.indices()
        );
        Ok(Self { table, layout })
    }

    /// Require a first bundle block (per-order labels read it).
    pub fn require_first_bundle(&self) -> Result<()> {
        if self.layout.has_index(1) {
            Ok(())
        } else {
            Err(Error::AmbiguousTable(
                "per-order labels need \"(Bundle 1)\" columns".to_string(),
            ))
        }
    }

    /// Bundle layout.
    pub fn layout(&self) -> &AggregatedLayout {
        &self.layout
    }

    /// Rows of the table.
    pub fn rows(&self) -> &'a [Row] {
        &self.table.rows
    }

    /// Effective bundle count of row `i`.
    pub fn bundle_count(&self, row: usize) -> usize {
        self.table
            .rows
            .get(row)
            .map(|r| self.layout.bundle_count(r))
            .unwrap_or(0)
    }

    /// All bundle views of row `i`.
    pub fn bundles(&self, row: usize) -> Vec<WideBundle<'a>> {
        let Some(r) = self.table.rows.get(row) else {
            return Vec::new();
        };
        (1..=self.layout.bundle_count(r))
            .map(|index| WideBundle::new(r, index))
            .collect()
    }
}
