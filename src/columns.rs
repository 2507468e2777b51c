//! Column classification for raw line-item tables.
//!
//! The first row's keys are the schema. Classification happens once per
//! request and the resulting [`ColumnSets`] is shared by every row.

use crate::config::DropConfig;
use indexmap::IndexSet;
use lazy_static::lazy_static;
use regex::Regex;

/// Order identifier column.
pub const ORDER_ID: &str = "Order ID";
/// Bundle identifier column.
pub const BUNDLE_ID: &str = "Bundle ID";
/// Line item description column.
pub const LINE_ITEM: &str = "Line Item";
/// Quantity column.
pub const QUANTITY: &str = "Quantity";
/// Per-line price column.
pub const LINE_ITEM_PRICE: &str = "Line Item Price";
/// Sentinel column written by aggregation.
pub const BUNDLE_COUNT: &str = "Bundle Count";
/// Free-text lens notes, always treated as a prescription column.
pub const LENS_NOTES: &str = "Lens Notes";

/// Columns every raw row must carry, in validation order.
pub const REQUIRED_COLUMNS: [&str; 4] = [ORDER_ID, BUNDLE_ID, LINE_ITEM, QUANTITY];

/// Identifier columns.
pub const ID_COLUMNS: [&str; 2] = [ORDER_ID, BUNDLE_ID];

/// Columns that describe a single line rather than the order.
pub const LINE_LEVEL_COLUMNS: [&str; 3] = [LINE_ITEM, QUANTITY, LINE_ITEM_PRICE];

lazy_static! {
    /// Prescription column names
    static ref RE_RX_COLUMN: Regex =
        Regex::new(r"(?i)\b(OD|OS|PD|Prism|ADD|Axis|Cylinder|Sphere|Pupillary|base)\b").unwrap();
}

/// Whether a column name denotes a prescription field.
pub fn is_rx_column(name: &str) -> bool {
    name == LENS_NOTES || RE_RX_COLUMN.is_match(name)
}

/// Column partition of one input file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSets {
    /// Identifier columns present in the header
    pub id_cols: Vec<String>,
    /// Line-level columns present in the header
    pub line_level_cols: Vec<String>,
    /// Prescription columns, header order
    pub rx_cols: Vec<String>,
    /// Every other column, header order
    pub order_level_cols: Vec<String>,
    /// Names removed by the drop policy
    pub dropped: IndexSet<String>,
}

impl ColumnSets {
    /// Classify a header.
    pub fn classify<S: AsRef<str>>(header: &[S]) -> Self {
        let mut sets = ColumnSets::default();

        for name in header {
            let name = name.as_ref();
            if ID_COLUMNS.contains(&name) {
                sets.id_cols.push(name.to_string());
            } else if LINE_LEVEL_COLUMNS.contains(&name) {
                sets.line_level_cols.push(name.to_string());
            } else if is_rx_column(name) {
                sets.rx_cols.push(name.to_string());
            } else {
                sets.order_level_cols.push(name.to_string());
            }
        }

        log::debug!(
            "Classified {} columns: {} rx, {} order-level",
            header.len(),
            sets.rx_cols.len(),
            sets.order_level_cols.len()
        );
        sets
    }

    /// Classify a header and apply a drop policy.
    pub fn classify_with_drops<S: AsRef<str>>(header: &[S], drops: &DropConfig) -> Self {
        let mut sets = Self::classify(header);
        sets.apply_drops(drops.resolve());
        sets
    }

    /// Remove dropped names from the Rx and order-level sets.
    pub fn apply_drops(&mut self, dropped: IndexSet<String>) {
        if dropped.is_empty() {
            return;
        }
        let before = self.rx_cols.len() + self.order_level_cols.len();
        self.rx_cols.retain(|c| !dropped.contains(c));
        self.order_level_cols.retain(|c| !dropped.contains(c));
        let removed = before - self.rx_cols.len() - self.order_level_cols.len();
        if removed > 0 {
            log::debug!("Dropped {} columns by policy", removed);
        }
        self.dropped = dropped;
    }

    /// Whether an output column is suppressed by the drop policy.
    ///
    /// Matches the bare name and its `"<name> (Bundle N)"` forms.
    pub fn is_dropped(&self, column: &str) -> bool {
        if self.dropped.contains(column) {
            return true;
        }
        match crate::resolve::split_bundle_suffix(column) {
            Some((base, _)) => self.dropped.contains(base),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DropMode;

    fn header() -> Vec<&'static str> {
        vec![
            "Order ID",
            "Customer Name",
            "Bundle ID",
            "Line Item",
            "Quantity",
            "Line Item Price",
            "OD Sphere",
            "OS Sphere",
            "PD",
            "Lens Notes",
            "Subtotal",
            "Shipping Address",
        ]
    }

    #[test]
    fn test_partition() {
        let sets = ColumnSets::classify(&header());
        assert_eq!(sets.id_cols, vec!["Order ID", "Bundle ID"]);
        assert_eq!(sets.line_level_cols, vec!["Line Item", "Quantity", "Line Item Price"]);
        assert_eq!(sets.rx_cols, vec!["OD Sphere", "OS Sphere", "PD", "Lens Notes"]);
        assert_eq!(sets.order_level_cols, vec!["Customer Name", "Subtotal", "Shipping Address"]);
    }

    #[test]
    fn test_rx_pattern_uses_word_boundaries() {
        assert!(is_rx_column("od sph"));
        assert!(is_rx_column("Base Curve"));
        assert!(is_rx_column("Pupillary Distance"));
        assert!(is_rx_column("Add Power"));
        // Underscores are word characters, so no boundary after "OD"
        assert!(!is_rx_column("OD_SPH"));
        assert!(!is_rx_column("Address"));
        assert!(!is_rx_column("Products"));
        assert!(!is_rx_column("Database"));
    }

    #[test]
    fn test_no_rx_columns_is_valid() {
        let sets = ColumnSets::classify(&["Order ID", "Bundle ID", "Line Item", "Quantity"]);
        assert!(sets.rx_cols.is_empty());
        assert!(sets.order_level_cols.is_empty());
    }

    #[test]
    fn test_drop_policy_removes_columns() {
        let drops = DropConfig::new()
            .with_mode(DropMode::Custom)
            .with_extra(["Lens Notes"]);
        let sets = ColumnSets::classify_with_drops(&header(), &drops);
        assert!(!sets.order_level_cols.contains(&"Subtotal".to_string()));
        assert!(!sets.rx_cols.contains(&"Lens Notes".to_string()));
        assert!(sets.is_dropped("Lens Notes (Bundle 2)"));
        assert!(sets.is_dropped("Subtotal"));
        assert!(!sets.is_dropped("OD Sphere (Bundle 1)"));
    }
}
