//! Order/bundle aggregation.
//!
//! Line-item rows are folded once into `Order → Bundle → items/Rx` and then
//! flattened into a wide table with one row per order and one column block
//! per bundle:
//!
//! ```text
//! Order ID | Bundle Count | <order fields...> |
//!   Bundle ID (Bundle 1) | Frame Items (Bundle 1) | Lens Items (Bundle 1) |
//!   Coating Items (Bundle 1) | Other Items (Bundle 1) | <rx> (Bundle 1) | ...
//! ```

use crate::columns::{ColumnSets, BUNDLE_COUNT, BUNDLE_ID, LINE_ITEM, ORDER_ID, QUANTITY, REQUIRED_COLUMNS};
use crate::config::DropConfig;
use crate::error::{Error, Result};
use crate::resolve::{bundle_column, FieldSource, FirstWins};
use crate::table::{Row, Table};
use indexmap::{IndexMap, IndexSet};
use lazy_static::lazy_static;
use regex::Regex;

/// Separator used when a category list is written into one cell.
pub const ITEM_SEPARATOR: &str = "; ";

lazy_static! {
    /// "lens" as a whole word
    static ref RE_LENS_WORD: Regex = Regex::new(r"(?i)\blens\b").unwrap();
}

/// Item category of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Frames and glasses styles
    Frame,
    /// Lenses
    Lens,
    /// Lens coatings
    Coating,
    /// Anything else
    Other,
}

impl Category {
    /// All categories in output column order.
    pub const ALL: [Category; 4] = [
        Category::Frame,
        Category::Lens,
        Category::Coating,
        Category::Other,
    ];

    /// Classify a line item description.
    ///
    /// The checks run in a fixed order: coating, lens, frame.
    pub fn of(item: &str) -> Self {
        let lower = item.to_lowercase();
        if lower.contains("coating") {
            Category::Coating
        } else if lower.contains("index lens")
            || lower.contains("prescription lens")
            || RE_LENS_WORD.is_match(item)
        {
            Category::Lens
        } else if lower.contains("frame") || lower.contains("glasses style") {
            Category::Frame
        } else {
            Category::Other
        }
    }

    /// Display name (`"Frame"`).
    pub fn name(&self) -> &'static str {
        match self {
            Category::Frame => "Frame",
            Category::Lens => "Lens",
            Category::Coating => "Coating",
            Category::Other => "Other",
        }
    }

    /// Wide-table column base name (`"Frame Items"`).
    pub fn items_column(&self) -> &'static str {
        match self {
            Category::Frame => "Frame Items",
            Category::Lens => "Lens Items",
            Category::Coating => "Coating Items",
            Category::Other => "Other Items",
        }
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

/// Parse a quantity cell. Anything unusable counts as one.
pub fn parse_quantity(raw: &str) -> f64 {
    match raw.trim().parse::<f64>() {
        Ok(q) if q.is_finite() => q,
        _ => 1.0,
    }
}

/// Display text for a line: the item, with `x{qty}` when quantity is not 1.
pub fn item_display(item: &str, quantity: &str) -> String {
    let item = item.trim();
    let qty = parse_quantity(quantity);
    if qty == 1.0 {
        item.to_string()
    } else {
        format!("{} x{}", item, format_quantity(qty))
    }
}

fn format_quantity(qty: f64) -> String {
    if qty.fract() == 0.0 && qty.abs() < 1e15 {
        format!("{}", qty as i64)
    } else {
        format!("{}", qty)
    }
}

/// Drop blank entries and repeated values, keeping first occurrences in order.
pub fn uniq_preserve_order<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = IndexSet::new();
    for item in items {
        let trimmed = item.as_ref().trim();
        if !trimmed.is_empty() && !seen.contains(trimmed) {
            seen.insert(trimmed.to_string());
        }
    }
    seen.into_iter().collect()
}

/// Item display lists of one bundle, one per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryItems {
    lists: [Vec<String>; 4],
}

impl CategoryItems {
    /// Create empty lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to a category.
    pub fn push(&mut self, category: Category, entry: String) {
        self.lists[category.slot()].push(entry);
    }

    /// Raw entries of a category, in insertion order.
    pub fn get(&self, category: Category) -> &[String] {
        &self.lists[category.slot()]
    }

    /// Deduplicated entries of a category.
    pub fn unique(&self, category: Category) -> Vec<String> {
        uniq_preserve_order(self.get(category))
    }

    /// Deduplicated entries joined into one cell.
    pub fn joined(&self, category: Category) -> String {
        self.unique(category).join(ITEM_SEPARATOR)
    }

    /// Whether every category is empty.
    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }
}

/// One bundle (one pair of glasses) inside an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Bundle identifier
    pub id: String,
    /// Categorized item display lists
    pub items: CategoryItems,
    /// Prescription fields, first non-empty value wins
    pub rx: FirstWins,
    /// Order-level columns as they appear on this bundle's own rows
    pub fields: FirstWins,
}

impl Bundle {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            items: CategoryItems::new(),
            rx: FirstWins::new(),
            fields: FirstWins::new(),
        }
    }
}

/// One order and its bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Order identifier
    pub id: String,
    /// Order-level fields, first non-empty value wins
    pub fields: FirstWins,
    bundles: IndexMap<String, Bundle>,
}

impl Order {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            fields: FirstWins::new(),
            bundles: IndexMap::new(),
        }
    }

    /// Bundles sorted by Bundle ID as strings.
    ///
    /// Ordering is lexicographic: `"10"` sorts before `"2"`.
    pub fn sorted_bundles(&self) -> Vec<&Bundle> {
        let mut bundles: Vec<&Bundle> = self.bundles.values().collect();
        bundles.sort_by(|a, b| a.id.cmp(&b.id));
        bundles
    }

    /// Number of bundles.
    pub fn bundle_count(&self) -> usize {
        self.bundles.len()
    }
}

/// Field view of one bundle, limited to values from the bundle's own rows.
///
/// Lookups never reach another bundle of the same order; use
/// [`Order::fields`] for values that belong to the whole order.
#[derive(Debug, Clone, Copy)]
pub struct BundleFields<'a> {
    /// Owning order
    pub order: &'a Order,
    /// The bundle
    pub bundle: &'a Bundle,
}

impl FieldSource for BundleFields<'_> {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            ORDER_ID => Some(self.order.id.as_str()),
            BUNDLE_ID => Some(self.bundle.id.as_str()),
            _ => self
                .bundle
                .rx
                .get(name)
                .or_else(|| self.bundle.fields.get(name)),
        }
    }
}

/// All orders of one request, in first-seen order.
#[derive(Debug, Clone)]
pub struct OrderMap {
    columns: ColumnSets,
    orders: IndexMap<String, Order>,
}

impl OrderMap {
    /// Fold rows into orders and bundles in a single pass.
    pub fn fold(rows: &[Row], columns: ColumnSets) -> Self {
        let mut orders: IndexMap<String, Order> = IndexMap::new();

        for row in rows {
            let order_id = row.field(ORDER_ID).unwrap_or("").trim();
            let bundle_id = row.field(BUNDLE_ID).unwrap_or("").trim();

            let order = orders
                .entry(order_id.to_string())
                .or_insert_with(|| Order::new(order_id));
            order.fields.merge_from(row, &columns.order_level_cols);

            let bundle = order
                .bundles
                .entry(bundle_id.to_string())
                .or_insert_with(|| Bundle::new(bundle_id));

            let item = row.field(LINE_ITEM).unwrap_or("");
            if !item.trim().is_empty() {
                let quantity = row.field(QUANTITY).unwrap_or("");
                bundle
                    .items
                    .push(Category::of(item), item_display(item, quantity));
            }
            bundle.rx.merge_from(row, &columns.rx_cols);
            bundle.fields.merge_from(row, &columns.order_level_cols);
        }

        log::debug!("Folded {} rows into {} orders", rows.len(), orders.len());
        Self { columns, orders }
    }

    /// Column partition the map was built with.
    pub fn columns(&self) -> &ColumnSets {
        &self.columns
    }

    /// Orders in first-seen order.
    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.orders.values()
    }

    /// Look up an order.
    pub fn get(&self, order_id: &str) -> Option<&Order> {
        self.orders.get(order_id)
    }

    /// Number of orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether there are no orders.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Largest bundle count over all orders.
    pub fn max_bundle_count(&self) -> usize {
        self.orders.values().map(Order::bundle_count).max().unwrap_or(0)
    }

    /// Output column list of the wide table.
    pub fn wide_columns(&self) -> Vec<String> {
        let mut columns = vec![ORDER_ID.to_string(), BUNDLE_COUNT.to_string()];
        columns.extend(self.columns.order_level_cols.iter().cloned());

        for i in 1..=self.max_bundle_count() {
            columns.push(bundle_column(BUNDLE_ID, i));
            for category in Category::ALL {
                columns.push(bundle_column(category.items_column(), i));
            }
            for rx in &self.columns.rx_cols {
                columns.push(bundle_column(rx, i));
            }
        }

        columns
            .into_iter()
            .filter(|c| c == ORDER_ID || c == BUNDLE_COUNT || !self.columns.is_dropped(c))
            .collect()
    }

    /// Flatten into the wide table.
    pub fn flatten(&self) -> Table {
        let columns = self.wide_columns();
        let keep: IndexSet<&str> = columns.iter().map(String::as_str).collect();

        let rows = self
            .orders
            .values()
            .map(|order| {
                let mut row = Row::new();
                row.insert(ORDER_ID.to_string(), order.id.clone());
                row.insert(BUNDLE_COUNT.to_string(), order.bundle_count().to_string());
                for col in &self.columns.order_level_cols {
                    if keep.contains(col.as_str()) {
                        row.insert(col.clone(), order.fields.get_or_empty(col).to_string());
                    }
                }

                for (i, bundle) in order.sorted_bundles().into_iter().enumerate() {
                    let index = i + 1;
                    let mut cells = vec![(bundle_column(BUNDLE_ID, index), bundle.id.clone())];
                    for category in Category::ALL {
                        cells.push((
                            bundle_column(category.items_column(), index),
                            bundle.items.joined(category),
                        ));
                    }
                    for rx in &self.columns.rx_cols {
                        cells.push((bundle_column(rx, index), bundle.rx.get_or_empty(rx).to_string()));
                    }
                    for (col, value) in cells {
                        if keep.contains(col.as_str()) {
                            row.insert(col, value);
                        }
                    }
                }
                row
            })
            .collect();

        Table::new(columns, rows)
    }
}

/// Check that a raw table can be aggregated.
///
/// The first row's keys are the schema; the first missing required column
/// is reported.
pub fn validate_raw_schema(table: &Table) -> Result<()> {
    let first = table.rows.first().ok_or(Error::EmptyInput)?;
    for required in REQUIRED_COLUMNS {
        if !first.contains_key(required) {
            return Err(Error::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}

/// Schema of a raw table: the first row's keys.
pub(crate) fn raw_header(table: &Table) -> Vec<String> {
    table
        .rows
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default()
}

/// Validate, classify and fold a raw table.
pub fn fold_table(table: &Table, drops: &DropConfig) -> Result<OrderMap> {
    validate_raw_schema(table)?;
    let columns = ColumnSets::classify_with_drops(&raw_header(table), drops);
    Ok(OrderMap::fold(&table.rows, columns))
}

/// Aggregate a raw line-item table into the wide per-order table.
pub fn aggregate(table: &Table, drops: &DropConfig) -> Result<Table> {
    let orders = fold_table(table, drops)?;
    let wide = orders.flatten();
    log::info!(
        "Aggregated {} rows into {} orders (max {} bundles)",
        table.len(),
        wide.len(),
        orders.max_bundle_count()
    );
    Ok(wide)
}
