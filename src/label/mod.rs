//! Label records.
//!
//! A label is either one bundle or one order. Input may be a raw line-item
//! table (folded through [`OrderMap`]) or an already aggregated wide table
//! (read through [`AggregatedTable`]). Both paths enumerate the complete label
//! sequence in a fixed order, and only the requested window is resolved into
//! [`LabelData`].

pub mod fields;
pub mod normalize;

use crate::aggregate::{fold_table, raw_header, BundleFields, Category, CategoryItems, OrderMap};
use crate::config::{DropConfig, MAX_LABEL_LIMIT};
use crate::error::{Error, Result};
use crate::reader::{AggregatedTable, TableShape, WideBundle};
use crate::resolve::{first_non_empty, FieldSource};
use crate::table::Table;
use fields::EyeFields;
use serde::Serialize;

/// What one label represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// One label per bundle
    #[default]
    Bundle,
    /// One label per order (first bundle)
    Order,
}

impl std::str::FromStr for LabelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bundle" => Ok(LabelMode::Bundle),
            "order" => Ok(LabelMode::Order),
            other => Err(Error::InvalidRange(format!("unknown label mode '{}'", other))),
        }
    }
}

/// Pagination window over the label sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelRange {
    /// Index of the first label to return
    pub start: usize,
    /// Maximum number of labels to return, `1..=300`
    pub limit: usize,
}

impl Default for LabelRange {
    fn default() -> Self {
        Self {
            start: 0,
            limit: MAX_LABEL_LIMIT,
        }
    }
}

impl LabelRange {
    /// Create a window.
    pub fn new(start: usize, limit: usize) -> Self {
        Self { start, limit }
    }

    /// Check the limit bounds.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 || self.limit > MAX_LABEL_LIMIT {
            return Err(Error::InvalidRange(format!(
                "limit must be between 1 and {}, got {}",
                MAX_LABEL_LIMIT, self.limit
            )));
        }
        Ok(())
    }
}

/// Prescription values for one eye, display-ready.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EyeRx {
    /// Sphere
    pub sph: String,
    /// Cylinder
    pub cyl: String,
    /// Axis
    pub axis: String,
    /// Near addition
    pub add: String,
    /// Prism
    pub prism: String,
    /// Prism base
    pub base: String,
    /// Monocular pupillary distance
    pub pd: String,
}

/// Fully resolved, normalized content of one label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelData {
    /// Order identifier
    pub order_id: String,
    /// Bundle identifier
    pub bundle_id: String,
    /// 1-based position of the bundle within its order
    pub bundle_index: usize,
    /// Number of bundles in the order
    pub bundle_count: usize,
    /// Customer name
    pub customer_name: String,
    /// Prescription type
    pub prescription_type: String,
    /// Right eye
    pub od: EyeRx,
    /// Left eye
    pub os: EyeRx,
    /// Frame items
    pub frame: String,
    /// Lens items
    pub lens: String,
    /// Lens thickness / index line
    pub thickness: String,
    /// Coating line
    pub coating: String,
    /// Lens notes
    pub notes: String,
}

impl LabelData {
    /// Every free-text value printed on the label.
    pub fn text_fields(&self) -> Vec<&str> {
        let mut out = vec![
            self.order_id.as_str(),
            self.bundle_id.as_str(),
            self.customer_name.as_str(),
            self.prescription_type.as_str(),
            self.frame.as_str(),
            self.lens.as_str(),
            self.thickness.as_str(),
            self.coating.as_str(),
            self.notes.as_str(),
        ];
        for eye in [&self.od, &self.os] {
            out.extend([
                eye.sph.as_str(),
                eye.cyl.as_str(),
                eye.axis.as_str(),
                eye.add.as_str(),
                eye.prism.as_str(),
                eye.base.as_str(),
                eye.pd.as_str(),
            ]);
        }
        out
    }
}

/// One page of label records plus the size of the full sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LabelBatch {
    /// Labels inside the requested window, in sequence order
    pub labels: Vec<LabelData>,
    /// Number of labels in the whole sequence
    pub total: usize,
}

fn eye_rx<S: FieldSource + ?Sized>(source: &S, eye: &EyeFields, pd: String) -> EyeRx {
    EyeRx {
        sph: normalize::two_decimal(first_non_empty(source, eye.sph)),
        cyl: normalize::two_decimal(first_non_empty(source, eye.cyl)),
        axis: normalize::axis(first_non_empty(source, eye.axis)),
        add: normalize::two_decimal(first_non_empty(source, eye.add)),
        prism: normalize::two_decimal(first_non_empty(source, eye.prism)),
        base: normalize::normalize_text(first_non_empty(source, eye.base)),
        pd,
    }
}

/// Resolve a label from any bundle field source.
///
/// Every field comes from `source` except the customer name, which falls
/// back to `order` when the bundle itself does not carry one.
pub fn resolve_label<S, O>(
    source: &S,
    order: &O,
    items: &CategoryItems,
    order_id: &str,
    bundle_id: &str,
    bundle_index: usize,
    bundle_count: usize,
) -> LabelData
where
    S: FieldSource + ?Sized,
    O: FieldSource + ?Sized,
{
    let mut customer_name = first_non_empty(source, fields::CUSTOMER_NAME);
    if customer_name.trim().is_empty() {
        customer_name = first_non_empty(order, fields::CUSTOMER_NAME);
    }
    let lens_items = items.unique(Category::Lens);
    let lens = normalize::normalize_text(&lens_items.join("; "));
    let (pd_od, pd_os) = normalize::pupillary_distance(
        first_non_empty(source, fields::OD.pd),
        first_non_empty(source, fields::OS.pd),
        first_non_empty(source, fields::SINGLE_PD),
    );

    LabelData {
        order_id: normalize::normalize_text(order_id),
        bundle_id: normalize::normalize_text(bundle_id),
        bundle_index,
        bundle_count,
        customer_name: normalize::normalize_text(customer_name),
        prescription_type: normalize::prescription_type(first_non_empty(
            source,
            fields::PRESCRIPTION_TYPE,
        )),
        od: eye_rx(source, &fields::OD, pd_od),
        os: eye_rx(source, &fields::OS, pd_os),
        frame: normalize::normalize_text(&items.unique(Category::Frame).join("; ")),
        thickness: normalize::thickness(first_non_empty(source, fields::INDEX_LENS), &lens),
        lens,
        coating: normalize::coating(&items.unique(Category::Coating)),
        notes: normalize::normalize_text(first_non_empty(source, fields::LENS_NOTES)),
    }
}

/// A label position in the full sequence, resolved lazily.
enum LabelSlot<'a> {
    Raw {
        view: BundleFields<'a>,
        index: usize,
        count: usize,
    },
    Wide {
        bundle: WideBundle<'a>,
        count: usize,
    },
}

impl LabelSlot<'_> {
    fn resolve(&self) -> LabelData {
        match self {
            LabelSlot::Raw { view, index, count } => resolve_label(
                view,
                &view.order.fields,
                &view.bundle.items,
                &view.order.id,
                &view.bundle.id,
                *index,
                *count,
            ),
            LabelSlot::Wide { bundle, count } => resolve_label(
                bundle,
                bundle,
                &bundle.items(),
                bundle.order_id(),
                bundle.bundle_id(),
                bundle.index(),
                *count,
            ),
        }
    }
}

fn raw_slots(orders: &OrderMap, mode: LabelMode) -> Vec<LabelSlot<'_>> {
    let mut slots = Vec::new();
    for order in orders.orders() {
        let count = order.bundle_count();
        for (i, bundle) in order.sorted_bundles().into_iter().enumerate() {
            slots.push(LabelSlot::Raw {
                view: BundleFields { order, bundle },
                index: i + 1,
                count,
            });
            if mode == LabelMode::Order {
                break;
            }
        }
    }
    slots
}

fn wide_slots<'a>(table: &AggregatedTable<'a>, mode: LabelMode) -> Vec<LabelSlot<'a>> {
    let mut slots = Vec::new();
    for (i, row) in table.rows().iter().enumerate() {
        let count = table.bundle_count(i);
        match mode {
            LabelMode::Order => slots.push(LabelSlot::Wide {
                bundle: WideBundle::new(row, 1),
                count,
            }),
            LabelMode::Bundle => {
                for index in 1..=count {
                    slots.push(LabelSlot::Wide {
                        bundle: WideBundle::new(row, index),
                        count,
                    });
                }
            },
        }
    }
    slots
}

fn take_window(slots: &[LabelSlot<'_>], start: usize, limit: usize) -> Result<LabelBatch> {
    let total = slots.len();
    if start > total {
        return Err(Error::InvalidRange(format!(
            "start {} exceeds label count {}",
            start, total
        )));
    }
    let labels: Vec<LabelData> = slots
        .iter()
        .skip(start)
        .take(limit)
        .map(LabelSlot::resolve)
        .collect();
    log::debug!("Resolved labels {}..{} of {}", start, start + labels.len(), total);
    Ok(LabelBatch { labels, total })
}

fn collect_labels(table: &Table, mode: LabelMode, start: usize, limit: usize) -> Result<LabelBatch> {
    let header = if table.columns.is_empty() {
        raw_header(table)
    } else {
        table.columns.clone()
    };

    match TableShape::detect(&header) {
        TableShape::Raw => {
            let orders = fold_table(table, &DropConfig::new())?;
            let slots = raw_slots(&orders, mode);
            take_window(&slots, start, limit)
        },
        TableShape::Aggregated => {
            let wide = AggregatedTable::new(table)?;
            if mode == LabelMode::Order {
                wide.require_first_bundle()?;
            }
            let slots = wide_slots(&wide, mode);
            take_window(&slots, start, limit)
        },
    }
}

/// Build the labels inside `range`.
pub fn build_labels(table: &Table, mode: LabelMode, range: LabelRange) -> Result<LabelBatch> {
    range.validate()?;
    let batch = collect_labels(table, mode, range.start, range.limit)?;
    log::info!(
        "Built {} of {} {:?} labels from offset {}",
        batch.labels.len(),
        batch.total,
        mode,
        range.start
    );
    Ok(batch)
}

/// Build every label without pagination.
pub fn build_all_labels(table: &Table, mode: LabelMode) -> Result<LabelBatch> {
    collect_labels(table, mode, 0, usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> Table {
        Table::from_records(
            [
                "Order ID",
                "Bundle ID",
                "Line Item",
                "Quantity",
                "Customer Name",
                "OD SPH",
                "OS SPH",
                "PD",
                "Prescription Type",
            ],
            [
                vec!["1001", "1", "Round Frame", "1", "Ada", "-2", "-2.5", "62", ""],
                vec!["1001", "1", "1.67 Index Lens", "1", "", "", "", "", ""],
                vec!["1001", "1", "Blue Light Coating", "1", "", "", "", "", ""],
                vec!["1001", "2", "Cat Eye Frame", "1", "", "-1", "-1", "", "Progressive"],
                vec!["1002", "1", "Square Frame", "2", "Bo", "+0.5", "", "", ""],
            ],
        )
    }

    #[test]
    fn test_bundle_mode_labels() {
        let batch = build_all_labels(&raw(), LabelMode::Bundle).unwrap();
        assert_eq!(batch.total, 3);
        let first = &batch.labels[0];
        assert_eq!(first.order_id, "1001");
        assert_eq!(first.bundle_index, 1);
        assert_eq!(first.bundle_count, 2);
        assert_eq!(first.customer_name, "Ada");
        assert_eq!(first.od.sph, "-2.00");
        assert_eq!(first.os.sph, "-2.50");
        assert_eq!(first.od.pd, "31.00");
        assert_eq!(first.thickness, "1.67 index lens");
        assert_eq!(first.coating, "Blue Light Blocking");
        assert_eq!(first.prescription_type, "Single Vision");

        let second = &batch.labels[1];
        assert_eq!(second.bundle_id, "2");
        assert_eq!(second.prescription_type, "Progressive");
        assert_eq!(second.thickness, "index lens");
        assert_eq!(second.customer_name, "Ada");
        assert_eq!(second.od.sph, "-1.00");
        assert_eq!(second.od.pd, "");

        assert_eq!(batch.labels[2].frame, "Square Frame x2");
    }

    #[test]
    fn test_order_mode_labels() {
        let batch = build_all_labels(&raw(), LabelMode::Order).unwrap();
        assert_eq!(batch.total, 2);
        assert_eq!(batch.labels[0].bundle_id, "1");
        assert_eq!(batch.labels[1].order_id, "1002");
    }

    #[test]
    fn test_range_validation() {
        let table = raw();
        assert!(build_labels(&table, LabelMode::Bundle, LabelRange::new(0, 0)).is_err());
        assert!(build_labels(&table, LabelMode::Bundle, LabelRange::new(0, 301)).is_err());
        assert!(matches!(
            build_labels(&table, LabelMode::Bundle, LabelRange::new(4, 10)),
            Err(Error::InvalidRange(_))
        ));
        let at_end = build_labels(&table, LabelMode::Bundle, LabelRange::new(3, 10)).unwrap();
        assert!(at_end.labels.is_empty());
        assert_eq!(at_end.total, 3);
    }

    #[test]
    fn test_windows_concatenate() {
        let table = raw();
        let all = build_all_labels(&table, LabelMode::Bundle).unwrap().labels;
        let mut paged = Vec::new();
        let mut start = 0;
        loop {
            let batch = build_labels(&table, LabelMode::Bundle, LabelRange::new(start, 2)).unwrap();
            if batch.labels.is_empty() {
                break;
            }
            start += batch.labels.len();
            paged.extend(batch.labels);
        }
        assert_eq!(paged, all);
    }

    #[test]
    fn test_missing_bundle_id_for_labels() {
        let table = Table::from_records(["Order ID", "Line Item", "Quantity"], [["1", "Frame", "1"]]);
        match build_labels(&table, LabelMode::Bundle, LabelRange::default()) {
            Err(Error::MissingColumn(col)) => assert_eq!(col, "Bundle ID"),
            other => panic!("expected missing column, got {:?}", other),
        }
    }

    #[test]
    fn test_label_mode_parsing() {
        assert_eq!("Bundle".parse::<LabelMode>().unwrap(), LabelMode::Bundle);
        assert_eq!("order".parse::<LabelMode>().unwrap(), LabelMode::Order);
        assert!("page".parse::<LabelMode>().is_err());
    }
}
