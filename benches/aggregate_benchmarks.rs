use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rxlabel::layout::LabelTemplate;
use rxlabel::writer::{FontSources, PdfWriterConfig};
use rxlabel::{aggregate, build_all_labels, render_with_sources, DropConfig, LabelMode, Table};

const ITEMS: [&str; 4] = ["Round Frame", "1.67 Index Lens", "Blue Light Coating", "Hard Case"];

/// Raw export with `orders` orders of three bundles, four lines per bundle.
fn raw_orders(orders: usize) -> Table {
    let mut records = Vec::with_capacity(orders * 12);
    for order in 0..orders {
        for bundle in 1..=3 {
            for (i, item) in ITEMS.iter().enumerate() {
                let first = i == 0;
                records.push(vec![
                    format!("{}", 10_000 + order),
                    bundle.to_string(),
                    item.to_string(),
                    "1".to_string(),
                    if first { format!("Customer {}", order) } else { String::new() },
                    if first { "-1.25".to_string() } else { String::new() },
                    if first { "-1.5".to_string() } else { String::new() },
                    if first { "63".to_string() } else { String::new() },
                ]);
            }
        }
    }
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
        ],
        records,
    )
}

fn aggregate_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");
    for orders in [10usize, 100, 1000] {
        let table = raw_orders(orders);
        group.throughput(Throughput::Elements(table.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(orders), &table, |b, table| {
            b.iter(|| aggregate(black_box(table), &DropConfig::new()).unwrap())
        });
    }
    group.finish();
}

fn labels_bench(c: &mut Criterion) {
    let raw = raw_orders(100);
    let wide = aggregate(&raw, &DropConfig::new()).unwrap();

    let mut group = c.benchmark_group("labels");
    group.bench_function("raw", |b| b.iter(|| build_all_labels(black_box(&raw), LabelMode::Bundle).unwrap()));
    group.bench_function("aggregated", |b| {
        b.iter(|| build_all_labels(black_box(&wide), LabelMode::Bundle).unwrap())
    });
    group.finish();
}

fn render_bench(c: &mut Criterion) {
    let labels = build_all_labels(&raw_orders(100), LabelMode::Bundle).unwrap().labels;
    let sources = FontSources::new();
    let template = LabelTemplate::default();

    let mut group = c.benchmark_group("render");
    for compress in [false, true] {
        let config = PdfWriterConfig::default().with_compress(compress);
        group.bench_with_input(BenchmarkId::new("compress", compress), &config, |b, config| {
            b.iter(|| render_with_sources(black_box(&labels), &sources, &template, config).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, aggregate_bench, labels_bench, render_bench);
criterion_main!(benches);
