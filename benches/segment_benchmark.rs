//! Benchmarks for pageseg segmentation performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks segment synthetic multi-column pages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pageseg::{
    BoxSpec, Color, GroupStrategyKind, Rect, SegmentOptions, Segmenter, SeparatorStrategyKind,
};

/// Creates a page with a heading and the given number of text columns,
/// each holding a few paragraphs of word boxes.
fn create_test_page(columns: i32) -> BoxSpec {
    let width = 40 + columns * 260;
    let mut page = BoxSpec::viewport(width, 900).with_child(
        BoxSpec::container(Rect::new(0, 0, width - 1, 59))
            .with_background(Color::rgb(30, 60, 90))
            .with_child(
                BoxSpec::text("Synthetic Benchmark Page", Rect::new(20, 15, 400, 45))
                    .with_font_size(24.0)
                    .with_color(Color::WHITE)
                    .bold(),
            ),
    );

    for col in 0..columns {
        let x0 = 20 + col * 260;
        let mut y = 80;
        for para in 0..4 {
            page = page.with_child(
                BoxSpec::text(format!("Section {}.{}", col + 1, para + 1), Rect::new(x0, y, x0 + 150, y + 15))
                    .with_font_size(15.0)
                    .bold(),
            );
            y += 22;
            for line in 0..6 {
                // two word boxes per line, joined by the line finder
                page = page
                    .with_child(BoxSpec::text(format!("Line {} of", line), Rect::new(x0, y, x0 + 90, y + 12)))
                    .with_child(BoxSpec::text("the paragraph text", Rect::new(x0 + 95, y, x0 + 230, y + 12)));
                y += 15;
            }
            y += 20;
        }
    }
    page.with_child(BoxSpec::text("Printed 12.03.2024", Rect::new(20, 870, 200, 882)))
}

/// Benchmark the full pipeline at various page widths.
fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");

    for columns in [1, 2, 3].iter() {
        let page = create_test_page(*columns);
        let segmenter = Segmenter::default();

        group.bench_function(format!("{}_columns", columns), |b| {
            b.iter(|| segmenter.segment(black_box(page.clone())).unwrap());
        });
    }

    group.finish();
}

/// Benchmark the grouping strategies on the same page.
fn bench_group_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_strategies");
    let page = create_test_page(2);

    for kind in [
        GroupStrategyKind::BySeparators,
        GroupStrategyKind::ByGroupingAndSeparators,
        GroupStrategyKind::ByFlooding,
    ] {
        let options = SegmentOptions::new()
            .with_separator_strategy(SeparatorStrategyKind::Columns)
            .with_group_strategy(kind);
        let segmenter = Segmenter::new(options);

        group.bench_function(format!("{:?}", kind), |b| {
            b.iter(|| segmenter.segment(black_box(page.clone())).unwrap());
        });
    }

    group.finish();
}

/// Benchmark basic area construction alone.
fn bench_basic_areas(c: &mut Criterion) {
    let page = create_test_page(3);
    c.bench_function("basic_areas", |b| {
        b.iter(|| pageseg::AreaTree::from_spec(black_box(page.clone())).unwrap());
    });
}

criterion_group!(benches, bench_segmentation, bench_group_strategies, bench_basic_areas);
criterion_main!(benches);
