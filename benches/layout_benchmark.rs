//! Benchmarks for pagemark layout performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks lay out synthetic documents of increasing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic document with the given number of sections.
fn create_test_document(sections: usize) -> String {
    let mut doc = String::from("# Benchmark Document\n\n");

    for i in 0..sections {
        doc.push_str(&format!("## Section {}\n\n", i + 1));
        for _ in 0..4 {
            doc.push_str(
                "The quick brown fox jumps over the lazy dog while the layout engine \
                 measures every word and decides where each line should break.\n",
            );
        }
        doc.push('\n');
        doc.push_str("```rust\nfn main() {\n    println!(\"hello\");\n}\n```\n\n");
    }

    doc
}

/// Benchmark block segmentation alone.
fn bench_segmentation(c: &mut Criterion) {
    let doc = create_test_document(50);

    c.bench_function("segment_50_sections", |b| {
        b.iter(|| pagemark::segment(black_box(&doc)));
    });
}

/// Benchmark the full render pipeline at various sizes.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let options = pagemark::RenderOptions::default();

    for sections in [1, 10, 100].iter() {
        let doc = create_test_document(*sections);

        group.bench_function(format!("{}_sections", sections), |b| {
            b.iter(|| pagemark::render::render(black_box(&doc), &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark word wrapping with the heuristic measurer.
fn bench_wrap(c: &mut Criterion) {
    use pagemark::{HeuristicMeasurer, StyleSheet, TextMeasurer};

    let measurer = HeuristicMeasurer::new();
    let style = StyleSheet::default().body;
    let text = "lorem ipsum dolor sit amet ".repeat(40);

    c.bench_function("wrap_long_paragraph", |b| {
        b.iter(|| {
            pagemark::wrap(black_box(&text), 468.0, |s| measurer.measure(s, &style)).unwrap()
        });
    });
}

/// Benchmark PDF emission.
fn bench_pdf_emit(c: &mut Criterion) {
    let options = pagemark::RenderOptions::default();
    let doc = pagemark::render::render(&create_test_document(20), &options).unwrap();

    c.bench_function("emit_pdf_20_sections", |b| {
        b.iter(|| pagemark::emit_pdf(black_box(&doc), &options).unwrap());
    });
}

criterion_group!(
    benches,
    bench_segmentation,
    bench_render,
    bench_wrap,
    bench_pdf_emit,
);
criterion_main!(benches);
