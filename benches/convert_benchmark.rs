//! Performance benchmarks for the conversion engine
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use pdf_convert::office::engine::Workbook;
use pdf_convert::office::ooxml::{write_docx_from_text, XlsxWorkbook};
use pdf_convert::pdf::pixels_to_points;

/// Benchmark the fallback document writer on a medium body of text
fn bench_docx_writer(c: &mut Criterion) {
    let text: String = (0..500)
        .map(|i| format!("Extracted line number {} with some payload text\n", i))
        .collect();

    let mut group = c.benchmark_group("docx_writer");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("fallback_500_lines", |b| {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.docx");
        b.iter(|| {
            write_docx_from_text(black_box(&path), black_box(&text)).unwrap();
        });
    });

    group.finish();
}

/// Benchmark workbook composition, one line per row
fn bench_workbook_compose(c: &mut Criterion) {
    let lines: Vec<String> = (0..1000)
        .map(|i| format!("cell value for row {}", i))
        .collect();

    c.bench_function("workbook_1000_rows", |b| {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.xlsx");
        b.iter(|| {
            let mut workbook = XlsxWorkbook::new();
            for (row, line) in lines.iter().enumerate() {
                workbook.set_cell(row as u32, 0, black_box(line));
            }
            workbook.save(&path).unwrap();
        });
    });
}

/// Sanity benchmark for the hot geometry helper
fn bench_geometry(c: &mut Criterion) {
    c.bench_function("pixels_to_points", |b| {
        b.iter(|| {
            for px in 0..2000u32 {
                black_box(pixels_to_points(black_box(px), 200));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_docx_writer,
    bench_workbook_compose,
    bench_geometry
);
criterion_main!(benches);
