use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tims_targeted::aggregate::{aggregate, pivot, AggregationMode};
use tims_targeted::extract::{ExtractionDriver, FeatureExtractor};
use tims_targeted::feature::FeatureWindow;
use tims_targeted::tdf::memory::{PLATE_DENOMINATOR, PLATE_INTERNAL_STANDARD, PLATE_NUMERATOR};
use tims_targeted::tdf::{InMemoryFrame, InMemoryRawData, RawDataSource};

fn plate_windows() -> Vec<FeatureWindow> {
    [PLATE_NUMERATOR, PLATE_DENOMINATOR, PLATE_INTERNAL_STANDARD]
        .iter()
        .map(|&(mz, ook0)| FeatureWindow::new(mz, 0.05, ook0, 0.01).unwrap())
        .collect()
}

/// One frame with `peaks_per_scan` peaks on every scan of a 900-scan frame
fn dense_frame(peaks_per_scan: usize) -> InMemoryRawData {
    let mut frame = InMemoryFrame::new(1, 900, "A1").with_mobility_calibration(1.8, -0.0013);
    for scan in 0..900u32 {
        for j in 0..peaks_per_scan {
            let mz = 200.0 + (j as f64 * 1300.0 / peaks_per_scan as f64);
            frame = frame.add_peak(scan, mz, 100.0 + j as f64);
        }
    }
    InMemoryRawData::new().with_frame(frame)
}

/// Benchmark a single (feature, frame) extraction against peak density
fn bench_single_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_frame");

    for peaks_per_scan in [10, 100, 1000] {
        let source = dense_frame(peaks_per_scan);
        let frame = source.frame_metadata(1).unwrap();
        let extractor = FeatureExtractor::new(&source);
        let window = FeatureWindow::new(622.0, 0.05, 1.0, 0.05).unwrap();

        group.bench_with_input(
            BenchmarkId::new("peaks_per_scan", peaks_per_scan),
            &peaks_per_scan,
            |b, _| b.iter(|| black_box(extractor.extract(&frame, &window).unwrap())),
        );
    }

    group.finish();
}

/// Benchmark the features x frames driver over plates of increasing size
fn bench_plate(c: &mut Criterion) {
    let mut group = c.benchmark_group("plate");
    let windows = plate_windows();

    for (rows, columns) in [(8, 12), (16, 24)] {
        let source = InMemoryRawData::synthetic_plate(rows, columns);
        group.throughput(Throughput::Elements((rows * columns * windows.len()) as u64));

        group.bench_with_input(
            BenchmarkId::new("sequential", rows * columns),
            &source,
            |b, source| b.iter(|| black_box(ExtractionDriver::new(source).run_all(&windows).unwrap())),
        );

        #[cfg(feature = "parallel")]
        group.bench_with_input(
            BenchmarkId::new("parallel", rows * columns),
            &source,
            |b, source| {
                b.iter(|| {
                    black_box(
                        ExtractionDriver::new(source)
                            .parallel(true)
                            .run_all(&windows)
                            .unwrap(),
                    )
                })
            },
        );
    }

    group.finish();
}

/// Benchmark ratio aggregation and the heatmap pivot
fn bench_aggregation(c: &mut Criterion) {
    let source = InMemoryRawData::synthetic_plate(16, 24);
    let outcome = ExtractionDriver::new(&source).run_all(&plate_windows()).unwrap();
    let mode = AggregationMode::NormalizedRatio {
        numerator_ook0: PLATE_NUMERATOR.1,
        denominator_ook0: PLATE_DENOMINATOR.1,
        internal_standard_mz: PLATE_INTERNAL_STANDARD.0,
    };

    c.bench_function("aggregate_and_pivot_384_spots", |b| {
        b.iter(|| {
            let report = aggregate(black_box(&outcome.records), mode);
            black_box(pivot(&report.ratios))
        })
    });
}

criterion_group!(benches, bench_single_frame, bench_plate, bench_aggregation);
criterion_main!(benches);
