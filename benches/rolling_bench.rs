use criterion::{black_box, criterion_group, criterion_main, Criterion};

use rollrs::window::window_sizes_from_offset;
use rollrs::{RollingOptions, Series, Window};

// 2ポインタ走査のベンチマーク
fn bench_window_sizes_from_offset(c: &mut Criterion) {
    let ticks: Vec<i64> = (0..100_000).map(|i| i * 1_000_000_000).collect();

    c.bench_function("window_sizes_from_offset_100k", |b| {
        b.iter(|| window_sizes_from_offset(black_box(&ticks), black_box(30_000_000_000)))
    });
}

// 固定幅ウィンドウ集計のベンチマーク
fn bench_fixed_window_sum(c: &mut Criterion) {
    let values: Vec<f64> = (0..100_000).map(|i| (i % 97) as f64).collect();
    let series = Series::new(values, None);

    c.bench_function("rolling_sum_fixed_64_100k", |b| {
        b.iter(|| {
            let options = RollingOptions {
                min_periods: Some(1),
                ..Default::default()
            };
            series
                .rolling_with(Window::Fixed(64), options)
                .unwrap()
                .sum()
                .unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_window_sizes_from_offset,
    bench_fixed_window_sum
);
criterion_main!(benches);
