use criterion::black_box;
use criterion::Criterion;

use sync_counter::{Counter, Options, ReadMode, SynchronizedCounter};

pub fn bench(c: &mut Criterion) {
    let counter = SynchronizedCounter::new(0u64);
    c.bench_function("increment", |b| b.iter(|| counter.increment()));
    c.bench_function("increment_by", |b| {
        b.iter(|| counter.increment_by(black_box(3)))
    });
    c.bench_function("get_count locked", |b| b.iter(|| counter.get_count()));

    let mut options = Options::default();
    options.read_mode = ReadMode::Relaxed;
    let relaxed = SynchronizedCounter::with_options(0u64, options);
    c.bench_function("get_count relaxed", |b| b.iter(|| relaxed.get_count()));

    let float = SynchronizedCounter::new(0f64);
    c.bench_function("increment_by f64", |b| {
        b.iter(|| float.increment_by(black_box(0.5)))
    });
}
