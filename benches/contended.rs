use std::sync::atomic::{AtomicBool, Ordering};

use criterion::Criterion;

use sync_counter::{Counter, SynchronizedCounter};

const BACKGROUND_THREADS: usize = 3;

/// Measure `increment` while other threads keep incrementing the same counter.
pub fn bench(c: &mut Criterion) {
    let counter = SynchronizedCounter::new(0u64);
    let stop = AtomicBool::new(false);

    std::thread::scope(|scope| {
        for _ in 0..BACKGROUND_THREADS {
            scope.spawn(|| {
                while !stop.load(Ordering::Relaxed) {
                    counter.increment();
                }
            });
        }

        c.bench_function("increment contended", |b| b.iter(|| counter.increment()));
        c.bench_function("get_count_and_reset contended", |b| {
            b.iter(|| counter.get_count_and_reset())
        });

        stop.store(true, Ordering::Relaxed);
    });
}
