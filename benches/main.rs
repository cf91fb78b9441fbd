use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;

mod contended;
mod uncontended;

pub fn bench_main(c: &mut Criterion) {
    uncontended::bench(c);
    contended::bench(c);
}

criterion_group!(benches, bench_main);
criterion_main!(benches);
