use criterion::{black_box, criterion_group, criterion_main, Criterion};
use symcore::factory::bv;

fn benchmark_symbol_creation(c: &mut Criterion) {
    c.bench_function("bv_symbol_fresh", |b| {
        let mut i: u64 = 0;
        b.iter(|| {
            i += 1;
            black_box(bv::symbol(&format!("x{i}"), 32, None).unwrap())
        })
    });
}

fn benchmark_symbol_recons(c: &mut Criterion) {
    let _ = bv::symbol("warm", 32, None).unwrap();
    c.bench_function("bv_symbol_cached", |b| {
        b.iter(|| black_box(bv::symbol("warm", 32, None).unwrap()))
    });
}

fn benchmark_add_chain(c: &mut Criterion) {
    let x = bv::symbol("chain_x", 64, None).unwrap();
    let y = bv::symbol("chain_y", 64, None).unwrap();
    c.bench_function("bv_add_same_operands", |b| {
        b.iter(|| black_box(bv::add(x.clone(), y.clone(), None).unwrap()))
    });
}

criterion_group!(
    benches,
    benchmark_symbol_creation,
    benchmark_symbol_recons,
    benchmark_add_chain
);
criterion_main!(benches);
