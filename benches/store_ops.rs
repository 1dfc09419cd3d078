use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use supersequence_dp::{
    cost::Cost,
    store::{DiskStore, MemoryStore},
    CostStore, SuffixPair,
};

const SIDE: usize = 64;

fn sample_cost(i1: usize, i2: usize) -> Cost {
    let digits: Vec<u8> = (0..i1 + i2).map(|k| ((k + i1 * 3) % 10) as u8).collect();
    Cost::from_prefix(&digits)
}

fn fill<S: CostStore>(store: &mut S) {
    for i1 in 0..SIDE {
        for i2 in 0..SIDE {
            store.put(SuffixPair::new(i1, i2), sample_cost(i1, i2)).unwrap();
        }
    }
}

fn bench_put(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("put.db");
    let mut group = c.benchmark_group("store_put");
    group.bench_function("memory", |b| {
        b.iter_batched(
            || MemoryStore::new(SIDE, SIDE),
            |mut store| {
                fill(&mut store);
                black_box(store)
            },
            BatchSize::PerIteration,
        )
    });
    group.bench_function("disk", |b| {
        b.iter_batched(
            || DiskStore::create(&path, SIDE, SIDE).unwrap(),
            |mut store| {
                fill(&mut store);
                store.destroy().unwrap();
            },
            BatchSize::PerIteration,
        )
    });
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let mut memory = MemoryStore::new(SIDE, SIDE);
    fill(&mut memory);
    let mut disk = DiskStore::create(dir.path().join("get.db"), SIDE, SIDE).unwrap();
    fill(&mut disk);

    let mut group = c.benchmark_group("store_get");
    group.bench_function("memory", |b| {
        b.iter(|| black_box(memory.get(SuffixPair::new(SIDE - 1, SIDE / 2)).unwrap()))
    });
    group.bench_function("disk", |b| {
        b.iter(|| black_box(disk.get(SuffixPair::new(SIDE - 1, SIDE / 2)).unwrap()))
    });
    group.finish();
    disk.destroy().unwrap();
}

criterion_group!(benches, bench_put, bench_get);
criterion_main!(benches);
