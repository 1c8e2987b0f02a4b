use super::random_square;
use commonware_square::{
    eds::compute_roots,
    inclusion::{subtree_path, SquareSubtreeCache},
};
use criterion::{black_box, criterion_group, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn bench_get_subtree_root(c: &mut Criterion) {
    for square_size in [4, 16, 64] {
        let mut sampler = StdRng::seed_from_u64(0);
        let square = random_square(square_size, &mut sampler);
        let mut cache = SquareSubtreeCache::new(square_size);
        let dah = compute_roots(&square, &mut cache).unwrap();
        let depth = cache.depth();
        c.bench_function(&format!("{}/k={}", module_path!(), square_size), |b| {
            b.iter(|| {
                let row = sampler.gen_range(0..2 * square_size);
                let leaf = sampler.gen_range(0..2 * square_size);
                let path = subtree_path(depth, leaf, 1).unwrap();
                black_box(cache.get_subtree_root(&dah, row, &path).unwrap())
            })
        });
    }
}

criterion_group! {
    name = benches;
    config = Criterion::default().sample_size(10);
    targets = bench_get_subtree_root
}
