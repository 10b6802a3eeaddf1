use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use mutwick::model::{Mutation, MutationTree, Nucleotide};
use mutwick::prune::Pruner;
use mutwick::refine::refine;
use mutwick::usher;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TREE_SIZES: &[usize] = &[10_000, 100_000];

/// Seeded random tree: each node attaches to one of the recent nodes,
/// with 0 to 2 mutations, and every tenth node carries a lineage label.
fn random_tree(num_nodes: usize) -> MutationTree {
    let mut rng = StdRng::seed_from_u64(42);

    let mut tree = MutationTree::with_capacity(num_nodes);
    let root = tree.add_root().unwrap();
    let mut indices = vec![root];
    for i in 1..num_nodes {
        let window = indices.len().min(64);
        let parent = indices[indices.len() - 1 - rng.random_range(0..window)];
        let index = tree.add_child(parent).unwrap();

        let mutations = (0..rng.random_range(0..3))
            .map(|_| {
                let position = rng.random_range(1..=29_903);
                Mutation::new(position, Nucleotide::C, Nucleotide::T).unwrap()
            })
            .collect();
        tree[index].set_mutations(mutations);
        if i % 10 == 0 {
            tree[index].set_label(Some(format!("L{i}")));
        }
        indices.push(index);
    }
    tree
}

fn pruning(c: &mut Criterion) {
    for &size in TREE_SIZES {
        let tree = random_tree(size);
        c.bench_function(&format!("prune {size} to {}", size / 10), |b| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| Pruner::new(size / 10).prune(&mut tree).unwrap(),
                BatchSize::LargeInput,
            );
        });
    }
}

fn refinement(c: &mut Criterion) {
    for &size in TREE_SIZES {
        let tree = random_tree(size);
        c.bench_function(&format!("refine {size}"), |b| {
            b.iter_batched(
                || tree.clone(),
                |mut tree| refine(&mut tree).unwrap(),
                BatchSize::LargeInput,
            );
        });
    }
}

fn wire(c: &mut Criterion) {
    let tree = random_tree(100_000);
    let bytes = usher::save(&tree);
    c.bench_function("load 100000", |b| b.iter(|| usher::load(&bytes).unwrap()));
    c.bench_function("lineage mutations 100000", |b| {
        b.iter(|| usher::lineage_mutations(&tree))
    });
}

criterion_group!(regression, pruning, refinement);
criterion_group! {
    name = reporting;
    config = Criterion::default().sample_size(10);
    targets = wire
}
criterion_main!(regression, reporting);
