use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use stratum_core::graph::{
    GraphStats, GraphStore, dependency_order, implementation_layers, transitive_dependencies,
};
use stratum_core::plan::ImplementationPlan;

struct Tier {
    name: &'static str,
    nodes: usize,
    fan_out: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "small",
        nodes: 500,
        fan_out: 3,
    },
    Tier {
        name: "medium",
        nodes: 5_000,
        fan_out: 4,
    },
    Tier {
        name: "large",
        nodes: 25_000,
        fan_out: 5,
    },
];

/// Layered synthetic API surface: node `i` depends on `fan_out` lower nodes
/// picked by a fixed linear congruential walk, plus a few back edges so the
/// cycle fallbacks are exercised.
fn synthetic_store(tier: &Tier, seed: u64) -> GraphStore {
    let mut store = GraphStore::new();
    let mut state = seed;
    let mut next = |bound: usize| {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        usize::try_from(state >> 33).unwrap_or(0) % bound.max(1)
    };

    for i in 1..tier.nodes {
        let from = format!("sdk::mod{}::Symbol{i}", i % 17);
        for _ in 0..tier.fan_out {
            let j = next(i);
            store.add_edge(&from, &format!("sdk::mod{}::Symbol{j}", j % 17), None);
        }
        if i % 997 == 0 {
            let back = i + next(tier.nodes - i);
            store.add_edge(&format!("sdk::mod{}::Symbol{back}", back % 17), &from, None);
        }
    }
    store
}

fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis.tiered");

    for tier in &TIERS {
        let store = synthetic_store(tier, 0x5EED_u64 + tier.nodes as u64);
        group.throughput(Throughput::Elements(store.node_count() as u64));

        group.bench_with_input(BenchmarkId::new("order", tier.name), &store, |b, store| {
            b.iter(|| black_box(dependency_order(store)));
        });

        group.bench_with_input(BenchmarkId::new("layers", tier.name), &store, |b, store| {
            b.iter(|| black_box(implementation_layers(store)));
        });

        group.bench_with_input(BenchmarkId::new("stats", tier.name), &store, |b, store| {
            b.iter(|| black_box(GraphStats::from_store(store)));
        });

        let probe = format!("sdk::mod{}::Symbol{}", (tier.nodes - 1) % 17, tier.nodes - 1);
        group.bench_with_input(
            BenchmarkId::new("transitive", tier.name),
            &store,
            |b, store| b.iter(|| black_box(transitive_dependencies(store, &probe))),
        );

        group.bench_with_input(BenchmarkId::new("plan", tier.name), &store, |b, store| {
            b.iter(|| black_box(ImplementationPlan::from_store(store)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_analysis);
criterion_main!(benches);
