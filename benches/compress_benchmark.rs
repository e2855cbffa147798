use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pagegraph::{
    AdjacencyCompressor, AdjacencyCompressorFactory, AdjacencyCursor, AdjacencyImporter, AdjacencyList,
    Aggregation, BuildConfig, CompressionKind, ConfiguredCompressorFactory, Targets,
};

const NODES: usize = 10_000;
const EDGES_PER_NODE: usize = 50;

fn adjacency() -> Vec<Vec<u64>> {
    // Pseudo-random edges
    (0..NODES)
        .map(|i| {
            (0..EDGES_PER_NODE)
                .map(|j| ((i + j * 17) % NODES) as u64)
                .collect()
        })
        .collect()
}

fn config(kind: CompressionKind) -> BuildConfig {
    BuildConfig::new(NODES as u64)
        .with_compression(kind)
        .with_aggregation(Aggregation::Single)
}

fn bench_compress(c: &mut Criterion) {
    let adjacency = adjacency();
    let mut group = c.benchmark_group("compress");
    for kind in [CompressionKind::Uncompressed, CompressionKind::DeltaVarLong] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{kind:?}")), &kind, |b, &kind| {
            b.iter(|| {
                let factory = ConfiguredCompressorFactory::new(&config(kind)).unwrap();
                {
                    let mut compressor = factory.create_compressor();
                    for (node, targets) in adjacency.iter().enumerate() {
                        compressor.compress(node as u64, Targets::Raw(targets), &[]).unwrap();
                    }
                }
                black_box(factory.build());
            });
        });
    }
    group.finish();
}

fn bench_import_with_weights(c: &mut Criterion) {
    let adjacency = adjacency();
    let config = config(CompressionKind::DeltaVarLong).with_property_aggregations([Aggregation::Sum]);

    c.bench_function("import_weighted_delta_var_long", |b| {
        b.iter(|| {
            let mut importer = AdjacencyImporter::new(config.clone()).unwrap();
            for (node, targets) in adjacency.iter().enumerate() {
                let weights: Vec<u64> = targets.iter().map(|&t| (t as f64).to_bits()).collect();
                importer.add_targets(node as u64, targets, &[&weights]).unwrap();
            }
            black_box(importer.build().unwrap());
        });
    });
}

fn bench_cursor(c: &mut Criterion) {
    let adjacency = adjacency();
    let mut group = c.benchmark_group("cursor_scan");
    for kind in [CompressionKind::Uncompressed, CompressionKind::DeltaVarLong] {
        let factory = ConfiguredCompressorFactory::new(&config(kind)).unwrap();
        {
            let mut compressor = factory.create_compressor();
            for (node, targets) in adjacency.iter().enumerate() {
                compressor.compress(node as u64, Targets::Raw(targets), &[]).unwrap();
            }
        }
        let lists = factory.build();

        group.bench_function(BenchmarkId::from_parameter(format!("{kind:?}")), |b| {
            b.iter(|| {
                let mut sum = 0u64;
                for node in 0..NODES as u64 {
                    let mut cursor = lists.adjacency.adjacency_cursor(node);
                    for target in cursor.by_ref() {
                        sum = sum.wrapping_add(target);
                    }
                    black_box(cursor.remaining());
                }
                black_box(sum)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_import_with_weights, bench_cursor);
criterion_main!(benches);
