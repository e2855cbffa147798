use pagegraph::codec::{
    decode_delta_vlongs, decode_vlong, encode_delta_vlongs, encode_vlong, encoded_vlong_size, zig_zag,
    zig_zag_decode,
};
use pagegraph::{
    AdjacencyCompressor, AdjacencyCompressorFactory, AdjacencyList, Aggregation, BuildConfig,
    CompressionKind, ConfiguredCompressorFactory, Targets,
};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn policy() -> impl Strategy<Value = Aggregation> {
    prop_oneof![
        Just(Aggregation::Single),
        Just(Aggregation::Sum),
        Just(Aggregation::Min),
        Just(Aggregation::Max),
        Just(Aggregation::Count),
    ]
}

fn kind() -> impl Strategy<Value = CompressionKind> {
    prop_oneof![Just(CompressionKind::Uncompressed), Just(CompressionKind::DeltaVarLong)]
}

proptest! {
    #[test]
    fn vlong_round_trip(value in any::<u64>()) {
        let mut out = Vec::new();
        let written = encode_vlong(value, &mut out);
        prop_assert_eq!(written, encoded_vlong_size(value));
        prop_assert_eq!(decode_vlong(&out).unwrap(), (value, written));
    }

    #[test]
    fn zig_zag_round_trip(value in any::<i64>()) {
        prop_assert_eq!(zig_zag_decode(zig_zag(value)), value);
    }

    #[test]
    fn delta_stream_round_trip(values in proptest::collection::vec(any::<u64>(), 0..200)) {
        let mut bytes = Vec::new();
        let written = encode_delta_vlongs(&values, &mut bytes);
        let mut out = vec![0; values.len()];
        prop_assert_eq!(decode_delta_vlongs(&bytes, values.len(), &mut out).unwrap(), written);
        prop_assert_eq!(out, values);
    }

    #[test]
    fn topology_is_sorted_and_deduplicated(
        targets in proptest::collection::vec(0u64..500, 0..300),
        keep_parallel in any::<bool>(),
        kind in kind(),
    ) {
        let aggregation = if keep_parallel { Aggregation::None } else { Aggregation::Single };
        let config = BuildConfig::new(1).with_compression(kind).with_aggregation(aggregation);
        let factory = ConfiguredCompressorFactory::new(&config).unwrap();
        let degree = factory.create_compressor().compress(0, Targets::Raw(&targets), &[]).unwrap();

        let mut expected = targets.clone();
        expected.sort_unstable();
        if !keep_parallel {
            expected.dedup();
        }
        let lists = factory.build();
        let read: Vec<u64> = lists.adjacency.adjacency_cursor(0).collect();
        prop_assert_eq!(degree as usize, expected.len());
        prop_assert_eq!(read, expected);
    }

    #[test]
    fn properties_follow_their_targets(
        edges in proptest::collection::vec((0u64..40, -1_000i32..1_000), 0..120),
        aggregation in policy(),
    ) {
        let targets: Vec<u64> = edges.iter().map(|&(target, _)| target).collect();
        let weights: Vec<u64> = edges.iter().map(|&(_, w)| f64::from(w).to_bits()).collect();

        let config = BuildConfig::new(1).with_property_aggregations([aggregation]);
        let factory = ConfiguredCompressorFactory::new(&config).unwrap();
        factory.create_compressor().compress(0, Targets::Raw(&targets), &[&weights]).unwrap();
        let lists = factory.build();

        let mut model: BTreeMap<u64, f64> = BTreeMap::new();
        for &(target, weight) in &edges {
            let weight = aggregation.normalize(f64::from(weight));
            model
                .entry(target)
                .and_modify(|running| *running = aggregation.merge(*running, weight))
                .or_insert(weight);
        }

        let read: Vec<u64> = lists.adjacency.adjacency_cursor(0).collect();
        let values: Vec<f64> = lists.properties[0].values(0).iter().map(|&v| f64::from_bits(v)).collect();
        prop_assert_eq!(read, model.keys().copied().collect::<Vec<_>>());
        prop_assert_eq!(values, model.values().copied().collect::<Vec<_>>());
    }
}
