use pagegraph::{
    AdjacencyCompressor, AdjacencyCompressorFactory, AdjacencyCursor, AdjacencyImporter,
    AdjacencyList, Aggregation, BuildConfig, BuildError, CompressionKind,
    ConfiguredCompressorFactory, Targets,
};

fn bits(values: &[f64]) -> Vec<u64> {
    values.iter().map(|v| v.to_bits()).collect()
}

#[test]
fn four_node_graph_with_three_channels() -> anyhow::Result<()> {
    let (a, b, c, d) = (0u64, 1, 2, 3);
    for kind in [CompressionKind::Uncompressed, CompressionKind::DeltaVarLong] {
        let config = BuildConfig::new(4)
            .with_compression(kind)
            .with_property_aggregations([Aggregation::Single; 3]);
        let mut importer = AdjacencyImporter::new(config)?;
        importer.add_relationship(a, b, &[42.0, 84.0, 1337.0])?;
        importer.add_relationship(b, a, &[1.0, 2.0, 3.0])?;
        importer.add_relationship(b, c, &[4.0, 5.0, 6.0])?;
        importer.add_relationship(a, a, &[4.0, 5.0, 6.0])?;

        let result = importer.build()?;
        let lists = &result.lists;
        assert_eq!(result.relationship_count, 4);
        assert_eq!(lists.adjacency.degree(a), 2);
        assert_eq!(lists.adjacency.degree(d), 0);

        let neighbors: Vec<u64> = lists.adjacency.adjacency_cursor(a).collect();
        assert_eq!(neighbors, vec![a, b]);

        let row = |position: usize| -> Vec<f64> {
            lists
                .properties
                .iter()
                .map(|channel| f64::from_bits(channel.values(a)[position]))
                .collect()
        };
        assert_eq!(row(0), vec![4.0, 5.0, 6.0]);
        assert_eq!(row(1), vec![42.0, 84.0, 1337.0]);
    }
    Ok(())
}

#[test]
fn config_from_json_drives_the_build() -> anyhow::Result<()> {
    let config = BuildConfig::from_json(
        r#"{
            "node_count": 3,
            "compression": "delta_var_long",
            "property_aggregations": ["MAX"],
            "page_shift": 6
        }"#,
    )?;
    let factory = ConfiguredCompressorFactory::new(&config)?;
    assert_eq!(factory.kind(), CompressionKind::DeltaVarLong);
    assert_eq!(factory.property_count(), 1);

    let weights = bits(&[0.5, 7.0, 3.0]);
    factory
        .create_compressor()
        .compress(2, Targets::Raw(&[1, 1, 0]), &[&weights])?;

    let lists = factory.build();
    let mut cursor = lists.properties[0].property_cursor(2);
    assert_eq!(cursor.remaining(), 2);
    assert_eq!(cursor.next_f64(), Some(3.0));
    assert_eq!(cursor.next_f64(), Some(7.0));
    assert_eq!(cursor.next_f64(), None);
    Ok(())
}

#[test]
fn count_and_min_policies() -> anyhow::Result<()> {
    let config = BuildConfig::new(2).with_property_aggregations([Aggregation::Count, Aggregation::Min]);
    let mut importer = AdjacencyImporter::new(config)?;
    for weight in [9.0, 2.0, 4.0] {
        importer.add_relationship(0, 1, &[weight, weight])?;
    }
    importer.add_relationship(0, 0, &[8.0, 8.0])?;

    let lists = importer.build()?.lists;
    assert_eq!(lists.properties[0].values(0), bits(&[1.0, 3.0]).as_slice());
    assert_eq!(lists.properties[1].values(0), bits(&[8.0, 2.0]).as_slice());
    Ok(())
}

#[test]
fn mixed_none_is_rejected() {
    let config = BuildConfig::new(2).with_property_aggregations([Aggregation::None, Aggregation::Sum]);
    assert!(matches!(
        ConfiguredCompressorFactory::new(&config),
        Err(BuildError::MixedAggregation(_))
    ));
}

#[test]
fn importer_reports_bad_targets() {
    let mut importer = AdjacencyImporter::new(BuildConfig::new(2)).unwrap();
    assert_eq!(
        importer.add_targets(0, &[1, 2], &[]),
        Err(BuildError::NodeOutOfRange { node: 2, node_count: 2 })
    );
    assert_eq!(importer.staged_relationships(), 0);
}

#[test]
fn cursor_intersection() {
    let config = BuildConfig::new(64).with_compression(CompressionKind::DeltaVarLong);
    let mut importer = AdjacencyImporter::new(config).unwrap();
    let evens: Vec<u64> = (0..64).step_by(2).collect();
    let threes: Vec<u64> = (0..64).step_by(3).collect();
    importer.add_targets(0, &evens, &[]).unwrap();
    importer.add_targets(1, &threes, &[]).unwrap();
    let adjacency = importer.build().unwrap().lists.adjacency;

    let mut left = adjacency.adjacency_cursor(0);
    let mut right = adjacency.adjacency_cursor(1);
    let mut common = Vec::new();
    let (mut x, mut y) = (left.next(), right.next());
    while let (Some(l), Some(r)) = (x, y) {
        if l == r {
            common.push(l);
            x = left.next();
            y = right.next();
        } else if l < r {
            x = left.advance_to(r);
        } else {
            y = right.advance_to(l);
        }
    }
    assert_eq!(common, (0..64).step_by(6).collect::<Vec<u64>>());
}
