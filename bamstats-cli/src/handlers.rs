use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use log::{debug, info, warn};

use bamstats_collectors::{
    CollectorTree, CounterCollector, CoverageMapCollector, DistributionCollector,
};
use bamstats_core::models::{AlignmentRecord, ReferenceTable};
use bamstats_io::{SnapshotWriter, open_alignments};
use bamstats_regions::RegionIndex;

use crate::config::StatsConfig;
use crate::modulator::RateModulator;

/// Matches items from CLAP args, then streams the input through the collectors
pub fn run_stats(matches: &ArgMatches) -> Result<()> {
    let config = StatsConfig::from_matches(matches)?;
    debug!("Running with {config:?}");

    let regions = load_regions(&config)?;

    let reader = open_alignments(&config.input)
        .with_context(|| format!("Cannot open the specified file '{}'", config.input))?;
    let refs = reader.references().clone();

    let mut tree = build_collector_tree(&config, regions)?;
    let mut writer = SnapshotWriter::stdout();

    let total_reads = process_records(reader, &refs, &mut tree, &mut writer, &config)?;
    info!(
        "Processed {total_reads} reads, wrote {} snapshots",
        writer.lines_written()
    );

    Ok(())
}

///
/// Parse the region payload named by the config, if any.
///
pub fn load_regions(config: &StatsConfig) -> Result<Option<Arc<RegionIndex>>> {
    let index = match (&config.regions, &config.regions_file) {
        (Some(payload), _) => RegionIndex::from_json(payload).context("Invalid region payload")?,
        (None, Some(path)) => RegionIndex::from_path(path)
            .with_context(|| format!("Failed to load regions from {}", path.display()))?,
        (None, None) => return Ok(None),
    };

    let regions = index.regions();
    for (first, second) in index.overlapping_pairs() {
        warn!(
            "Regions {} and {} overlap; shared positions are attributed to {}",
            regions[first], regions[second], regions[first]
        );
    }
    info!("Loaded {} coverage regions", index.len());

    Ok(Some(Arc::new(index)))
}

///
/// Counters at the root with the histogram collector under it, plus the coverage map when a
/// window length is configured.
///
pub fn build_collector_tree(
    config: &StatsConfig,
    regions: Option<Arc<RegionIndex>>,
) -> Result<CollectorTree> {
    let mut tree = CollectorTree::new(CounterCollector::new());
    let root = tree.root();

    let mut distribution = DistributionCollector::new().with_coverage_skip(config.coverage_skip);
    if let Some(regions) = regions {
        distribution = distribution.with_regions(regions);
    }
    tree.attach(root, distribution)?;

    if config.map_length > 0 {
        let Some(coverage_map) = CoverageMapCollector::new(config.map_start, config.map_length)
        else {
            bail!(
                "Coverage map window {}+{} is out of range",
                config.map_start,
                config.map_length
            );
        };
        tree.attach(root, coverage_map)?;
    }

    Ok(tree)
}

///
/// Feed every record through the tree, emitting a snapshot on the configured schedule and once
/// more at end of input. Returns the number of records processed.
///
/// A record that fails to decode stops the run without a final snapshot.
///
pub fn process_records<I, W>(
    records: I,
    refs: &ReferenceTable,
    tree: &mut CollectorTree,
    writer: &mut SnapshotWriter<W>,
    config: &StatsConfig,
) -> Result<u64>
where
    I: IntoIterator<Item = bamstats_io::Result<AlignmentRecord>>,
    W: Write,
{
    let mut update_rate = config.update_rate;
    let mut modulator = config
        .target_interval_ms
        .map(|target| RateModulator::from_millis(target, config.interval_tolerance_ms));
    let mut total_reads: u64 = 0;

    for record in records {
        let record = record?;
        total_reads += 1;
        tree.process(&record, refs);

        let first_update = config.first_update == Some(total_reads);
        if first_update || total_reads % update_rate == 0 {
            writer
                .write_snapshot(&tree.snapshot())
                .context("Failed to write snapshot")?;

            if let Some(modulator) = modulator.as_mut() {
                let rate = modulator.on_snapshot(update_rate);
                if rate != update_rate {
                    debug!("Update rate {update_rate} -> {rate}");
                    update_rate = rate;
                }
            }
        }
    }

    writer
        .write_snapshot(&tree.snapshot())
        .context("Failed to write final snapshot")?;

    Ok(total_reads)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use serde_json::Value;

    use bamstats_io::BamReadError;

    #[fixture]
    fn refs() -> ReferenceTable {
        ReferenceTable::from(vec!["chr1".to_string()])
    }

    fn reads(count: usize) -> Vec<bamstats_io::Result<AlignmentRecord>> {
        (0..count)
            .map(|i| {
                Ok(AlignmentRecord {
                    ref_id: Some(0),
                    position: 100 * i as i64,
                    length: 50,
                    mapping_quality: 60,
                    qualities: vec![b'I'; 50],
                    is_mapped: true,
                    ..Default::default()
                })
            })
            .collect()
    }

    fn run(
        records: Vec<bamstats_io::Result<AlignmentRecord>>,
        refs: &ReferenceTable,
        config: &StatsConfig,
    ) -> (Result<u64>, Vec<Value>) {
        let mut tree = build_collector_tree(config, None).unwrap();
        let mut writer = SnapshotWriter::new(Vec::new());

        let result = process_records(records, refs, &mut tree, &mut writer, config);
        let lines = String::from_utf8(writer.get_ref().clone())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        (result, lines)
    }

    fn totals(lines: &[Value]) -> Vec<u64> {
        lines
            .iter()
            .map(|line| line["total_reads"].as_u64().unwrap())
            .collect()
    }

    #[rstest]
    #[case(None, vec![2, 4, 5])]
    #[case(Some(1), vec![1, 2, 4, 5])]
    #[case(Some(2), vec![2, 4, 5])]
    #[case(Some(9), vec![2, 4, 5])]
    fn test_snapshot_schedule(
        refs: ReferenceTable,
        #[case] first_update: Option<u64>,
        #[case] expected: Vec<u64>,
    ) {
        let config = StatsConfig {
            update_rate: 2,
            first_update,
            ..Default::default()
        };

        let (result, lines) = run(reads(5), &refs, &config);

        assert_eq!(result.unwrap(), 5);
        assert_eq!(totals(&lines), expected);
    }

    #[rstest]
    fn test_empty_input_still_emits_final_snapshot(refs: ReferenceTable) {
        let (result, lines) = run(Vec::new(), &refs, &StatsConfig::default());

        assert_eq!(result.unwrap(), 0);
        assert_eq!(totals(&lines), vec![0]);
    }

    #[rstest]
    fn test_decode_error_stops_without_final_snapshot(refs: ReferenceTable) {
        let mut records = reads(3);
        records.insert(
            2,
            Err(BamReadError::Record {
                index: 3,
                source: io::Error::new(io::ErrorKind::InvalidData, "truncated record"),
            }),
        );
        let config = StatsConfig {
            update_rate: 1,
            ..Default::default()
        };

        let (result, lines) = run(records, &refs, &config);

        assert!(result.is_err());
        assert_eq!(totals(&lines), vec![1, 2]);
    }

    #[rstest]
    fn test_tree_layout() {
        let without_map = build_collector_tree(&StatsConfig::default(), None).unwrap();
        assert_eq!(without_map.len(), 2);

        let config = StatsConfig {
            map_start: 1000,
            map_length: 500,
            ..Default::default()
        };
        let mut with_map = build_collector_tree(&config, None).unwrap();
        assert_eq!(with_map.len(), 3);
        assert!(with_map.snapshot().get("read_depth").is_some());
    }

    #[rstest]
    #[case(i64::MAX, 1)]
    #[case(0, u64::MAX)]
    fn test_map_window_out_of_range(#[case] map_start: i64, #[case] map_length: u64) {
        let config = StatsConfig {
            map_start,
            map_length,
            ..Default::default()
        };

        let err = build_collector_tree(&config, None).unwrap_err();
        assert!(err.to_string().starts_with("Coverage map window"));
    }

    #[rstest]
    fn test_no_regions_configured() {
        assert!(load_regions(&StatsConfig::default()).unwrap().is_none());
    }

    #[rstest]
    fn test_inline_regions_with_legacy_key() {
        let config = StatsConfig {
            regions: Some(r#"[{"chr":"11","start":1,"end":10001}]"#.to_string()),
            ..Default::default()
        };

        let regions = load_regions(&config).unwrap().unwrap();
        assert_eq!(regions.len(), 1);
        assert!(regions.locate("11", 500).is_some());
    }

    #[rstest]
    #[case(r#"{"name":"11"}"#)]
    #[case(r#"[{"name":"11","start":"one","end":10}]"#)]
    #[case("not json")]
    #[case(r#"[{"name":"11","start":10,"end":5}]"#)]
    #[case(r#"[{"name":"11","start":0,"end":4000000000000000000}]"#)]
    fn test_invalid_regions(#[case] payload: &str) {
        let config = StatsConfig {
            regions: Some(payload.to_string()),
            ..Default::default()
        };

        let err = load_regions(&config).unwrap_err();
        assert!(format!("{err:#}").starts_with("Invalid region payload"));
    }
}
