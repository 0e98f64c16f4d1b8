use std::collections::BTreeMap;
use std::sync::Arc;

use bamstats_core::models::{AlignmentRecord, GenomicRegion, ReferenceTable};
use bamstats_regions::RegionIndex;
use log::debug;

use crate::collectors::duty_cycle::DutyCycle;
use crate::coverage::{CoverageHistogram, RegionCoverageTracker};
use crate::snapshot::Snapshot;
use crate::tree::StatCollector;

const MAPQ_BINS: usize = 256;

/// Base qualities above this value share the last bucket.
pub const MAX_BASE_QUALITY: u8 = 50;

///
/// Histogram statistics: mapping quality, base quality, read length, fragment length, reads per
/// reference and, when regions are configured, per-base coverage within those regions.
///
/// Base-quality and coverage tracking are the expensive part and are gated by a [`DutyCycle`]:
/// they run during one snapshot interval, then sit out `skip` intervals. Any region being tracked
/// when a cooldown starts is folded into the cumulative coverage histogram and re-detected on the
/// next active interval.
///
#[derive(Debug, Clone)]
pub struct DistributionCollector {
    mapq_hist: [u64; MAPQ_BINS],
    baseq_hist: [u64; MAX_BASE_QUALITY as usize + 1],
    length_hist: BTreeMap<u32, u64>,
    frag_hist: BTreeMap<i32, u64>,
    ref_aln_hist: BTreeMap<String, u64>,

    coverage: CoverageHistogram,
    regions: Option<Arc<RegionIndex>>,
    tracker: Option<RegionCoverageTracker>,
    duty_cycle: DutyCycle,
}

impl Default for DistributionCollector {
    fn default() -> Self {
        DistributionCollector {
            mapq_hist: [0; MAPQ_BINS],
            baseq_hist: [0; MAX_BASE_QUALITY as usize + 1],
            length_hist: BTreeMap::new(),
            frag_hist: BTreeMap::new(),
            ref_aln_hist: BTreeMap::new(),
            coverage: CoverageHistogram::new(),
            regions: None,
            tracker: None,
            duty_cycle: DutyCycle::default(),
        }
    }
}

impl DistributionCollector {
    pub fn new() -> Self {
        DistributionCollector::default()
    }

    ///
    /// Track per-base coverage within these regions.
    ///
    pub fn with_regions(mut self, regions: Arc<RegionIndex>) -> Self {
        self.regions = Some(regions);
        self
    }

    ///
    /// Number of snapshot intervals to skip between fine-grained passes. 0 disables duty cycling.
    ///
    pub fn with_coverage_skip(mut self, skip: u32) -> Self {
        self.duty_cycle = DutyCycle::new(skip);
        self
    }

    ///
    /// Histogram of regions already left behind. Excludes the region currently tracked.
    ///
    pub fn finalized_coverage(&self) -> &CoverageHistogram {
        &self.coverage
    }

    ///
    /// Finalized regions plus the current state of the region being tracked.
    ///
    pub fn effective_coverage(&self) -> CoverageHistogram {
        let mut coverage = self.coverage.clone();
        if let Some(tracker) = &self.tracker {
            tracker.merge_into(&mut coverage);
        }
        coverage
    }

    pub fn tracked_region(&self) -> Option<&GenomicRegion> {
        self.tracker.as_ref().map(RegionCoverageTracker::region)
    }

    pub fn duty_cycle(&self) -> &DutyCycle {
        &self.duty_cycle
    }

    fn track_base_qualities(&mut self, record: &AlignmentRecord) {
        for quality in record.phred_scores() {
            self.baseq_hist[quality.min(MAX_BASE_QUALITY) as usize] += 1;
        }
    }

    fn track_coverage(&mut self, record: &AlignmentRecord, refs: &ReferenceTable) {
        let Some(regions) = self.regions.as_deref() else {
            return;
        };
        let Some(name) = refs.name(record.ref_id) else {
            return;
        };

        let located = regions.locate(name, record.position).or_else(|| {
            record
                .end_position()
                .and_then(|end| regions.locate(name, end))
        });

        let entered = located
            .filter(|region| {
                self.tracker
                    .as_ref()
                    .is_none_or(|tracker| tracker.region() != *region)
            })
            .cloned();

        if let Some(region) = entered {
            self.finalize_tracker();
            debug!("Tracking coverage over {}", region);
            self.tracker = Some(RegionCoverageTracker::new(region));
        }

        if let Some(tracker) = self.tracker.as_mut() {
            tracker.record(name, record);
        }
    }

    fn finalize_tracker(&mut self) {
        if let Some(tracker) = self.tracker.take() {
            let region = tracker.region().to_string();
            let counted = tracker.finalize(&mut self.coverage);
            debug!("Finalized coverage over {} ({} positions)", region, counted);
        }
    }
}

impl StatCollector for DistributionCollector {
    fn process_alignment(&mut self, record: &AlignmentRecord, refs: &ReferenceTable) {
        if let Some(name) = refs.name(record.ref_id) {
            match self.ref_aln_hist.get_mut(name) {
                Some(count) => *count += 1,
                None => {
                    self.ref_aln_hist.insert(name.to_string(), 1);
                }
            }
        }

        self.mapq_hist[record.mapping_quality as usize] += 1;
        *self.length_hist.entry(record.length).or_insert(0) += 1;

        if record.is_paired
            && record.is_mapped
            && record.is_mate_mapped
            && record.mate_is_downstream()
        {
            *self.frag_hist.entry(record.insert_size).or_insert(0) += 1;
        }

        if self.duty_cycle.is_active() {
            self.track_base_qualities(record);
            self.track_coverage(record, refs);
        }
    }

    fn append_snapshot(&mut self, snapshot: &mut Snapshot) {
        snapshot.insert_counts("mapq_hist", non_zero(&self.mapq_hist));
        snapshot.insert_counts("baseq_hist", non_zero(&self.baseq_hist));
        snapshot.insert_counts("length_hist", self.length_hist.iter().map(|(k, v)| (k, *v)));
        snapshot.insert_counts("frag_hist", self.frag_hist.iter().map(|(k, v)| (k, *v)));
        snapshot.insert_counts("refAln_hist", self.ref_aln_hist.iter().map(|(k, v)| (k, *v)));
        snapshot.insert_fractions("coverage_hist", self.effective_coverage().fractions());

        if self.duty_cycle.advance() {
            self.finalize_tracker();
        }
        debug!(
            "Fine-grained coverage {} for the next interval",
            if self.duty_cycle.is_active() {
                "active"
            } else {
                "paused"
            }
        );
    }
}

fn non_zero(buckets: &[u64]) -> impl Iterator<Item = (usize, u64)> + '_ {
    buckets
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(label, count)| (label, *count))
}
