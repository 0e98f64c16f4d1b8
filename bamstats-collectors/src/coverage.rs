use std::collections::BTreeMap;

use bamstats_core::models::{AlignmentRecord, GenomicRegion};

///
/// Number of genomic positions observed at each read depth.
///
/// The sum of all bucket counts always equals [`CoverageHistogram::total`].
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageHistogram {
    counts: BTreeMap<u32, u64>,
    total: u64,
}

impl CoverageHistogram {
    pub fn new() -> Self {
        CoverageHistogram::default()
    }

    ///
    /// Count one position at `depth`.
    ///
    pub fn add(&mut self, depth: u32) {
        *self.counts.entry(depth).or_insert(0) += 1;
        self.total += 1;
    }

    ///
    /// Fold every bucket of `other` into this histogram.
    ///
    pub fn merge(&mut self, other: &CoverageHistogram) {
        for (depth, count) in &other.counts {
            *self.counts.entry(*depth).or_insert(0) += count;
        }
        self.total += other.total;
    }

    pub fn get(&self, depth: u32) -> u64 {
        self.counts.get(&depth).copied().unwrap_or(0)
    }

    ///
    /// Total number of positions counted.
    ///
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u64)> + '_ {
        self.counts.iter().map(|(depth, count)| (*depth, *count))
    }

    ///
    /// Each depth's share of all counted positions, in ascending depth order.
    ///
    pub fn fractions(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        let total = self.total as f64;
        self.iter()
            .map(move |(depth, count)| (depth, count as f64 / total))
    }
}

///
/// Per-base read depth over a single region.
///
/// The tracker lives only while its region is active. [`RegionCoverageTracker::finalize`] consumes
/// it, so a region's positions can be folded into the cumulative histogram exactly once.
///
#[derive(Debug, Clone)]
pub struct RegionCoverageTracker {
    region: GenomicRegion,
    depths: Vec<u32>,
}

impl RegionCoverageTracker {
    pub fn new(region: GenomicRegion) -> Self {
        let depths = vec![0; region.len()];
        RegionCoverageTracker { region, depths }
    }

    pub fn region(&self) -> &GenomicRegion {
        &self.region
    }

    ///
    /// Per-offset depths accumulated so far.
    ///
    pub fn depths(&self) -> &[u32] {
        &self.depths
    }

    ///
    /// Add one to every offset covered by `[position, position + length)` on reference `name`,
    /// clipped to the region. Reads that miss the region are ignored.
    ///
    pub fn record(&mut self, name: &str, record: &AlignmentRecord) {
        let Some(end) = record.end_position() else {
            return;
        };
        if self.depths.is_empty() || !self.region.intersects(name, record.position, end) {
            return;
        }

        let first = (record.position - self.region.start()).max(0) as usize;
        let last = ((end - self.region.start()) as usize).min(self.depths.len() - 1);

        for depth in &mut self.depths[first..=last] {
            *depth = depth.saturating_add(1);
        }
    }

    ///
    /// Bucket the current depths into `histogram` without consuming the tracker.
    ///
    pub fn merge_into(&self, histogram: &mut CoverageHistogram) {
        for depth in &self.depths {
            histogram.add(*depth);
        }
    }

    ///
    /// Fold the region into `histogram` and return the number of positions counted.
    ///
    pub fn finalize(self, histogram: &mut CoverageHistogram) -> u64 {
        self.merge_into(histogram);
        self.depths.len() as u64
    }
}
