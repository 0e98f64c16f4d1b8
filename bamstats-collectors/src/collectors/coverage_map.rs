use bamstats_core::models::{AlignmentRecord, ReferenceTable};

use crate::snapshot::Snapshot;
use crate::tree::StatCollector;

const MAP_BINS: usize = 256;

///
/// Coarse coverage map of one window, split into 256 equal bins.
///
/// Only reads that start inside the window are mapped. `read_depth` counts them by the bin their
/// start falls in; `base_coverage` counts each of their aligned bases that lands inside the window.
/// Input is assumed to come from a single reference.
///
#[derive(Debug, Clone)]
pub struct CoverageMapCollector {
    start: i64,
    end: i64,
    length: u64,
    read_depth: [u64; MAP_BINS],
    base_coverage: [u64; MAP_BINS],
}

impl CoverageMapCollector {
    ///
    /// Map the window `[start, start + length]`. Returns `None` for an empty window or one whose
    /// end does not fit in an `i64` position.
    ///
    pub fn new(start: i64, length: u64) -> Option<Self> {
        if length == 0 {
            return None;
        }
        let end = i64::try_from(length)
            .ok()
            .and_then(|length| start.checked_add(length))?;

        Some(CoverageMapCollector {
            start,
            end,
            length,
            read_depth: [0; MAP_BINS],
            base_coverage: [0; MAP_BINS],
        })
    }

    fn bin(&self, pos: i64) -> usize {
        let fraction = (pos - self.start) as f64 / self.length as f64;
        ((fraction * MAP_BINS as f64) as usize).min(MAP_BINS - 1)
    }
}

impl StatCollector for CoverageMapCollector {
    fn process_alignment(&mut self, record: &AlignmentRecord, _refs: &ReferenceTable) {
        let Some(end) = record.end_position() else {
            return;
        };
        if record.position < self.start || record.position > self.end {
            return;
        }

        let bin = self.bin(record.position);
        self.read_depth[bin] += 1;

        for pos in record.position..=end.min(self.end) {
            let bin = self.bin(pos);
            self.base_coverage[bin] += 1;
        }
    }

    fn append_snapshot(&mut self, snapshot: &mut Snapshot) {
        snapshot.insert_counts("base_coverage", non_zero(&self.base_coverage));
        snapshot.insert_counts("read_depth", non_zero(&self.read_depth));
    }
}

fn non_zero(bins: &[u64]) -> impl Iterator<Item = (usize, u64)> + '_ {
    bins.iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(bin, count)| (bin, *count))
}
