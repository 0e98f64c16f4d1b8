use bamstats_core::models::{AlignmentRecord, ReferenceTable};

use crate::snapshot::Snapshot;
use crate::tree::StatCollector;

///
/// Scalar read counters derived from alignment flags.
///
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadCounts {
    pub total: u64,
    pub mapped: u64,
    pub forward_strand: u64,
    pub reverse_strand: u64,
    pub failed_qc: u64,
    pub duplicate: u64,
    pub paired: u64,
    pub proper_pair: u64,
    pub both_mates_mapped: u64,
    pub first_mate: u64,
    pub second_mate: u64,
    pub singleton: u64,
}

///
/// Counts reads by flag: totals, strand, pairing and mate status.
///
#[derive(Debug, Clone, Default)]
pub struct CounterCollector {
    counts: ReadCounts,
}

impl CounterCollector {
    pub fn new() -> Self {
        CounterCollector::default()
    }

    pub fn counts(&self) -> &ReadCounts {
        &self.counts
    }
}

impl StatCollector for CounterCollector {
    fn process_alignment(&mut self, record: &AlignmentRecord, _refs: &ReferenceTable) {
        let counts = &mut self.counts;
        counts.total += 1;

        // pairing-independent flags
        if record.is_duplicate {
            counts.duplicate += 1;
        }
        if record.is_failed_qc {
            counts.failed_qc += 1;
        }
        if record.is_mapped {
            counts.mapped += 1;
        }

        if record.is_reverse_strand {
            counts.reverse_strand += 1;
        } else {
            counts.forward_strand += 1;
        }

        if !record.is_paired {
            return;
        }

        counts.paired += 1;
        if record.is_first_mate {
            counts.first_mate += 1;
        }
        if record.is_second_mate {
            counts.second_mate += 1;
        }

        if record.is_mapped {
            if record.is_mate_mapped {
                counts.both_mates_mapped += 1;
            } else {
                counts.singleton += 1;
            }
        }

        // checked regardless of mapped status
        if record.is_proper_pair {
            counts.proper_pair += 1;
        }
    }

    fn append_snapshot(&mut self, snapshot: &mut Snapshot) {
        let counts = &self.counts;
        snapshot.insert("total_reads", counts.total);
        snapshot.insert("paired_end_reads", counts.paired);
        snapshot.insert("proper_pairs", counts.proper_pair);
        snapshot.insert("mapped_reads", counts.mapped);
        snapshot.insert("both_mates_mapped", counts.both_mates_mapped);
        snapshot.insert("forward_strands", counts.forward_strand);
        snapshot.insert("reverse_strands", counts.reverse_strand);
        snapshot.insert("first_mates", counts.first_mate);
        snapshot.insert("second_mates", counts.second_mate);
        snapshot.insert("singletons", counts.singleton);
        snapshot.insert("failed_qc", counts.failed_qc);
        snapshot.insert("duplicates", counts.duplicate);
    }
}
