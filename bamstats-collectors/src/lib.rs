//! Incremental statistics over a stream of alignment records.
//!
//! Collectors are organised in a [`CollectorTree`]: every record handed to the tree is processed by
//! the root and then forwarded, depth first and in registration order, to every child. A snapshot
//! walks the tree in the same order and lets every collector write its fields into one shared
//! [`Snapshot`] object.
//!
//! The shipped collectors are:
//!
//! - [`CounterCollector`]: scalar flag counters (total, mapped, paired, ...)
//! - [`DistributionCollector`]: mapping/base quality, read length, fragment length and per-reference
//!   histograms, plus a duty-cycled, region-scoped coverage histogram
//! - [`CoverageMapCollector`]: a fixed 256-bin read and base coverage map over one window
//!
//! ## Quick Start
//!
//! ```rust
//! use bamstats_collectors::{CollectorTree, CounterCollector, DistributionCollector};
//! use bamstats_core::models::{AlignmentRecord, ReferenceTable};
//!
//! let mut tree = CollectorTree::new(CounterCollector::default());
//! let root = tree.root();
//! tree.attach(root, DistributionCollector::default()).unwrap();
//!
//! let refs = ReferenceTable::from(vec!["chr1".to_string()]);
//! let record = AlignmentRecord {
//!     ref_id: Some(0),
//!     position: 100,
//!     length: 50,
//!     mapping_quality: 60,
//!     is_mapped: true,
//!     ..Default::default()
//! };
//! tree.process(&record, &refs);
//!
//! let snapshot = tree.snapshot();
//! assert_eq!(snapshot["total_reads"], 1);
//! assert_eq!(snapshot["mapq_hist"]["60"], 1);
//! ```

/// The shipped collectors.
pub mod collectors;

/// Per-region coverage tracking and the cumulative coverage histogram.
pub mod coverage;

/// Errors raised while wiring a collector tree.
pub mod errors;

/// Trailing-window convergence monitors.
pub mod monitors;

/// The shared snapshot object collectors write into.
pub mod snapshot;

/// The collector trait and the tree that dispatches records to collectors.
pub mod tree;

// re-exports
pub use self::collectors::{
    CounterCollector, CoverageMapCollector, DEFAULT_COVERAGE_SKIP, DistributionCollector,
    DutyCycle, ReadCounts,
};
pub use self::coverage::{CoverageHistogram, RegionCoverageTracker};
pub use self::errors::{CollectorTreeError, Result};
pub use self::monitors::{
    ChangeMonitor, ConvergenceMonitor, DeltaAverageRatioMonitor, MonitoredCollector,
    StandardDeviationMonitor,
};
pub use self::snapshot::Snapshot;
pub use self::tree::{CollectorId, CollectorTree, CompositeCollector, StatCollector};
