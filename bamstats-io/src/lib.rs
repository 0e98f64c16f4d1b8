//! # Alignment input and snapshot output for bamstats-alive
//!
//! This crate sits between the outside world and the collectors. [`AlignmentReader`] streams a BAM
//! file (or stdin) through `noodles` and converts every record into the
//! [`AlignmentRecord`](bamstats_core::models::AlignmentRecord) the collectors understand.
//! [`SnapshotWriter`] goes the other way, writing one compact JSON object per line.
//!
//! ```rust,no_run
//! use bamstats_collectors::{CollectorTree, CounterCollector};
//! use bamstats_io::{SnapshotWriter, open_alignments};
//!
//! let mut reader = open_alignments("sample.bam").unwrap();
//! let refs = reader.references().clone();
//! let mut tree = CollectorTree::new(CounterCollector::new());
//!
//! while let Some(record) = reader.read_next().unwrap() {
//!     tree.process(&record, &refs);
//! }
//!
//! SnapshotWriter::stdout().write_snapshot(&tree.snapshot()).unwrap();
//! ```
pub mod errors;
pub mod reader;
pub mod writer;

pub use errors::{BamReadError, Result};
pub use reader::{AlignmentReader, STDIN_PATH, open_alignments, reference_table, to_alignment_record};
pub use writer::{SnapshotWriter, StatusMessage};
