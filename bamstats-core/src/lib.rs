//! Core models shared by the bamstats-alive crates.
//!
//! This crate holds the plain data types that flow through the statistics engine:
//!
//! - [`AlignmentRecord`]: one read's mapping result, decoupled from any particular BAM library
//! - [`ReferenceTable`]: the reference id to reference name lookup taken from the alignment header
//! - [`GenomicRegion`]: a named, inclusive interval used to scope coverage computation
//!
//! # Example
//!
//! ```rust
//! use bamstats_core::models::{AlignmentRecord, GenomicRegion, ReferenceTable};
//!
//! let refs = ReferenceTable::from(vec!["chr1".to_string(), "chr2".to_string()]);
//! let record = AlignmentRecord {
//!     ref_id: Some(0),
//!     position: 150,
//!     length: 100,
//!     is_mapped: true,
//!     ..Default::default()
//! };
//!
//! let region = GenomicRegion::new("chr1", 100, 199);
//! let name = refs.name(record.ref_id).unwrap();
//! assert!(region.contains(name, record.position));
//! ```
pub mod consts;
pub mod models;

// re-exports
pub use self::models::{AlignmentRecord, GenomicRegion, ReferenceTable};
