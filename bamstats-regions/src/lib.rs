//! Region index for scoping coverage computation.
//!
//! A [`RegionIndex`] is built once, before any alignment is processed, from a JSON payload that
//! lists the regions of interest:
//!
//! ```json
//! [{"name": "11", "start": 1, "end": 10001}, {"name": "11", "start": 13500652, "end": 13510652}]
//! ```
//!
//! Older payloads name the reference with `chr` instead of `name`; both spellings are accepted.
//!
//! ## Quick Start
//!
//! ```rust
//! use bamstats_regions::RegionIndex;
//!
//! let index = RegionIndex::from_json(r#"[{"name":"11","start":1,"end":10001}]"#).unwrap();
//!
//! let region = index.locate("11", 500).expect("position 500 is inside 11:1-10001");
//! assert_eq!(region.end(), 10001);
//!
//! assert!(index.locate("11", 20000).is_none());
//! assert!(!region.contains("11", 12000));
//! ```

/// Errors raised while building a [`RegionIndex`].
pub mod errors;

/// The region index itself.
pub mod index;

// re-exports
pub use self::errors::{RegionIndexError, Result};
pub use self::index::RegionIndex;
