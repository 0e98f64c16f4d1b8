pub mod record;
pub mod reference;
pub mod region;

// re-export for cleaner imports
pub use self::record::AlignmentRecord;
pub use self::reference::ReferenceTable;
pub use self::region::GenomicRegion;
