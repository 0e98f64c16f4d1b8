use std::path::Path;
use std::str::FromStr;

use bamstats_core::models::GenomicRegion;
use serde_json::{Map, Value};

use crate::errors::{RegionIndexError, Result};

const NAME_KEYS: [&str; 2] = ["name", "chr"];

/// Largest position a BAM record can carry.
pub const MAX_POSITION: i64 = i32::MAX as i64;

///
/// An immutable, ordered collection of regions of interest.
///
/// Lookups scan the regions in payload order and return the first match. Overlapping regions are
/// allowed but make the result depend on that order; see [`RegionIndex::overlapping_pairs`].
///
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionIndex {
    regions: Vec<GenomicRegion>,
}

impl RegionIndex {
    ///
    /// Parse a JSON array of `{name, start, end}` objects.
    ///
    pub fn from_json(payload: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(payload)?;
        let items = root.as_array().ok_or(RegionIndexError::RootNotArray)?;

        let regions = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_region(index, item))
            .collect::<Result<Vec<_>>>()?;

        Ok(RegionIndex { regions })
    }

    ///
    /// Read and parse a region payload from disk.
    ///
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let payload = std::fs::read_to_string(path)?;
        Self::from_json(&payload)
    }

    ///
    /// Find the first region containing `pos` on reference `name`.
    ///
    pub fn locate(&self, name: &str, pos: i64) -> Option<&GenomicRegion> {
        self.regions.iter().find(|region| region.contains(name, pos))
    }

    ///
    /// Index pairs `(i, j)`, `i < j`, of configured regions that share at least one position.
    ///
    pub fn overlapping_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.regions.iter().enumerate() {
            for (j, b) in self.regions.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    pub fn regions(&self) -> &[GenomicRegion] {
        &self.regions
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl FromStr for RegionIndex {
    type Err = RegionIndexError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_json(s)
    }
}

impl From<Vec<GenomicRegion>> for RegionIndex {
    fn from(regions: Vec<GenomicRegion>) -> Self {
        RegionIndex { regions }
    }
}

fn parse_region(index: usize, item: &Value) -> Result<GenomicRegion> {
    let object = item
        .as_object()
        .ok_or(RegionIndexError::ItemNotObject { index })?;

    let name = NAME_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .and_then(Value::as_str)
        .ok_or(RegionIndexError::UnexpectedFieldType {
            index,
            field: "name",
        })?;

    let start = integer_field(object, index, "start")?;
    let end = integer_field(object, index, "end")?;

    if start < 0 || end < start || end > MAX_POSITION {
        return Err(RegionIndexError::InvalidSpan { index, start, end });
    }

    Ok(GenomicRegion::new(name, start, end))
}

// a missing field fails the same type check as a mistyped one
fn integer_field(object: &Map<String, Value>, index: usize, field: &'static str) -> Result<i64> {
    object
        .get(field)
        .and_then(Value::as_i64)
        .ok_or(RegionIndexError::UnexpectedFieldType { index, field })
}
