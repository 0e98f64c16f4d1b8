use std::fmt::{self, Display};

///
/// A named genomic interval. Both `start` and `end` are inclusive.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone)]
pub struct GenomicRegion {
    name: String,
    start: i64,
    end: i64,
}

impl GenomicRegion {
    pub fn new(name: impl Into<String>, start: i64, end: i64) -> Self {
        GenomicRegion {
            name: name.into(),
            start,
            end,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    ///
    /// Number of positions covered by the region. Inverted bounds cover nothing; the count saturates
    /// at `usize::MAX`.
    ///
    pub fn len(&self) -> usize {
        let span = i128::from(self.end) - i128::from(self.start) + 1;
        usize::try_from(span.max(0)).unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    ///
    /// Whether `pos` on reference `name` falls within the region.
    ///
    pub fn contains(&self, name: &str, pos: i64) -> bool {
        self.name == name && self.start <= pos && pos <= self.end
    }

    ///
    /// Whether the inclusive span `[start, end]` on `name` shares at least one position with the region.
    ///
    pub fn intersects(&self, name: &str, start: i64, end: i64) -> bool {
        self.name == name && start <= self.end && end >= self.start
    }

    ///
    /// Whether two regions share at least one position.
    ///
    pub fn overlaps(&self, other: &GenomicRegion) -> bool {
        self.intersects(&other.name, other.start, other.end)
    }
}

impl Display for GenomicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.name, self.start, self.end)
    }
}
