/// Snapshot intervals skipped between two fine-grained coverage passes.
pub const DEFAULT_COVERAGE_SKIP: u32 = 2;

///
/// Gates expensive per-base work to one out of every `skip + 1` snapshot intervals.
///
/// The cycle is ACTIVE while the counter is 0 and in COOLDOWN while it is in `1..=skip`. It moves
/// forward once per snapshot. A skip factor of 0 keeps it permanently active.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyCycle {
    skip: u32,
    counter: u32,
}

impl DutyCycle {
    pub fn new(skip: u32) -> Self {
        DutyCycle { skip, counter: 0 }
    }

    pub fn skip(&self) -> u32 {
        self.skip
    }

    pub fn is_active(&self) -> bool {
        self.counter == 0
    }

    ///
    /// Move to the next snapshot interval. Returns `true` when the next interval is a cooldown.
    ///
    pub fn advance(&mut self) -> bool {
        if self.counter >= self.skip {
            self.counter = 0;
            false
        } else {
            self.counter += 1;
            true
        }
    }
}

impl Default for DutyCycle {
    fn default() -> Self {
        DutyCycle::new(DEFAULT_COVERAGE_SKIP)
    }
}
