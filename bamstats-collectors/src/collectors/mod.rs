pub mod counter;
pub mod coverage_map;
pub mod distribution;
pub mod duty_cycle;

pub use self::counter::{CounterCollector, ReadCounts};
pub use self::coverage_map::CoverageMapCollector;
pub use self::distribution::DistributionCollector;
pub use self::duty_cycle::{DEFAULT_COVERAGE_SKIP, DutyCycle};
