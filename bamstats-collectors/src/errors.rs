use thiserror::Error;

use crate::tree::CollectorId;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorTreeError {
    #[error("Collector {0} is not registered in this tree")]
    UnknownCollector(CollectorId),

    #[error("Attaching collector {child} under {parent} would create a cycle")]
    Cycle {
        parent: CollectorId,
        child: CollectorId,
    },
}

pub type Result<T> = std::result::Result<T, CollectorTreeError>;
