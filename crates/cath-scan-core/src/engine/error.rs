use super::config::ConfigError;
use super::res_pair::{RepIndex, StructureIndex};
use super::stride::RoledScanStride;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid scan configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Residue pair in structure {structure_index} uses rep index {rep_index} as both from and to")]
    SameRepIndices {
        structure_index: StructureIndex,
        rep_index: RepIndex,
    },

    #[error("Dense lattice bounds enclose no cells")]
    EmptyRange,

    #[error("Key lies outside the dense lattice it was pushed into")]
    KeyOutOfLattice,

    #[error("The query set and the index were built from different scan policies")]
    PolicyMismatch,

    #[error("Structure data built with {found:?} cannot join data built with {expected:?}")]
    StrideMismatch {
        expected: RoledScanStride,
        found: RoledScanStride,
    },

    #[error("Rep-pair grid of structure {structure_index} holds {found} neighbour lists, expected {expected}")]
    RepSetSizeMismatch {
        structure_index: StructureIndex,
        expected: usize,
        found: usize,
    },

    #[error("Scan was cancelled")]
    Cancelled,

    #[error("Internal logic error: {0}")]
    Internal(String),
}
