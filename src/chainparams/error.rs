// Error types for chain parameter construction and selection

use crate::config::Network;
use crate::consensus::DeploymentPos;
use bitcoin::{BlockHash, TxMerkleNode};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainParamsError {
    #[error("Unknown chain {0}")]
    UnknownNetwork(String),
    #[error("Unknown deployment {0}")]
    UnknownDeployment(String),
    #[error("Genesis merkle root mismatch on {network}: expected {expected}, derived {derived}")]
    GenesisMerkleRootMismatch {
        network: Network,
        expected: TxMerkleNode,
        derived: TxMerkleNode,
    },
    #[error("Genesis block hash mismatch on {network}: expected {expected}, derived {derived}")]
    GenesisHashMismatch {
        network: Network,
        expected: BlockHash,
        derived: BlockHash,
    },
    #[error("Checkpoint at height {height} does not follow height {previous}")]
    CheckpointOrder { previous: u32, height: u32 },
    #[error("Deployments {first:?} and {second:?} signal on bit {bit} with overlapping windows")]
    DeploymentConflict {
        bit: u8,
        first: DeploymentPos,
        second: DeploymentPos,
    },
    #[error("Deployment {deployment:?} uses bit {bit}, outside the version-bits range")]
    InvalidDeploymentBit { deployment: DeploymentPos, bit: u8 },
    #[error("Deployment {deployment:?} starts after it times out")]
    InvalidDeploymentWindow { deployment: DeploymentPos },
    #[error("Network {selected} already selected, cannot switch to {requested}")]
    AlreadySelected { selected: Network, requested: Network },
    #[error("Chain parameters are frozen after selection")]
    RegistryFrozen,
}
