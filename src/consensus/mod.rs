// Consensus rules and parameters
// This module provides consensus-related parameters for EZCoin networks

pub mod checkpoints;
pub mod deployment;
pub mod params;

pub use checkpoints::{ChainTxData, Checkpoints};
pub use deployment::{Deployment, DeploymentPos, DeploymentWindow, Deployments};
pub use params::ConsensusParams;
