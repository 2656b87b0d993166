// Network parameters and consensus rules
// This module defines the consensus parameters shared by block validation and retargeting

use crate::config::Network;
use crate::consensus::deployment::Deployments;
use bitcoin::hashes::Hash;
use bitcoin::pow::Work;
use bitcoin::{BlockHash, Target};

/// Consensus parameters for a specific EZCoin network
#[derive(Debug, Clone)]
pub struct ConsensusParams {
    /// Network these parameters belong to
    pub network: Network,
    /// Hash of the genesis block, verified at construction
    pub hash_genesis_block: BlockHash,
    /// Blocks between subsidy halvings
    pub subsidy_halving_interval: u32,
    /// Height at which BIP34 (height in coinbase) becomes active
    pub bip34_height: u32,
    /// Block hash at `bip34_height`, all zeros when not yet known
    pub bip34_hash: BlockHash,
    /// Height at which BIP65 (CHECKLOCKTIMEVERIFY) becomes active
    pub bip65_height: u32,
    /// Height at which BIP66 (strict DER) becomes active
    pub bip66_height: u32,
    /// Maximum allowed target (minimum difficulty)
    pub pow_limit: Target,
    /// Target timespan for difficulty adjustment in seconds
    pub pow_target_timespan: u32,
    /// Target spacing between blocks in seconds
    pub pow_target_spacing: u32,
    /// Allow minimum difficulty blocks after long gaps
    pub pow_allow_min_difficulty_blocks: bool,
    /// Keep the difficulty fixed at its current value
    pub pow_no_retargeting: bool,
    /// Signalling blocks needed inside one confirmation window
    pub rule_change_activation_threshold: u32,
    /// Blocks per activation voting period
    pub miner_confirmation_window: u32,
    pub deployments: Deployments,
    /// The best chain should have at least this much work
    pub minimum_chain_work: Work,
    /// Signatures in ancestors of this block are assumed valid; all zeros disables it
    pub default_assume_valid: BlockHash,
}

impl ConsensusParams {
    /// Check if a target is within the network's PoW limit
    pub fn is_target_valid(&self, target: &Target) -> bool {
        *target <= self.pow_limit
    }

    /// Number of blocks between difficulty adjustments
    pub fn difficulty_adjustment_interval(&self) -> u32 {
        self.pow_target_timespan / self.pow_target_spacing
    }

    /// Get the expected time for a difficulty adjustment period
    pub fn expected_timespan(&self) -> u32 {
        self.difficulty_adjustment_interval() * self.pow_target_spacing
    }

    /// Whether `signalling_blocks` out of one confirmation window lock in a change
    pub fn is_activation_threshold_reached(&self, signalling_blocks: u32) -> bool {
        signalling_blocks >= self.rule_change_activation_threshold
    }

    /// Whether the network ships an assume-valid anchor
    pub fn has_assume_valid(&self) -> bool {
        self.default_assume_valid != BlockHash::all_zeros()
    }
}
