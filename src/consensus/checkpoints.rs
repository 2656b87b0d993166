// Checkpoints and chain transaction statistics
// Known-good block hashes used as a fast-sync anchor, plus the sync-progress snapshot

use crate::chainparams::ChainParamsError;
use bitcoin::BlockHash;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Ordered map from height to the expected block hash at that height
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Checkpoints {
    entries: BTreeMap<u32, BlockHash>,
}

impl Checkpoints {
    /// Build a table from hard-coded entries.
    ///
    /// Entries must be listed with strictly increasing heights; a table that is
    /// out of order or repeats a height is rejected.
    pub fn from_entries(entries: &[(u32, &str)]) -> Result<Self, ChainParamsError> {
        let mut map = BTreeMap::new();
        let mut previous: Option<u32> = None;

        for &(height, hash) in entries {
            if let Some(previous) = previous {
                if height <= previous {
                    return Err(ChainParamsError::CheckpointOrder { previous, height });
                }
            }
            map.insert(height, parse_block_hash(hash));
            previous = Some(height);
        }

        Ok(Self { entries: map })
    }

    pub fn get(&self, height: u32) -> Option<&BlockHash> {
        self.entries.get(&height)
    }

    /// Returns false only when a checkpoint exists at `height` and disagrees with `hash`
    pub fn check(&self, height: u32, hash: &BlockHash) -> bool {
        self.entries.get(&height).map_or(true, |expected| expected == hash)
    }

    pub fn last_height(&self) -> Option<u32> {
        self.entries.keys().next_back().copied()
    }

    pub fn contains_hash(&self, hash: &BlockHash) -> bool {
        self.entries.values().any(|h| h == hash)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &BlockHash)> {
        self.entries.iter().map(|(height, hash)| (*height, hash))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Snapshot of chain transaction totals used to estimate sync progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainTxData {
    /// UNIX timestamp of the last known transaction count
    pub time: i64,
    /// Total transactions between genesis and `time`
    pub tx_count: u64,
    /// Estimated transactions per second after `time`
    pub tx_rate: f64,
}

impl ChainTxData {
    pub const fn new(time: i64, tx_count: u64, tx_rate: f64) -> Self {
        Self { time, tx_count, tx_rate }
    }

    /// Expected number of transactions in the chain at `now`
    pub fn estimated_tx_count(&self, now: i64) -> f64 {
        let elapsed = (now - self.time).max(0) as f64;
        self.tx_count as f64 + elapsed * self.tx_rate
    }

    /// Fraction of the chain verified, given the transaction count up to a tip
    /// with timestamp `tip_time`. Always within `[0, 1]`.
    pub fn verification_progress(&self, chain_tx: u64, tip_time: i64, now: i64) -> f64 {
        let verified = chain_tx as f64;
        let total = if tip_time <= self.time {
            // Tip is still inside the snapshot; extrapolate from the snapshot onwards
            self.estimated_tx_count(now)
        } else {
            verified + (now - tip_time).max(0) as f64 * self.tx_rate
        };

        if total <= 0.0 {
            return 0.0;
        }
        (verified / total).clamp(0.0, 1.0)
    }
}

/// Parse a hard-coded block hash in display (reversed) hex
pub(crate) fn parse_block_hash(hex: &str) -> BlockHash {
    BlockHash::from_str(hex).expect("hard-coded block hash is valid hex")
}
