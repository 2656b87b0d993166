// Version-bits soft-fork deployments
// This module defines the fixed deployment table and activation window queries

use crate::chainparams::ChainParamsError;
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// Version field top bits that mark a block as version-bits signalling
pub const VERSIONBITS_TOP_BITS: u32 = 0x2000_0000;
/// Mask selecting the version-bits top bits
pub const VERSIONBITS_TOP_MASK: u32 = 0xE000_0000;
/// Highest bit usable for a deployment signal
pub const VERSIONBITS_MAX_BIT: u8 = 28;

/// Rule changes that may be deployed through version bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentPos {
    /// Test flag, never carries consensus rules
    TestDummy,
    /// BIP68, BIP112 and BIP113 relative lock-time rules
    Csv,
    /// Segregated witness (BIP141, BIP143 and BIP147)
    Segwit,
}

impl DeploymentPos {
    pub const COUNT: usize = 3;
    pub const ALL: [DeploymentPos; Self::COUNT] =
        [DeploymentPos::TestDummy, DeploymentPos::Csv, DeploymentPos::Segwit];

    pub fn name(&self) -> &'static str {
        match self {
            DeploymentPos::TestDummy => "testdummy",
            DeploymentPos::Csv => "csv",
            DeploymentPos::Segwit => "segwit",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl FromStr for DeploymentPos {
    type Err = ChainParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeploymentPos::ALL
            .into_iter()
            .find(|pos| pos.name() == s)
            .ok_or_else(|| ChainParamsError::UnknownDeployment(s.to_string()))
    }
}

/// Where a point in time falls relative to a deployment's signalling window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentWindow {
    /// The deployment can never activate
    Disabled,
    /// The deployment is forced on for every block time
    AlwaysActive,
    /// Signalling has not started yet
    Defined,
    /// Inside `[start_time, timeout)`
    Started,
    /// The window closed without activation being decided here
    TimedOut,
}

/// One soft-fork activation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployment {
    /// Bit position in the block version, 0..=28
    pub bit: u8,
    /// Median time past at which signalling begins
    pub start_time: i64,
    /// Median time past at which an unactivated deployment is abandoned
    pub timeout: i64,
}

impl Deployment {
    /// Timeout used together with a zero start time to force a rule on
    pub const NO_TIMEOUT: i64 = 999_999_999_999;
    /// Start time marking a deployment that never activates
    pub const NEVER_ACTIVE: i64 = -2;

    pub const fn new(bit: u8, start_time: i64, timeout: i64) -> Self {
        Self { bit, start_time, timeout }
    }

    /// A deployment that signals unconditionally
    pub const fn always_active(bit: u8) -> Self {
        Self::new(bit, 0, Self::NO_TIMEOUT)
    }

    /// A deployment that never activates
    pub const fn disabled(bit: u8) -> Self {
        Self::new(bit, Self::NEVER_ACTIVE, Self::NEVER_ACTIVE)
    }

    pub fn is_disabled(&self) -> bool {
        self.start_time == Self::NEVER_ACTIVE || (self.start_time == 0 && self.timeout == 0)
    }

    pub fn is_always_active(&self) -> bool {
        !self.is_disabled() && self.start_time == 0 && self.timeout >= Self::NO_TIMEOUT
    }

    /// Classify a block time against this deployment's window
    pub fn window_at(&self, time: i64) -> DeploymentWindow {
        if self.is_disabled() {
            DeploymentWindow::Disabled
        } else if self.is_always_active() {
            DeploymentWindow::AlwaysActive
        } else if time < self.start_time {
            DeploymentWindow::Defined
        } else if time >= self.timeout {
            DeploymentWindow::TimedOut
        } else {
            DeploymentWindow::Started
        }
    }

    /// Whether blocks at `time` may meaningfully signal for this deployment
    pub fn is_signaling_period(&self, time: i64) -> bool {
        matches!(
            self.window_at(time),
            DeploymentWindow::AlwaysActive | DeploymentWindow::Started
        )
    }

    /// Version field mask for this deployment's bit, zero when the bit
    /// lies outside the signalling range
    pub fn mask(&self) -> u32 {
        if self.bit > VERSIONBITS_MAX_BIT {
            return 0;
        }
        1u32 << self.bit
    }

    /// Check whether a block version signals for this deployment
    pub fn signals(&self, version: i32) -> bool {
        let version = version as u32;
        (version & VERSIONBITS_TOP_MASK) == VERSIONBITS_TOP_BITS && (version & self.mask()) != 0
    }

    fn overlaps(&self, other: &Deployment) -> bool {
        if self.is_disabled() || other.is_disabled() {
            return false;
        }
        self.start_time < other.timeout && other.start_time < self.timeout
    }
}

/// Fixed-size deployment table indexed by [`DeploymentPos`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deployments([Deployment; DeploymentPos::COUNT]);

impl Deployments {
    pub const fn new(test_dummy: Deployment, csv: Deployment, segwit: Deployment) -> Self {
        Self([test_dummy, csv, segwit])
    }

    /// Every deployment disabled
    pub const fn none() -> Self {
        Self([Deployment::disabled(28), Deployment::disabled(0), Deployment::disabled(1)])
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeploymentPos, &Deployment)> {
        DeploymentPos::ALL.into_iter().map(move |pos| (pos, &self[pos]))
    }

    /// Check bit ranges, window ordering and bit reuse across the table
    pub fn validate(&self) -> Result<(), ChainParamsError> {
        for (pos, deployment) in self.iter() {
            if deployment.bit > VERSIONBITS_MAX_BIT {
                return Err(ChainParamsError::InvalidDeploymentBit {
                    deployment: pos,
                    bit: deployment.bit,
                });
            }
            if !deployment.is_disabled() && deployment.start_time > deployment.timeout {
                return Err(ChainParamsError::InvalidDeploymentWindow { deployment: pos });
            }
        }

        for (i, &first) in DeploymentPos::ALL.iter().enumerate() {
            for &second in &DeploymentPos::ALL[i + 1..] {
                let (a, b) = (&self[first], &self[second]);
                if a.bit == b.bit && a.overlaps(b) {
                    return Err(ChainParamsError::DeploymentConflict {
                        bit: a.bit,
                        first,
                        second,
                    });
                }
            }
        }

        Ok(())
    }
}

impl Index<DeploymentPos> for Deployments {
    type Output = Deployment;

    fn index(&self, pos: DeploymentPos) -> &Deployment {
        &self.0[pos.index()]
    }
}

impl IndexMut<DeploymentPos> for Deployments {
    fn index_mut(&mut self, pos: DeploymentPos) -> &mut Deployment {
        &mut self.0[pos.index()]
    }
}
