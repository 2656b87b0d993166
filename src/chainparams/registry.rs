// Network parameter registry
// Builds every network up front and hands out the one selected for this process

use crate::chainparams::{ChainParams, ChainParamsError};
use crate::config::Network;
use crate::consensus::DeploymentPos;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Holds the parameters of all three networks plus a one-shot selection.
///
/// Selection hands out an `Arc<ChainParams>` that dependent components keep
/// for the rest of the process. Once a network is selected the registry can
/// no longer be changed, and selecting a different network is an error.
#[derive(Debug)]
pub struct ChainParamsRegistry {
    main: Arc<ChainParams>,
    testnet: Arc<ChainParams>,
    regtest: Arc<ChainParams>,
    selected: OnceLock<Network>,
}

impl ChainParamsRegistry {
    /// Build parameters for every network, verifying each genesis block
    pub fn new() -> Result<Self, ChainParamsError> {
        Ok(Self {
            main: Arc::new(ChainParams::main()?),
            testnet: Arc::new(ChainParams::testnet()?),
            regtest: Arc::new(ChainParams::regtest()?),
            selected: OnceLock::new(),
        })
    }

    /// Parameters for any network, selected or not
    pub fn lookup(&self, network: Network) -> &ChainParams {
        self.slot(network)
    }

    /// Parameters for a network identifier such as `"test"`
    pub fn lookup_by_id(&self, id: &str) -> Result<&ChainParams, ChainParamsError> {
        let network: Network = id.parse()?;
        Ok(self.lookup(network))
    }

    /// Select the network this process runs on by identifier
    pub fn select(&self, id: &str) -> Result<Arc<ChainParams>, ChainParamsError> {
        let network: Network = id.parse()?;
        self.select_network(network)
    }

    /// Select the network this process runs on.
    ///
    /// Selecting the same network again returns the same handle; any other
    /// network is refused.
    pub fn select_network(&self, network: Network) -> Result<Arc<ChainParams>, ChainParamsError> {
        let selected = *self.selected.get_or_init(|| {
            info!("Selected {} network parameters", network);
            network
        });

        if selected != network {
            return Err(ChainParamsError::AlreadySelected {
                selected,
                requested: network,
            });
        }
        Ok(Arc::clone(self.slot(network)))
    }

    /// Network chosen by [`select`](Self::select), if any
    pub fn selected(&self) -> Option<Network> {
        self.selected.get().copied()
    }

    /// Parameters of the selected network.
    ///
    /// # Panics
    ///
    /// Panics when no network has been selected yet. Nothing can run safely
    /// without knowing its network, so this is treated as a programming error.
    pub fn current(&self) -> Arc<ChainParams> {
        match self.selected.get() {
            Some(&network) => Arc::clone(self.slot(network)),
            None => panic!("chain parameters accessed before a network was selected"),
        }
    }

    /// Replace the signalling window of a regtest deployment.
    ///
    /// Only allowed before selection and while no regtest handle is shared.
    pub fn update_regtest_deployment(
        &mut self,
        pos: DeploymentPos,
        start_time: i64,
        timeout: i64,
    ) -> Result<(), ChainParamsError> {
        if self.selected.get().is_some() {
            return Err(ChainParamsError::RegistryFrozen);
        }
        let regtest = Arc::get_mut(&mut self.regtest).ok_or(ChainParamsError::RegistryFrozen)?;

        regtest.set_deployment_window(pos, start_time, timeout)?;
        warn!(
            "Regtest deployment {} overridden: start {}, timeout {}",
            pos.name(),
            start_time,
            timeout
        );
        Ok(())
    }

    /// Identify the network whose message start prefixes `bytes`
    pub fn network_for_message_start(&self, bytes: &[u8]) -> Option<Network> {
        Network::ALL
            .into_iter()
            .find(|&network| self.slot(network).matches_message_start(bytes))
    }

    fn slot(&self, network: Network) -> &Arc<ChainParams> {
        match network {
            Network::Main => &self.main,
            Network::Test => &self.testnet,
            Network::Regtest => &self.regtest,
        }
    }
}
