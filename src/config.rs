// Node configuration and network identifiers
// This module decides which network the process runs on; parameters live in chainparams

use crate::chainparams::{ChainParams, ChainParamsError};
use crate::consensus::DeploymentPos;
use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fmt;
use std::str::FromStr;

/// Environment variable consulted before command-line flags
pub const CHAIN_ENV_VAR: &str = "EZCOIN_CHAIN";

/// The networks a node can participate in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Main,
    Test,
    Regtest,
}

impl Network {
    /// Every supported network, in registry order
    pub const ALL: [Network; 3] = [Network::Main, Network::Test, Network::Regtest];

    /// Identifier string used for selection and in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Main => "main",
            Network::Test => "test",
            Network::Regtest => "regtest",
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Main
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ChainParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" => Ok(Network::Main),
            "test" => Ok(Network::Test),
            "regtest" => Ok(Network::Regtest),
            other => Err(ChainParamsError::UnknownNetwork(other.to_string())),
        }
    }
}

/// A `--vbparams=<deployment>:<start>:<timeout>` request, honoured on regtest only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentOverride {
    pub deployment: DeploymentPos,
    pub start_time: i64,
    pub timeout: i64,
}

impl FromStr for DeploymentOverride {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        let [name, start, timeout] = parts[..] else {
            bail!("version bits parameters malformed, expecting deployment:start:end");
        };

        let deployment = name.parse::<DeploymentPos>()?;
        let start_time = start
            .parse::<i64>()
            .with_context(|| format!("invalid start time {}", start))?;
        let timeout = timeout
            .parse::<i64>()
            .with_context(|| format!("invalid timeout {}", timeout))?;

        Ok(Self {
            deployment,
            start_time,
            timeout,
        })
    }
}

/// EZCoin node bootstrap
#[derive(Parser, Debug)]
#[command(name = "ezcoin-rust")]
#[command(about = "Select an EZCoin network and check its chain parameters")]
struct Cli {
    /// Network to run on: main, test or regtest
    #[arg(long, conflicts_with_all = ["testnet", "regtest"])]
    chain: Option<Network>,

    /// Use the public test network
    #[arg(long, conflicts_with = "regtest")]
    testnet: bool,

    /// Use the local regression test network
    #[arg(long)]
    regtest: bool,

    /// Peer port, defaults to the network's port
    #[arg(long)]
    port: Option<u16>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long)]
    loglevel: Option<String>,

    /// Regtest deployment window override, repeatable
    #[arg(long, value_name = "DEPLOYMENT:START:END")]
    vbparams: Vec<DeploymentOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: Network,
    /// Overrides the network's default peer port when set
    pub listen_port: Option<u16>,
    pub log_level: String,
    pub deployment_overrides: Vec<DeploymentOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::Main,
            listen_port: None,
            log_level: "info".to_string(),
            deployment_overrides: Vec::new(),
        }
    }
}

impl Config {
    /// Build the configuration from the environment and the process arguments.
    /// Command-line flags take precedence over `EZCOIN_CHAIN`.
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(chain) = std::env::var(CHAIN_ENV_VAR) {
            config.network = chain
                .parse()
                .with_context(|| format!("invalid {}", CHAIN_ENV_VAR))?;
        }

        config.apply(Cli::parse())?;
        Ok(config)
    }

    /// Build a configuration from a full argument list, program name first
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut config = Config::default();
        config.apply(Cli::try_parse_from(args)?)?;
        Ok(config)
    }

    fn apply(&mut self, cli: Cli) -> Result<()> {
        let network = if cli.testnet {
            Some(Network::Test)
        } else if cli.regtest {
            Some(Network::Regtest)
        } else {
            cli.chain
        };
        if let Some(network) = network {
            self.network = network;
        }
        if let Some(port) = cli.port {
            self.listen_port = Some(port);
        }
        if let Some(level) = cli.loglevel {
            self.log_level = level;
        }
        self.deployment_overrides = cli.vbparams;

        if !self.deployment_overrides.is_empty() && !self.is_regtest() {
            bail!("version bits parameters may only be overridden on regtest");
        }

        Ok(())
    }

    /// Peer port to listen on, falling back to the network default
    pub fn port(&self, params: &ChainParams) -> u16 {
        self.listen_port.unwrap_or(params.default_port)
    }

    pub fn is_regtest(&self) -> bool {
        matches!(self.network, Network::Regtest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_identifiers() {
        for network in Network::ALL {
            assert_eq!(network.as_str().parse::<Network>().unwrap(), network);
        }
        assert_eq!(Network::Regtest.to_string(), "regtest");
    }

    #[test]
    fn test_unknown_network_rejected() {
        let err = "mainnet".parse::<Network>().unwrap_err();
        assert_eq!(err, ChainParamsError::UnknownNetwork("mainnet".to_string()));
        assert_eq!(err.to_string(), "Unknown chain mainnet");

        // Identifiers are case sensitive
        assert!("Main".parse::<Network>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.network, Network::Main);
        assert_eq!(config.listen_port, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_args_select_network() {
        let config = Config::from_args(["ezcoin-rust", "--testnet"]).unwrap();
        assert_eq!(config.network, Network::Test);

        let config = Config::from_args(["ezcoin-rust", "--chain=regtest", "--port=19000"]).unwrap();
        assert!(config.is_regtest());
        assert_eq!(config.listen_port, Some(19000));

        let config = Config::from_args(["ezcoin-rust", "--chain", "test"]).unwrap();
        assert_eq!(config.network, Network::Test);

        let config = Config::from_args(["ezcoin-rust"]).unwrap();
        assert_eq!(config.network, Network::Main);
        assert!(config.deployment_overrides.is_empty());
    }

    #[test]
    fn test_conflicting_args_rejected() {
        assert!(Config::from_args(["ezcoin-rust", "--testnet", "--regtest"]).is_err());
        assert!(Config::from_args(["ezcoin-rust", "--chain=main", "--regtest"]).is_err());
        assert!(Config::from_args(["ezcoin-rust", "--chain=signet"]).is_err());
        assert!(Config::from_args(["ezcoin-rust", "--port=notaport"]).is_err());
        assert!(Config::from_args(["ezcoin-rust", "--verbose"]).is_err());
    }

    #[test]
    fn test_vbparams_arg() {
        let config = Config::from_args([
            "ezcoin-rust",
            "--regtest",
            "--vbparams=segwit:0:999999999999",
            "--vbparams=csv:100:200",
        ])
        .unwrap();
        assert_eq!(
            config.deployment_overrides,
            vec![
                DeploymentOverride {
                    deployment: DeploymentPos::Segwit,
                    start_time: 0,
                    timeout: 999_999_999_999,
                },
                DeploymentOverride {
                    deployment: DeploymentPos::Csv,
                    start_time: 100,
                    timeout: 200,
                },
            ]
        );

        assert!(Config::from_args(["ezcoin-rust", "--vbparams=segwit:0:1"]).is_err());
        assert!(Config::from_args(["ezcoin-rust", "--regtest", "--vbparams=segwit:0"]).is_err());
        assert!(Config::from_args(["ezcoin-rust", "--regtest", "--vbparams=taproot:0:1"]).is_err());
        assert!(Config::from_args(["ezcoin-rust", "--regtest", "--vbparams=csv:soon:1"]).is_err());
    }

    #[test]
    fn test_unknown_deployment_is_typed() {
        let err = "taproot:0:1".parse::<DeploymentOverride>().unwrap_err();
        assert_eq!(
            err.downcast_ref::<ChainParamsError>(),
            Some(&ChainParamsError::UnknownDeployment("taproot".to_string()))
        );
    }

    #[test]
    fn test_loglevel_arg() {
        let config = Config::from_args(["ezcoin-rust", "--loglevel=debug"]).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.network, Network::Main);
    }
}
