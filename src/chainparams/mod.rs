// Chain parameters for each EZCoin network
// Everything a node needs to know about the network it joins: consensus rules,
// genesis block, wire magic, ports, seeds and address prefixes

pub mod base58;
pub mod error;
pub mod genesis;
pub mod registry;
pub mod seeds;

pub use base58::{Base58Prefixes, Base58Type};
pub use error::ChainParamsError;
pub use genesis::{create_genesis_block, ezcoin_genesis_block};
pub use registry::ChainParamsRegistry;
pub use seeds::{DnsSeedData, Seeds};

use crate::config::Network;
use crate::consensus::checkpoints::parse_block_hash;
use crate::consensus::{ChainTxData, Checkpoints, ConsensusParams, Deployment, DeploymentPos, Deployments};
use bitcoin::hashes::Hash;
use bitcoin::p2p::Magic;
use bitcoin::pow::Work;
use bitcoin::{Amount, Block, BlockHash, Target, TxMerkleNode};
use std::str::FromStr;
use tracing::debug;

/// Merkle root shared by every network's genesis block
const GENESIS_MERKLE_ROOT: &str = "c208fc325639701c5f2eab8cc7d00e889be2b1641ccef96e70243e2ca17e764a";

/// Parameters defining one network, immutable once built
#[derive(Debug, Clone)]
pub struct ChainParams {
    pub network: Network,
    pub consensus: ConsensusParams,
    /// Four bytes starting every peer-to-peer message on this network
    pub message_start: Magic,
    pub default_port: u16,
    /// Keep every block below this height when pruning
    pub prune_after_height: u64,
    pub genesis: Block,
    pub seeds: Seeds,
    pub base58_prefixes: Base58Prefixes,
    pub mining_requires_peers: bool,
    pub default_consistency_checks: bool,
    pub require_standard: bool,
    pub mine_blocks_on_demand: bool,
    pub checkpoints: Checkpoints,
    pub chain_tx_data: ChainTxData,
}

impl ChainParams {
    /// Main network
    ///
    /// What makes a good checkpoint block: it is surrounded by blocks with
    /// reasonable timestamps (no blocks before with a timestamp after, none
    /// after with a timestamp before) and contains no strange transactions.
    pub fn main() -> Result<Self, ChainParamsError> {
        let genesis = ezcoin_genesis_block(1638917764, 2000036399, 0x1e0ffff0, 1, Amount::ZERO);
        let hash_genesis_block = checked_genesis(
            Network::Main,
            &genesis,
            "c856c1bfaa269264252c3712a3ea256e9db9b241a6331318e552c724747f106a",
        )?;

        let consensus = ConsensusParams {
            network: Network::Main,
            hash_genesis_block,
            subsidy_halving_interval: 2_102_400,
            bip34_height: 82420,
            bip34_hash: parse_block_hash("c3ce2421f01e9e29c8f889d24fe75cb649ed52a35d3d17e9602a5934b80bdfea"),
            bip65_height: 82420,
            bip66_height: 82420,
            pow_limit: parse_target("00000fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"),
            pow_target_timespan: 60,
            pow_target_spacing: 60,
            pow_allow_min_difficulty_blocks: false,
            pow_no_retargeting: false,
            rule_change_activation_threshold: 9,
            miner_confirmation_window: 12,
            deployments: Deployments::new(
                Deployment::new(28, 1652505000, 1652507000),
                // BIP68, BIP112 and BIP113
                Deployment::new(0, 1652505000, 1652512000),
                // BIP141, BIP143 and BIP147
                Deployment::new(1, 1652505000, 1652512000),
            ),
            minimum_chain_work: parse_work("00000000000000000000000000000000000000000000000000ed2ab0b8e4ff6e"),
            default_assume_valid: parse_block_hash("3429024b2c6e423cf64607c8e8c053340eeed3ada9dff41577114f62941bb7e8"),
        };

        let checkpoints = Checkpoints::from_entries(&[
            (0, "c856c1bfaa269264252c3712a3ea256e9db9b241a6331318e552c724747f106a"),
            (1, "01294c9e2fa205fec31a65c26d6f9376e049f2f5a79f6e0bdcdcfd6a6eceee77"),
            (2, "2f461d18e25ec3e3bcba6be1168f9b15f07f8f8cb8a2c633c0d5b51bf3a3a092"),
            (3, "b11e8722c1c148ba4db16412321af9e254ecee192b058c62946bbbaf424fc50e"),
            (11, "af7fca0944c24c2cf498a44d59c99de2516f298c1aa0e596c29c73cb76785ee4"),
            (100, "a1fc67384cd8c5f6757e8c6705472ea4c306f99f7f4c76d9b55c19e47eb6d269"),
            (1000, "fe0a7b865c3c95b1dfe8fd309cb177a289177daf322213e447417076e7a1916b"),
            (10000, "14856708beadeb800c9f1706d8551b737afd83dbd1b6a7edd14e344b89dbb2e2"),
            (40000, "f28cacf010f09dc2fe83c4c001f7a20667051410d70338cfa0fb08ecf87170f7"),
            (80000, "742f96a321ca36f52b8c717209194afbb7bd18d2b540e3b67ea4fdeb62ff83a1"),
            (82366, "cd8422c5f1699c4b6392a5db5123bcb664084187ef80a5594c258391ba5f0e29"),
            (82416, "4f9a991dc8f738ee6d630548f296986387228985a810eaa456c32df60d78c50e"),
            // BIP34 and BIP65 activation
            (82420, "c3ce2421f01e9e29c8f889d24fe75cb649ed52a35d3d17e9602a5934b80bdfea"),
            // CSV and segwit signalling started
            (82428, "84ffb4ebaf89415146ce6a01711bd38780133fba7113cba3634ffb16780da0e8"),
            // CSV and segwit locked in
            (82440, "cb9e63ac55b78b7ceda101f0325df05aae945e68e4da6bc2b28b5ee20824d944"),
            // CSV and segwit active
            (82452, "6a229b1494c0b8476471624c100001f598df75fa26346296fdca8089dfada0eb"),
            (82457, "3429024b2c6e423cf64607c8e8c053340eeed3ada9dff41577114f62941bb7e8"),
        ])?;

        Self {
            network: Network::Main,
            consensus,
            message_start: Magic::from_bytes([0xcb, 0xc3, 0xa6, 0xdf]),
            default_port: 44804,
            prune_after_height: 100_000,
            genesis,
            seeds: Seeds {
                dns: vec![
                    DnsSeedData::new("node01", "node01.myezcoin.com", true),
                    DnsSeedData::new("node02", "node02.myezcoin.com", true),
                    DnsSeedData::new("node03", "node03.myezcoin.com", true),
                ],
                fixed: Vec::new(),
            },
            base58_prefixes: Base58Prefixes {
                pubkey_address: 33,
                script_address: 5,
                script_address2: 50,
                secret_key: 176,
                ext_public_key: [0x04, 0x88, 0xB2, 0x1E],
                ext_secret_key: [0x04, 0x88, 0xAD, 0xE4],
            },
            mining_requires_peers: true,
            default_consistency_checks: false,
            require_standard: true,
            mine_blocks_on_demand: false,
            checkpoints,
            chain_tx_data: ChainTxData::new(1652511407, 126354, 0.999889),
        }
        .finish()
    }

    /// Public test network
    pub fn testnet() -> Result<Self, ChainParamsError> {
        let genesis = ezcoin_genesis_block(1638917764, 596586, 0x1e0ffff0, 1, Amount::ZERO);
        let hash_genesis_block = checked_genesis(
            Network::Test,
            &genesis,
            "b2c0ece92e3ce9566bd7dcd1f5d4b87d3c15569c52962272ecbee2e54ea55fc6",
        )?;

        let consensus = ConsensusParams {
            network: Network::Test,
            hash_genesis_block,
            subsidy_halving_interval: 2_102_400,
            bip34_height: 76,
            bip34_hash: parse_block_hash("8075c771ed8b495ffd943980a95f702ab34fce3c8c54e379548bda33cc8c0573"),
            bip65_height: 76,
            bip66_height: 76,
            pow_limit: parse_target("00000fffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"),
            pow_target_timespan: 60,
            pow_target_spacing: 60,
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: false,
            // 75% for testchains
            rule_change_activation_threshold: 1512,
            miner_confirmation_window: 2016,
            deployments: Deployments::new(
                // January 1, 2008 to December 31, 2008
                Deployment::new(28, 1199145601, 1230767999),
                // January 1, 2017 to January 31, 2018
                Deployment::new(0, 1483228800, 1517356801),
                Deployment::new(1, 1483228800, 1517356801),
            ),
            minimum_chain_work: Work::from_be_bytes([0; 32]),
            default_assume_valid: BlockHash::all_zeros(),
        };

        let checkpoints = Checkpoints::from_entries(&[(
            0,
            "b2c0ece92e3ce9566bd7dcd1f5d4b87d3c15569c52962272ecbee2e54ea55fc6",
        )])?;

        Self {
            network: Network::Test,
            consensus,
            message_start: Magic::from_bytes([0xff, 0xf2, 0xcc, 0xfa]),
            default_port: 44805,
            prune_after_height: 1000,
            genesis,
            seeds: Seeds {
                dns: vec![
                    DnsSeedData::new("185.163.118.233", "185.163.118.233", true),
                    DnsSeedData::new("188.68.52.16", "188.68.52.16", true),
                ],
                fixed: Vec::new(),
            },
            base58_prefixes: Base58Prefixes {
                pubkey_address: 111,
                script_address: 196,
                script_address2: 58,
                secret_key: 239,
                ext_public_key: [0x04, 0x35, 0x87, 0xCF],
                ext_secret_key: [0x04, 0x35, 0x83, 0x94],
            },
            mining_requires_peers: true,
            default_consistency_checks: false,
            require_standard: false,
            mine_blocks_on_demand: false,
            checkpoints,
            chain_tx_data: ChainTxData::new(1638917764, 0, 0.0),
        }
        .finish()
    }

    /// Local regression test network
    pub fn regtest() -> Result<Self, ChainParamsError> {
        let genesis = ezcoin_genesis_block(1638917764, 0, 0x207fffff, 1, Amount::ZERO);
        let hash_genesis_block = checked_genesis(
            Network::Regtest,
            &genesis,
            "709f87a97adaa8fb3b7cf89f692ea92132a148c52841ed72b5dbbb1ef83a5f34",
        )?;

        let consensus = ConsensusParams {
            network: Network::Regtest,
            hash_genesis_block,
            subsidy_halving_interval: 150,
            // Far in the future so version 1 blocks are not rejected in tests
            bip34_height: 100_000_000,
            bip34_hash: BlockHash::all_zeros(),
            bip65_height: 1351,
            bip66_height: 1251,
            pow_limit: parse_target("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"),
            pow_target_timespan: 60,
            pow_target_spacing: 60,
            pow_allow_min_difficulty_blocks: true,
            pow_no_retargeting: true,
            rule_change_activation_threshold: 108,
            miner_confirmation_window: 144,
            deployments: Deployments::new(
                Deployment::always_active(28),
                Deployment::always_active(0),
                Deployment::always_active(1),
            ),
            minimum_chain_work: Work::from_be_bytes([0; 32]),
            default_assume_valid: BlockHash::all_zeros(),
        };

        let checkpoints = Checkpoints::from_entries(&[(
            0,
            "709f87a97adaa8fb3b7cf89f692ea92132a148c52841ed72b5dbbb1ef83a5f34",
        )])?;

        Self {
            network: Network::Regtest,
            consensus,
            message_start: Magic::from_bytes([0xaa, 0xbb, 0xbc, 0xdd]),
            default_port: 44806,
            prune_after_height: 1000,
            genesis,
            // No DNS or fixed seeds on regtest
            seeds: Seeds::default(),
            base58_prefixes: Base58Prefixes {
                pubkey_address: 122,
                script_address: 188,
                script_address2: 60,
                secret_key: 240,
                ext_public_key: [0x04, 0x35, 0x88, 0xCF],
                ext_secret_key: [0x04, 0x35, 0x84, 0x94],
            },
            mining_requires_peers: false,
            default_consistency_checks: true,
            require_standard: false,
            mine_blocks_on_demand: true,
            checkpoints,
            chain_tx_data: ChainTxData::new(0, 0, 0.0),
        }
        .finish()
    }

    /// Build the parameters for `network`
    pub fn for_network(network: Network) -> Result<Self, ChainParamsError> {
        match network {
            Network::Main => Self::main(),
            Network::Test => Self::testnet(),
            Network::Regtest => Self::regtest(),
        }
    }

    pub fn genesis_hash(&self) -> BlockHash {
        self.consensus.hash_genesis_block
    }

    /// Whether four bytes read off the wire belong to this network
    pub fn matches_message_start(&self, bytes: &[u8]) -> bool {
        bytes.len() >= 4 && bytes[..4] == self.message_start.to_bytes()
    }

    /// Overwrite a deployment window; only reachable for regtest through the registry
    pub(crate) fn set_deployment_window(
        &mut self,
        pos: DeploymentPos,
        start_time: i64,
        timeout: i64,
    ) -> Result<(), ChainParamsError> {
        let previous = self.consensus.deployments[pos];
        self.consensus.deployments[pos].start_time = start_time;
        self.consensus.deployments[pos].timeout = timeout;

        if let Err(e) = self.consensus.deployments.validate() {
            self.consensus.deployments[pos] = previous;
            return Err(e);
        }
        Ok(())
    }

    fn finish(self) -> Result<Self, ChainParamsError> {
        self.consensus.deployments.validate()?;
        debug!(
            "Built {} parameters: genesis {}, port {}, {} checkpoints",
            self.network,
            self.genesis_hash(),
            self.default_port,
            self.checkpoints.len()
        );
        Ok(self)
    }
}

/// Verify a derived genesis block and return its hash
fn checked_genesis(network: Network, genesis: &Block, expected_hash: &str) -> Result<BlockHash, ChainParamsError> {
    let merkle_root = TxMerkleNode::from_str(GENESIS_MERKLE_ROOT).expect("hard-coded merkle root is valid hex");
    genesis::verify_genesis(network, genesis, merkle_root, parse_block_hash(expected_hash))?;
    Ok(genesis.block_hash())
}

fn parse_be_bytes(hex_str: &str) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut bytes).expect("hard-coded 256-bit value is valid hex");
    bytes
}

fn parse_target(hex_str: &str) -> Target {
    Target::from_be_bytes(parse_be_bytes(hex_str))
}

fn parse_work(hex_str: &str) -> Work {
    Work::from_be_bytes(parse_be_bytes(hex_str))
}
