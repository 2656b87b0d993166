// Genesis block construction
// Builds each network's first block from its seed values and checks it against known hashes

use crate::chainparams::ChainParamsError;
use crate::config::Network;
use bitcoin::absolute::LockTime;
use bitcoin::block::{Header, Version as BlockVersion};
use bitcoin::hashes::Hash;
use bitcoin::opcodes::all::OP_CHECKSIG;
use bitcoin::script::{Builder, PushBytesBuf};
use bitcoin::transaction::Version;
use bitcoin::{
    Amount, Block, BlockHash, CompactTarget, OutPoint, ScriptBuf, Sequence, Transaction, TxIn,
    TxMerkleNode, TxOut, Witness,
};
use tracing::error;

/// Birth message embedded in the coinbase of every EZCoin genesis block
pub const GENESIS_TIMESTAMP: &str =
    "NY Times 07/Dec/2021 Biden Warns Putin of Economic Consequences if Aggression Continues";

/// Uncompressed public key paid by the genesis coinbase output
pub const GENESIS_OUTPUT_PUBKEY: &str = "040184984fa689ad5023690c80f3a49c8f13f8d45b8c857fb6798bc4a8e4d3eb4b10f4d4604fa08dce60643f0f470216fe1abc850b4acf21b179c45070ac7b03a9";

/// Difficulty bits pushed into the genesis coinbase script, independent of the header bits
const COINBASE_SCRIPT_BITS: i64 = 0x1d00ffff;

/// Extra nonce pushed after the bits, as a one-byte data push
const COINBASE_EXTRA_NONCE: u8 = 4;

/// Build a genesis block. The output of its coinbase transaction cannot be
/// spent since it did not originally exist in the database.
///
/// No proof-of-work search happens here; `nonce` must already satisfy the network.
pub fn create_genesis_block(
    timestamp: &str,
    output_script: ScriptBuf,
    time: u32,
    nonce: u32,
    bits: u32,
    version: i32,
    reward: Amount,
) -> Block {
    let script_sig = Builder::new()
        .push_int(COINBASE_SCRIPT_BITS)
        .push_slice(push_bytes(&[COINBASE_EXTRA_NONCE]))
        .push_slice(push_bytes(timestamp.as_bytes()))
        .into_script();

    let coinbase = Transaction {
        version: Version::ONE,
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint::null(),
            script_sig,
            sequence: Sequence::MAX,
            witness: Witness::default(),
        }],
        output: vec![TxOut {
            value: reward,
            script_pubkey: output_script,
        }],
    };

    let mut block = Block {
        header: Header {
            version: BlockVersion::from_consensus(version),
            prev_blockhash: BlockHash::all_zeros(),
            merkle_root: TxMerkleNode::all_zeros(),
            time,
            bits: CompactTarget::from_consensus(bits),
            nonce,
        },
        txdata: vec![coinbase],
    };
    block.header.merkle_root = block
        .compute_merkle_root()
        .expect("genesis block always carries its coinbase");
    block
}

/// Pay-to-pubkey script shared by every EZCoin genesis coinbase
pub fn genesis_output_script() -> ScriptBuf {
    let mut pubkey = [0u8; 65];
    hex::decode_to_slice(GENESIS_OUTPUT_PUBKEY, &mut pubkey)
        .expect("genesis public key is valid hex");

    Builder::new()
        .push_slice(push_bytes(&pubkey))
        .push_opcode(OP_CHECKSIG)
        .into_script()
}

/// Build an EZCoin genesis block with the shared birth message and output script
pub fn ezcoin_genesis_block(time: u32, nonce: u32, bits: u32, version: i32, reward: Amount) -> Block {
    create_genesis_block(
        GENESIS_TIMESTAMP,
        genesis_output_script(),
        time,
        nonce,
        bits,
        version,
        reward,
    )
}

/// Compare a derived genesis block against the hashes recorded for `network`
pub fn verify_genesis(
    network: Network,
    genesis: &Block,
    expected_merkle_root: TxMerkleNode,
    expected_hash: BlockHash,
) -> Result<(), ChainParamsError> {
    let merkle_root = genesis.header.merkle_root;
    if merkle_root != expected_merkle_root {
        error!("Genesis merkle root mismatch on {}: {} != {}", network, merkle_root, expected_merkle_root);
        return Err(ChainParamsError::GenesisMerkleRootMismatch {
            network,
            expected: expected_merkle_root,
            derived: merkle_root,
        });
    }

    let hash = genesis.block_hash();
    if hash != expected_hash {
        error!("Genesis hash mismatch on {}: {} != {}", network, hash, expected_hash);
        return Err(ChainParamsError::GenesisHashMismatch {
            network,
            expected: expected_hash,
            derived: hash,
        });
    }

    Ok(())
}

fn push_bytes(data: &[u8]) -> PushBytesBuf {
    PushBytesBuf::try_from(data.to_vec()).expect("genesis script data fits in a single push")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const MERKLE_ROOT: &str = "c208fc325639701c5f2eab8cc7d00e889be2b1641ccef96e70243e2ca17e764a";
    const MAIN_HASH: &str = "c856c1bfaa269264252c3712a3ea256e9db9b241a6331318e552c724747f106a";

    fn main_genesis() -> Block {
        ezcoin_genesis_block(1638917764, 2000036399, 0x1e0ffff0, 1, Amount::ZERO)
    }

    #[test]
    fn test_coinbase_layout() {
        let genesis = main_genesis();
        assert_eq!(genesis.txdata.len(), 1);

        let coinbase = &genesis.txdata[0];
        assert!(coinbase.is_coinbase());
        assert_eq!(coinbase.output.len(), 1);
        assert_eq!(coinbase.output[0].value, Amount::ZERO);

        // bits push, one-byte extra nonce push, then the message behind OP_PUSHDATA1
        let script_sig = coinbase.input[0].script_sig.as_bytes();
        assert_eq!(&script_sig[..8], &[0x04, 0xff, 0xff, 0x00, 0x1d, 0x01, 0x04, 0x4c]);
        assert_eq!(script_sig[8] as usize, GENESIS_TIMESTAMP.len());
        assert!(script_sig.ends_with(GENESIS_TIMESTAMP.as_bytes()));

        let script_pubkey = coinbase.output[0].script_pubkey.as_bytes();
        assert_eq!(script_pubkey.len(), 67);
        assert_eq!(script_pubkey[0], 65);
        assert_eq!(script_pubkey[66], 0xac);
    }

    #[test]
    fn test_header_fields() {
        let genesis = main_genesis();

        assert_eq!(genesis.header.prev_blockhash, BlockHash::all_zeros());
        assert_eq!(genesis.header.time, 1638917764);
        assert_eq!(genesis.header.nonce, 2000036399);
        assert_eq!(genesis.header.bits, CompactTarget::from_consensus(0x1e0ffff0));
        assert_eq!(genesis.header.version, BlockVersion::ONE);
        assert!(genesis.check_merkle_root());
    }

    #[test]
    fn test_main_genesis_hashes() {
        let genesis = main_genesis();

        assert_eq!(genesis.header.merkle_root, TxMerkleNode::from_str(MERKLE_ROOT).unwrap());
        assert_eq!(genesis.block_hash(), BlockHash::from_str(MAIN_HASH).unwrap());
    }

    #[test]
    fn test_verify_genesis_reports_mismatch() {
        let genesis = main_genesis();
        let merkle_root = TxMerkleNode::from_str(MERKLE_ROOT).unwrap();

        assert!(verify_genesis(Network::Main, &genesis, merkle_root, genesis.block_hash()).is_ok());

        let err = verify_genesis(Network::Main, &genesis, merkle_root, BlockHash::all_zeros()).unwrap_err();
        assert!(matches!(err, ChainParamsError::GenesisHashMismatch { network: Network::Main, .. }));

        let err = verify_genesis(Network::Test, &genesis, TxMerkleNode::all_zeros(), genesis.block_hash())
            .unwrap_err();
        assert!(matches!(err, ChainParamsError::GenesisMerkleRootMismatch { network: Network::Test, .. }));
    }

    #[test]
    fn test_single_byte_changes_hash() {
        let reference = main_genesis().block_hash();

        let mut message = GENESIS_TIMESTAMP.to_string();
        message.replace_range(0..1, "M");
        let altered = create_genesis_block(
            &message,
            genesis_output_script(),
            1638917764,
            2000036399,
            0x1e0ffff0,
            1,
            Amount::ZERO,
        );
        assert_ne!(altered.block_hash(), reference);
        assert_ne!(altered.header.merkle_root, main_genesis().header.merkle_root);

        let altered = ezcoin_genesis_block(1638917764, 2000036398, 0x1e0ffff0, 1, Amount::ZERO);
        assert_ne!(altered.block_hash(), reference);

        let altered = ezcoin_genesis_block(1638917764, 2000036399, 0x1e0ffff0, 1, Amount::from_sat(1));
        assert_ne!(altered.block_hash(), reference);
    }
}
