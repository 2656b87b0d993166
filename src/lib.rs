// EZCoin Rust - network parameters for an EZCoin node
// This is the library crate that exposes the public API

pub mod chainparams;
pub mod config;
pub mod consensus;

pub use chainparams::{ChainParams, ChainParamsError, ChainParamsRegistry};
pub use config::{Config, Network};
