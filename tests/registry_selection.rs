// Integration test for network selection
// Verifies select-once behaviour, lookups and the regtest deployment override

use ezcoin_rust::consensus::{Deployment, DeploymentPos, DeploymentWindow};
use ezcoin_rust::{ChainParamsError, ChainParamsRegistry, Config, Network};
use std::sync::Arc;
use std::thread;

#[test]
fn test_select_each_network() {
    for id in ["main", "test", "regtest"] {
        let registry = ChainParamsRegistry::new().unwrap();
        let params = registry.select(id).unwrap();

        assert_eq!(params.network.as_str(), id);
        assert_eq!(registry.current().network.as_str(), id);
        assert_eq!(registry.selected().map(|n| n.as_str()), Some(id));
    }
}

#[test]
fn test_select_unknown_network() {
    let registry = ChainParamsRegistry::new().unwrap();

    for id in ["", "mainnet", "testnet", "Regtest", "signet"] {
        assert_eq!(
            registry.select(id).unwrap_err(),
            ChainParamsError::UnknownNetwork(id.to_string())
        );
    }
    assert_eq!(registry.selected(), None);
}

#[test]
fn test_lookup_other_networks_after_select() {
    let registry = ChainParamsRegistry::new().unwrap();
    registry.select("regtest").unwrap();

    let main = registry.lookup_by_id("main").unwrap();
    assert_eq!(main.network, Network::Main);
    assert_eq!(main.default_port, 44804);
    assert_eq!(registry.current().network, Network::Regtest);
}

#[test]
fn test_config_drives_selection() {
    let config = Config::from_args(["ezcoin-rust", "--testnet", "--port=20000"]).unwrap();
    let registry = ChainParamsRegistry::new().unwrap();
    let params = registry.select_network(config.network).unwrap();

    assert_eq!(params.network, Network::Test);
    assert_eq!(config.port(&params), 20000);
    assert_eq!(Config::default().port(&params), 44805);
}

#[test]
fn test_concurrent_readers_share_selection() {
    let registry = Arc::new(ChainParamsRegistry::new().unwrap());
    let selected = registry.select("main").unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let params = registry.current();
                (params.network, params.genesis_hash())
            })
        })
        .collect();

    for handle in handles {
        let (network, genesis) = handle.join().unwrap();
        assert_eq!(network, Network::Main);
        assert_eq!(genesis, selected.genesis_hash());
    }
}

#[test]
fn test_regtest_override_forces_deployment_active() {
    let mut registry = ChainParamsRegistry::new().unwrap();

    // Disable first, then force on, as a functional test would
    registry
        .update_regtest_deployment(DeploymentPos::Csv, 0, 0)
        .unwrap();
    assert_eq!(
        registry.lookup(Network::Regtest).consensus.deployments[DeploymentPos::Csv].window_at(100),
        DeploymentWindow::Disabled
    );

    registry
        .update_regtest_deployment(DeploymentPos::Csv, 0, Deployment::NO_TIMEOUT)
        .unwrap();

    let params = registry.select("regtest").unwrap();
    let csv = params.consensus.deployments[DeploymentPos::Csv];
    for time in [0, 1, 1_638_917_764, i64::MAX] {
        assert_eq!(csv.window_at(time), DeploymentWindow::AlwaysActive);
        assert!(csv.is_signaling_period(time));
    }
}

#[test]
fn test_regtest_override_refused_while_shared() {
    let mut registry = ChainParamsRegistry::new().unwrap();
    registry.select("main").unwrap();

    assert_eq!(
        registry.update_regtest_deployment(DeploymentPos::Segwit, 0, 0),
        Err(ChainParamsError::RegistryFrozen)
    );
}

#[test]
fn test_cannot_switch_networks() {
    let registry = ChainParamsRegistry::new().unwrap();
    registry.select("main").unwrap();

    assert!(matches!(
        registry.select("regtest"),
        Err(ChainParamsError::AlreadySelected {
            selected: Network::Main,
            requested: Network::Regtest,
        })
    ));
}
