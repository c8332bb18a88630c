//! Client configuration.

use hearth_interfaces::StoreAction;
use hearth_primitives::U256;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for a [`Client`](crate::Client).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientConfig {
    /// The data directory holding the chain store, the state database and
    /// the status record.
    pub db_path: PathBuf,

    /// Minimum action applied to the on-disk stores at startup, combined
    /// with the version checker's verdict by taking the more destructive of
    /// the two.
    pub force_action: StoreAction,

    /// Network id announced to peers.
    pub network_id: U256,

    /// Number of local mining threads. `-1` selects the hardware default;
    /// `0` also falls back to the default.
    pub miners: i32,

    /// Which gas pricer to run.
    pub gas_pricer: GasPricerKind,

    /// Mine even when there are no pending transactions or the host is
    /// still syncing.
    pub force_mining: bool,

    /// Clamp the local miner count to one so a single accelerated worker
    /// owns the device.
    pub turbo_mining: bool,

    /// Re-execute and cross-check the pending state before committing it to
    /// a candidate block. Mining is refused if the check fails.
    pub paranoia: bool,

    /// Run locally mined blocks through full verification on import, the
    /// same path remote blocks take.
    pub verify_own_blocks: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("data"),
            force_action: StoreAction::Trust,
            network_id: U256::ZERO,
            miners: -1,
            gas_pricer: GasPricerKind::Trivial,
            force_mining: false,
            turbo_mining: false,
            paranoia: false,
            verify_own_blocks: true,
        }
    }
}

/// Which gas pricer implementation a client runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GasPricerKind {
    /// A constant price.
    #[default]
    Trivial,
    /// Octile statistics over recent blocks.
    Basic,
}
