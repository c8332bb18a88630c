use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// Parameters of a read-only contract call simulated against pending state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Caller address.
    pub from: Address,
    /// Callee address.
    pub to: Address,
    /// Gas limit for the simulation.
    pub gas: u64,
    /// Gas price the simulation assumes.
    pub gas_price: U256,
    /// Value transferred by the call.
    pub value: U256,
    /// Call data.
    pub data: Bytes,
}

/// Result of a simulated execution.
///
/// The default value is the empty result reported when a simulation fails.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    /// Bytes returned by the callee.
    pub output: Bytes,
    /// Gas consumed by the execution.
    pub gas_used: u64,
}
