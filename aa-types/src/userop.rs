use alloy::{
    core::sol_types::SolValue,
    primitives::{Address, B256, Bytes, ChainId, U256, keccak256},
};
use serde::{Deserialize, Serialize};

/// A user operation as submitted to the entry point.
///
/// All fields except `signature` are filled by the builder; `signature`
/// stays empty until the operation is signed over its request id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperation {
    pub sender: Address,
    pub nonce: U256,
    /// Factory deployment bytes; non-empty only while the wallet has no
    /// on-chain code yet.
    pub init_code: Bytes,
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    pub paymaster_and_data: Bytes,
    pub signature: Bytes,
}

/// Compute the canonical request id of a user operation.
///
/// This must match what the entry point computes on-chain: the keccak256 of
/// the ABI-encoded operation fields (signature excluded, byte fields hashed
/// first), re-hashed together with the entry point address and the chain id.
/// The request id, not the raw operation, is the value that gets signed.
pub fn compute_request_id(op: &UserOperation, entry_point: Address, chain_id: ChainId) -> B256 {
    // Hash the byte fields first
    let init_code_hash = keccak256(&op.init_code);
    let call_data_hash = keccak256(&op.call_data);
    let paymaster_and_data_hash = keccak256(&op.paymaster_and_data);

    // Inner tuple deliberately omits the signature
    let inner_tuple = (
        op.sender,
        op.nonce,
        init_code_hash,
        call_data_hash,
        op.call_gas_limit,
        op.verification_gas_limit,
        op.pre_verification_gas,
        op.max_fee_per_gas,
        op.max_priority_fee_per_gas,
        paymaster_and_data_hash,
    );

    let inner_hash = keccak256(inner_tuple.abi_encode());

    let outer_tuple = (inner_hash, entry_point, U256::from(chain_id));
    keccak256(outer_tuple.abi_encode())
}
