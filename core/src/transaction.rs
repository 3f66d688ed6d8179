use alloy::primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// ### TransactionDetails
/// Caller-supplied intent describing the action a smart wallet should
/// perform. This is the input to the user-operation builder.
///
/// A details value with no `target` and empty `data` is the no-op transfer
/// placeholder: the builder short-circuits it to empty call data and a
/// minimal call gas limit.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDetails {
    pub target: Option<Address>,

    #[serde(default)]
    pub data: Bytes,

    /// Native value sent with the call. Treated as zero when omitted.
    #[serde(default)]
    pub value: Option<U256>,

    /// Explicit call gas limit. If not provided, the builder estimates the
    /// gas for executing the call from the entry point to the wallet.
    #[serde(default)]
    pub gas_limit: Option<U256>,

    /// Maximum fee per gas (in wei). Filled from chain fee data only when
    /// strictly absent; an explicit zero is preserved.
    #[serde(default)]
    pub max_fee_per_gas: Option<u128>,

    /// Maximum priority fee per gas (in wei). Same absent-vs-zero semantics
    /// as `max_fee_per_gas`.
    #[serde(default)]
    pub max_priority_fee_per_gas: Option<u128>,

    #[serde(default)]
    pub is_delegate_call: bool,

    /// Replay-protection lane this operation's nonce is scoped to.
    #[serde(default)]
    pub batch_id: U256,
}

impl TransactionDetails {
    pub fn new(target: Address, value: U256, data: Bytes) -> Self {
        Self {
            target: Some(target),
            data,
            value: Some(value),
            ..Default::default()
        }
    }

    /// True when this is the no-op transfer placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.target.is_none() && self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_requires_both_fields_empty() {
        assert!(TransactionDetails::default().is_placeholder());

        let with_data = TransactionDetails {
            data: Bytes::from(vec![0xde, 0xad]),
            ..Default::default()
        };
        assert!(!with_data.is_placeholder());

        let with_target = TransactionDetails {
            target: Some(Address::ZERO),
            ..Default::default()
        };
        assert!(!with_target.is_placeholder());
    }

    #[test]
    fn deserializes_with_camel_case_and_defaults() {
        let details: TransactionDetails = serde_json::from_str(
            r#"{"target":"0x1111111111111111111111111111111111111111","maxFeePerGas":0,"isDelegateCall":true}"#,
        )
        .unwrap();

        assert!(details.data.is_empty());
        assert_eq!(details.max_fee_per_gas, Some(0));
        assert_eq!(details.max_priority_fee_per_gas, None);
        assert!(details.is_delegate_call);
        assert_eq!(details.batch_id, U256::ZERO);
    }
}
