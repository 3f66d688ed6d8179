use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use serde::{Deserialize, Serialize};

sol! {
    struct GasFeePaymentArgs {
        address feeTokenAddress;
        uint256 feeAmount;
        address relayer;
    }

    struct MessagePayloadStruct {
        address to;
        bytes _calldata;
    }

    struct DepositAndCallArgs {
        uint256 toChainId;
        address tokenAddress;
        address receiver;
        uint256 amount;
        string tag;
        MessagePayloadStruct[] payloads;
        GasFeePaymentArgs gasFeePaymentArgs;
        string adaptorName;
        bytes routerArgs;
        bytes[] hyphenArgs;
    }

    function depositAndCall(DepositAndCallArgs args);
}

/// Cross-chain message router the liquidity pool relays through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterAdaptor {
    Wormhole,
    Axelar,
    Abacus,
}

impl RouterAdaptor {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouterAdaptor::Wormhole => "wormhole",
            RouterAdaptor::Axelar => "axelar",
            RouterAdaptor::Abacus => "abacus",
        }
    }
}

/// A contract call to execute on the destination chain once the deposit
/// is relayed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub to: Address,
    pub data: Bytes,
}

/// Adaptor-specific knobs. Only wormhole reads the consistency level.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterArgs {
    #[serde(default)]
    pub consistency_level: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTransferArgs {
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    /// Token to bridge. Can be the native-token sentinel address.
    pub token_address: Address,
    pub receiver: Address,
    pub amount: U256,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub payloads: Vec<MessagePayload>,
    pub adaptor_name: RouterAdaptor,
    #[serde(default)]
    pub router_args: RouterArgs,
}

/// Reclaim parameters for the hyphen bridge. Both must be present for
/// them to take effect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionalTransferArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<U256>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reclaimer_eoa: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptor_names_match_the_wire_format() {
        assert_eq!(RouterAdaptor::Wormhole.as_str(), "wormhole");
        assert_eq!(
            serde_json::to_string(&RouterAdaptor::Axelar).unwrap(),
            r#""axelar""#
        );
        assert_eq!(
            serde_json::from_str::<RouterAdaptor>(r#""abacus""#).unwrap(),
            RouterAdaptor::Abacus
        );
    }

    #[test]
    fn transfer_args_default_optional_sections() {
        let args: TokenTransferArgs = serde_json::from_str(
            r#"{
                "fromChainId": 1,
                "toChainId": 137,
                "tokenAddress": "0x1111111111111111111111111111111111111111",
                "receiver": "0x2222222222222222222222222222222222222222",
                "amount": "0x64",
                "adaptorName": "wormhole"
            }"#,
        )
        .unwrap();

        assert!(args.tag.is_empty());
        assert!(args.payloads.is_empty());
        assert_eq!(args.router_args.consistency_level, 0);
    }
}
