use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainInfo {
    pub chain_id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_point_address: Option<Address>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedChainsResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
    pub data: Vec<ChainInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualChainResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<u16>,
    pub data: Option<ChainInfo>,
}

/// Query arguments for the liquidity-pool gas-estimate endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPoolInfoDto {
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    pub token_address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetPoolInfoResponse {
    pub pool_address: Address,
    pub available_liquidity: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreDepositCheckDto {
    pub token_address: Address,
    pub from_address: Address,
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    pub amount: U256,
}

/// Admissibility verdict for a deposit: `status` false means the transfer
/// is currently not possible, with an optional service-supplied reason.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreDepositCheckResponse {
    pub status: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTokenTransferFeeEstimateDto {
    pub from_address: Address,
    pub token_address: Address,
    pub amount: U256,
    pub from_chain_id: u64,
    pub to_chain_id: u64,
    pub adaptor_name: String,
}

/// Gas-fee payment arguments as quoted by the fee estimator. Consumed
/// opaquely by the cross-chain orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasFeePayment {
    pub relayer: Address,
    pub fee_token_address: Address,
    pub fee_amount: U256,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateTransferFeeResponse {
    pub gas_fee: GasFeePayment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn pre_deposit_response_reason_is_optional() {
        let ok: PreDepositCheckResponse = serde_json::from_str(r#"{"status":true}"#).unwrap();
        assert!(ok.status);
        assert!(ok.reason.is_none());

        let failed: PreDepositCheckResponse =
            serde_json::from_str(r#"{"status":false,"reason":"insufficient liquidity"}"#).unwrap();
        assert!(!failed.status);
        assert_eq!(failed.reason.as_deref(), Some("insufficient liquidity"));
    }

    #[test]
    fn fee_estimate_uses_camel_case_wire_names() {
        let response: EstimateTransferFeeResponse = serde_json::from_str(
            r#"{"gasFee":{"relayer":"0x1111111111111111111111111111111111111111","feeTokenAddress":"0x2222222222222222222222222222222222222222","feeAmount":"0x64"}}"#,
        )
        .unwrap();

        assert_eq!(
            response.gas_fee.relayer,
            address!("0x1111111111111111111111111111111111111111")
        );
        assert_eq!(response.gas_fee.fee_amount, U256::from(100));
    }
}
