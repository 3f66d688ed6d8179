//! Node-service backing for the orchestrator's capabilities.

use relaykit_core::error::SdkError;
use relaykit_node_client::NodeClient;
use relaykit_node_client::types::{
    GasFeePayment, GetTokenTransferFeeEstimateDto, PreDepositCheckDto, PreDepositCheckResponse,
};

use crate::manager::{PreDepositChecker, TransferFeeEstimator};

impl PreDepositChecker for NodeClient {
    async fn pre_deposit_check(
        &self,
        dto: &PreDepositCheckDto,
    ) -> Result<PreDepositCheckResponse, SdkError> {
        Ok(NodeClient::pre_deposit_check(self, dto).await?)
    }
}

impl TransferFeeEstimator for NodeClient {
    async fn estimate_transfer_fee(
        &self,
        dto: &GetTokenTransferFeeEstimateDto,
    ) -> Result<GasFeePayment, SdkError> {
        let response = self.get_token_transfer_fee_estimate(dto).await?;
        Ok(response.gas_fee)
    }
}
