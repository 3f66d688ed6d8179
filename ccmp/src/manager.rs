use std::collections::HashMap;

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol_types::{SolCall, SolValue};
use relaykit_core::error::SdkError;
use relaykit_core::transaction::TransactionDetails;
use relaykit_node_client::types::{
    GasFeePayment, GetTokenTransferFeeEstimateDto, PreDepositCheckDto, PreDepositCheckResponse,
};

use crate::types::{
    DepositAndCallArgs, GasFeePaymentArgs, MessagePayloadStruct, OptionalTransferArgs,
    RouterAdaptor, TokenTransferArgs, depositAndCallCall,
};

/// Admissibility gate consulted before any deposit is encoded.
pub trait PreDepositChecker: Send + Sync {
    #[allow(async_fn_in_trait)]
    async fn pre_deposit_check(
        &self,
        dto: &PreDepositCheckDto,
    ) -> Result<PreDepositCheckResponse, SdkError>;
}

/// Quotes the relayer fee the pool charges for a cross-chain transfer.
pub trait TransferFeeEstimator: Send + Sync {
    #[allow(async_fn_in_trait)]
    async fn estimate_transfer_fee(
        &self,
        dto: &GetTokenTransferFeeEstimateDto,
    ) -> Result<GasFeePayment, SdkError>;
}

/// Orchestrates a cross-chain token transfer into a single liquidity-pool
/// `depositAndCall` intent. Holds the per-destination-chain pool
/// addresses and a node-service handle for the precondition and fee
/// endpoints.
pub struct DepositAndCallManager<N> {
    liquidity_pools: HashMap<u64, Address>,
    node: N,
}

impl<N> DepositAndCallManager<N> {
    pub fn new(liquidity_pools: HashMap<u64, Address>, node: N) -> Self {
        Self {
            liquidity_pools,
            node,
        }
    }

    pub fn liquidity_pool_for(&self, chain_id: u64) -> Option<Address> {
        self.liquidity_pools.get(&chain_id).copied()
    }

    pub fn node(&self) -> &N {
        &self.node
    }
}

impl<N: PreDepositChecker + TransferFeeEstimator> DepositAndCallManager<N> {
    /// Builds the deposit intent: pool lookup, pre-deposit check, fee
    /// quote, then the encoded `depositAndCall`. The returned
    /// `TransactionDetails` is a one-element batch ready for the
    /// user-operation builder.
    pub async fn create_deposit_and_call_transaction(
        &self,
        sender: Address,
        transfer: &TokenTransferArgs,
        optional: &OptionalTransferArgs,
    ) -> Result<TransactionDetails, SdkError> {
        let pool = self
            .liquidity_pool_for(transfer.to_chain_id)
            .ok_or(SdkError::UnsupportedChain {
                chain_id: transfer.to_chain_id,
            })?;

        let verdict = self
            .node
            .pre_deposit_check(&PreDepositCheckDto {
                token_address: transfer.token_address,
                from_address: sender,
                from_chain_id: transfer.from_chain_id,
                to_chain_id: transfer.to_chain_id,
                amount: transfer.amount,
            })
            .await?;

        if !verdict.status {
            return Err(SdkError::PreDepositCheckFailed {
                reason: verdict
                    .reason
                    .unwrap_or_else(|| "Pre deposit check failed with unknown error".to_string()),
            });
        }

        let gas_fee = self.estimate_transfer_fee(sender, transfer).await?;

        tracing::debug!(
            pool = ?pool,
            to_chain_id = transfer.to_chain_id,
            adaptor = transfer.adaptor_name.as_str(),
            "Encoding depositAndCall"
        );

        let call_data = encode_deposit_and_call(transfer, optional, &gas_fee);

        Ok(TransactionDetails {
            target: Some(pool),
            data: call_data,
            value: Some(U256::ZERO),
            batch_id: U256::from(1),
            ..Default::default()
        })
    }

    pub async fn estimate_transfer_fee(
        &self,
        sender: Address,
        transfer: &TokenTransferArgs,
    ) -> Result<GasFeePayment, SdkError> {
        self.node
            .estimate_transfer_fee(&GetTokenTransferFeeEstimateDto {
                from_address: sender,
                token_address: transfer.token_address,
                amount: transfer.amount,
                from_chain_id: transfer.from_chain_id,
                to_chain_id: transfer.to_chain_id,
                adaptor_name: transfer.adaptor_name.as_str().to_string(),
            })
            .await
    }
}

fn encode_deposit_and_call(
    transfer: &TokenTransferArgs,
    optional: &OptionalTransferArgs,
    gas_fee: &GasFeePayment,
) -> Bytes {
    let args = DepositAndCallArgs {
        toChainId: U256::from(transfer.to_chain_id),
        tokenAddress: transfer.token_address,
        receiver: transfer.receiver,
        amount: transfer.amount,
        tag: transfer.tag.clone(),
        payloads: transfer
            .payloads
            .iter()
            .map(|payload| MessagePayloadStruct {
                to: payload.to,
                _calldata: payload.data.clone(),
            })
            .collect(),
        gasFeePaymentArgs: GasFeePaymentArgs {
            feeTokenAddress: gas_fee.fee_token_address,
            feeAmount: gas_fee.fee_amount,
            relayer: gas_fee.relayer,
        },
        adaptorName: transfer.adaptor_name.as_str().to_string(),
        routerArgs: router_args(transfer),
        hyphenArgs: hyphen_args(optional),
    };

    depositAndCallCall { args }.abi_encode().into()
}

/// Wormhole wants its consistency level threaded through; every other
/// adaptor gets an encoded zero.
pub(crate) fn router_args(transfer: &TokenTransferArgs) -> Bytes {
    let level = match transfer.adaptor_name {
        RouterAdaptor::Wormhole => transfer.router_args.consistency_level,
        _ => 0,
    };
    U256::from(level).abi_encode().into()
}

/// Reclaim arguments are all-or-nothing: the pool only accepts the pair.
pub(crate) fn hyphen_args(optional: &OptionalTransferArgs) -> Vec<Bytes> {
    match (optional.min_amount, optional.reclaimer_eoa) {
        (Some(min_amount), Some(reclaimer_eoa)) => {
            vec![(min_amount, reclaimer_eoa).abi_encode_params().into()]
        }
        _ => vec![],
    }
}
