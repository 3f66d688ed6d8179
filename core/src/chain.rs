use alloy::{
    eips::eip1559::Eip1559Estimation,
    network::TransactionBuilder,
    primitives::{Address, Bytes},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    transports::http::reqwest::Url,
};

use crate::error::{AlloyRpcErrorToSdkError, SdkError};

/// Read-only view of a chain: the queries the user-operation pipeline
/// needs. Failures propagate unmodified as [`SdkError::RpcError`]; no
/// retries happen at this layer.
pub trait ChainReader: Send + Sync {
    fn chain_id(&self) -> u64;

    /// Code currently deployed at `address` (empty bytes if none).
    #[allow(async_fn_in_trait)]
    async fn get_code(&self, address: Address) -> Result<Bytes, SdkError>;

    /// Gas estimate for executing `data` in a call from `from` to `to`.
    #[allow(async_fn_in_trait)]
    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes)
    -> Result<u64, SdkError>;

    /// Current EIP-1559 fee estimate.
    #[allow(async_fn_in_trait)]
    async fn fee_data(&self) -> Result<Eip1559Estimation, SdkError>;

    /// Static call from `from` to `to`, returning the raw return data.
    #[allow(async_fn_in_trait)]
    async fn call(&self, from: Address, to: Address, data: Bytes) -> Result<Bytes, SdkError>;
}

pub trait Chain: ChainReader {
    fn rpc_url(&self) -> Url;
    fn provider(&self) -> &RootProvider;
}

pub struct ChainConfig<'a> {
    pub chain_id: u64,
    pub rpc_url: &'a str,
}

#[derive(Clone)]
pub struct EvmChain {
    chain_id: u64,
    rpc_url: Url,
    pub provider: RootProvider,
}

impl ChainConfig<'_> {
    pub fn to_chain(&self) -> Result<EvmChain, SdkError> {
        let rpc_url = Url::parse(self.rpc_url).map_err(|e| SdkError::RpcConfigError {
            message: format!("Failed to parse RPC URL: {e}"),
        })?;

        Ok(EvmChain {
            chain_id: self.chain_id,
            provider: ProviderBuilder::new()
                .disable_recommended_fillers()
                .connect_http(rpc_url.clone()),
            rpc_url,
        })
    }
}

impl ChainReader for EvmChain {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, SdkError> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| e.to_sdk_error(self))
    }

    async fn estimate_gas(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<u64, SdkError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);

        self.provider
            .estimate_gas(tx)
            .await
            .map_err(|e| e.to_sdk_error(self))
    }

    async fn fee_data(&self) -> Result<Eip1559Estimation, SdkError> {
        self.provider
            .estimate_eip1559_fees()
            .await
            .map_err(|e| e.to_sdk_error(self))
    }

    async fn call(&self, from: Address, to: Address, data: Bytes) -> Result<Bytes, SdkError> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(data);

        self.provider
            .call(tx)
            .await
            .map_err(|e| e.to_sdk_error(self))
    }
}

impl Chain for EvmChain {
    fn rpc_url(&self) -> Url {
        self.rpc_url.clone()
    }

    fn provider(&self) -> &RootProvider {
        &self.provider
    }
}
