//! HTTP client for the backend node service: chain metadata and the
//! cross-chain liquidity-pool endpoints the SDK consumes. Plain JSON over
//! GET/POST; every endpoint is treated as an opaque remote procedure call
//! and failures surface without retries.

use alloy::primitives::Address;
use base64::Engine;
use relaykit_core::error::SdkError;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use url::Url;

pub mod types;

use types::{
    EstimateTransferFeeResponse, GetPoolInfoDto, GetPoolInfoResponse,
    GetTokenTransferFeeEstimateDto, IndividualChainResponse, PreDepositCheckDto,
    PreDepositCheckResponse, SupportedChainsResponse,
};

#[derive(Error, Debug)]
pub enum NodeClientError {
    #[error("Invalid node service URL: {0}")]
    BaseUrl(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Node service returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<NodeClientError> for SdkError {
    fn from(error: NodeClientError) -> Self {
        SdkError::NodeServiceError {
            message: error.to_string(),
        }
    }
}

/// Client for the transaction-service ("node") backend.
#[derive(Clone)]
pub struct NodeClient {
    base_url: Url,
    http: reqwest::Client,
}

impl NodeClient {
    pub fn new(tx_service_url: &str) -> Result<Self, NodeClientError> {
        let base_url = Url::parse(tx_service_url)
            .map_err(|e| NodeClientError::BaseUrl(format!("{tx_service_url}: {e}")))?;

        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    pub fn with_http_client(tx_service_url: &str, http: reqwest::Client) -> Result<Self, NodeClientError> {
        let base_url = Url::parse(tx_service_url)
            .map_err(|e| NodeClientError::BaseUrl(format!("{tx_service_url}: {e}")))?;

        Ok(Self { base_url, http })
    }

    fn endpoint(&self, path: &str) -> Result<Url, NodeClientError> {
        self.base_url
            .join(path)
            .map_err(|e| NodeClientError::BaseUrl(format!("{path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, NodeClientError> {
        tracing::debug!(url = %url, "GET node service");
        let response = self.http.get(url).send().await?;
        Self::parse(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<T, NodeClientError> {
        tracing::debug!(url = %url, "POST node service");
        let response = self.http.post(url).json(body).send().await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, NodeClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NodeClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }

    /// The list of chains the service supports, with their configurations.
    pub async fn get_supported_chains(&self) -> Result<SupportedChainsResponse, NodeClientError> {
        self.get_json(self.endpoint("chains/")?).await
    }

    pub async fn get_chain_by_id(
        &self,
        chain_id: u64,
    ) -> Result<IndividualChainResponse, NodeClientError> {
        self.get_json(self.endpoint(&format!("chains/{chain_id}"))?)
            .await
    }

    /// Tokens the liquidity pool can bridge out of the given chain.
    pub async fn get_cross_chain_supported_tokens(
        &self,
        chain_id: u64,
    ) -> Result<Vec<Address>, NodeClientError> {
        self.get_json(self.endpoint(&format!(
            "cross-chain/liquidity-pool/tokens/chainId/{chain_id}"
        ))?)
        .await
    }

    pub async fn get_liquidity_pool_info(
        &self,
        dto: &GetPoolInfoDto,
    ) -> Result<GetPoolInfoResponse, NodeClientError> {
        let mut url = self.endpoint("cross-chain/liquidity-pool/gas-estimate")?;
        url.set_query(Some(&to_query_string(dto)?));
        self.get_json(url).await
    }

    pub async fn pre_deposit_check(
        &self,
        dto: &PreDepositCheckDto,
    ) -> Result<PreDepositCheckResponse, NodeClientError> {
        self.post_json(
            self.endpoint("cross-chain/liquidity-pool/pre-deposit-check")?,
            dto,
        )
        .await
    }

    /// Fee quote for a cross-chain token transfer. The service expects the
    /// request serialized as a base64 `params` query argument.
    pub async fn get_token_transfer_fee_estimate(
        &self,
        dto: &GetTokenTransferFeeEstimateDto,
    ) -> Result<EstimateTransferFeeResponse, NodeClientError> {
        let params = base64::engine::general_purpose::STANDARD.encode(serde_json::to_vec(dto)?);

        let mut url = self.endpoint("cross-chain/liquidity-pool/estimate-token-transfer-fee")?;
        url.query_pairs_mut().append_pair("params", &params);
        self.get_json(url).await
    }
}

fn to_query_string<B: Serialize>(body: &B) -> Result<String, NodeClientError> {
    let value = serde_json::to_value(body)?;
    let map = value.as_object().ok_or_else(|| {
        NodeClientError::Serialization(<serde_json::Error as serde::ser::Error>::custom(
            "query arguments must serialize to an object",
        ))
    })?;

    let mut pairs = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in map {
        match value {
            serde_json::Value::String(s) => {
                pairs.append_pair(key, s);
            }
            other => {
                pairs.append_pair(key, &other.to_string());
            }
        }
    }
    Ok(pairs.finish())
}
