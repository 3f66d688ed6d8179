use alloy::{
    primitives::{Address, B256, Bytes, U256},
    sol,
    sol_types::SolCall,
};
use relaykit_aa_types::{UserOperation, compute_request_id};
use relaykit_core::{
    chain::ChainReader,
    constants::{
        DEFAULT_BUNDLE_SIZE, DEFAULT_ENTRYPOINT_ADDRESS, DEFAULT_VERIFICATION_GAS_LIMIT,
        PRE_VERIFICATION_BASE_COST, TRANSFER_CALL_GAS_LIMIT,
    },
    error::SdkError,
    transaction::TransactionDetails,
};

use crate::wallet::{NoPaymaster, Paymaster, SmartWalletAccount};

sol! {
    function getSenderAddress(bytes initCode) returns (address sender);
}

/// Named gas defaults used while filling a user operation. Overridable per
/// deployment; the defaults match the workspace constants.
#[derive(Debug, Clone, Copy)]
pub struct GasConfig {
    /// Baseline verification gas; deployment overhead is added on top while
    /// the wallet is undeployed.
    pub verification_gas_limit: U256,
    /// Call gas limit for the no-op transfer placeholder.
    pub transfer_call_gas_limit: U256,
    /// Fixed cost assumed for posting call data on-chain.
    pub pre_verification_base_cost: U256,
    /// Assumed bundle size for pre-verification gas. Always 1 today.
    pub bundle_size: u64,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            verification_gas_limit: U256::from(DEFAULT_VERIFICATION_GAS_LIMIT),
            transfer_call_gas_limit: U256::from(TRANSFER_CALL_GAS_LIMIT),
            pre_verification_base_cost: U256::from(PRE_VERIFICATION_BASE_COST),
            bundle_size: DEFAULT_BUNDLE_SIZE,
        }
    }
}

/// Builds and signs user operations for one smart wallet, hiding whether
/// that wallet is already deployed.
///
/// The wallet's address and deployment state are memoized: the address is
/// resolved at most once for the builder's lifetime, and once on-chain code
/// has been observed the deployment check is never issued again. The
/// memoized fields make a builder single-caller; run concurrent flows on
/// separate instances.
pub struct UserOpBuilder<'a, C: ChainReader, W: SmartWalletAccount, P: Paymaster = NoPaymaster> {
    wallet: W,
    chain: &'a C,
    entry_point: Address,
    paymaster: Option<P>,
    gas: GasConfig,

    configured_address: Option<Address>,
    resolved_address: Option<Address>,
    is_phantom: bool,
}

impl<'a, C: ChainReader, W: SmartWalletAccount> UserOpBuilder<'a, C, W, NoPaymaster> {
    pub fn new(wallet: W, chain: &'a C) -> Self {
        Self {
            wallet,
            chain,
            entry_point: DEFAULT_ENTRYPOINT_ADDRESS,
            paymaster: None,
            gas: GasConfig::default(),
            configured_address: None,
            resolved_address: None,
            is_phantom: true,
        }
    }
}

impl<'a, C: ChainReader, W: SmartWalletAccount, P: Paymaster> UserOpBuilder<'a, C, W, P> {
    /// Use an explicit wallet address instead of deriving the
    /// counterfactual one.
    pub fn with_wallet_address(mut self, address: Address) -> Self {
        self.configured_address = Some(address);
        self
    }

    /// Target a different entry point than the canonical v0.6 deployment.
    pub fn with_entry_point(mut self, entry_point: Address) -> Self {
        self.entry_point = entry_point;
        self
    }

    pub fn with_gas_config(mut self, gas: GasConfig) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_paymaster<P2: Paymaster>(self, paymaster: P2) -> UserOpBuilder<'a, C, W, P2> {
        UserOpBuilder {
            wallet: self.wallet,
            chain: self.chain,
            entry_point: self.entry_point,
            paymaster: Some(paymaster),
            gas: self.gas,
            configured_address: self.configured_address,
            resolved_address: self.resolved_address,
            is_phantom: self.is_phantom,
        }
    }

    pub fn entry_point(&self) -> Address {
        self.entry_point
    }

    /// The wallet's address, valid even before deployment.
    ///
    /// An explicitly configured address is returned unconditionally and
    /// never triggers a chain query. Otherwise the entry point's
    /// counterfactual-address function is consulted exactly once and the
    /// result cached for the builder's lifetime.
    pub async fn resolve_address(&mut self) -> Result<Address, SdkError> {
        if let Some(address) = self.resolved_address {
            return Ok(address);
        }

        let address = match self.configured_address {
            Some(address) => address,
            None => self.counterfactual_address().await?,
        };

        self.resolved_address = Some(address);
        Ok(address)
    }

    async fn counterfactual_address(&self) -> Result<Address, SdkError> {
        let init_code = self.wallet.wallet_init_code().await?;
        let data = getSenderAddressCall {
            initCode: init_code,
        }
        .abi_encode();

        let ret = self
            .chain
            .call(Address::ZERO, self.entry_point, data.into())
            .await?;

        getSenderAddressCall::abi_decode_returns(&ret).map_err(|e| {
            SdkError::contract_decoding_error(
                Some(self.entry_point),
                self.chain.chain_id(),
                e.to_string(),
            )
        })
    }

    /// Whether the wallet currently has on-chain code.
    ///
    /// Deployment is irreversible, so a `true` result is terminal: no
    /// further code query is ever issued for this builder.
    pub async fn is_deployed(&mut self) -> Result<bool, SdkError> {
        if !self.is_phantom {
            return Ok(true);
        }

        let address = self.resolve_address().await?;
        let code = self.chain.get_code(address).await?;
        if !code.is_empty() {
            tracing::debug!(wallet = %address, "wallet contract already deployed");
            self.is_phantom = false;
        }

        Ok(!self.is_phantom)
    }

    /// The initCode value for the next operation: the factory deployment
    /// bytes while the wallet is undeployed, empty bytes afterwards.
    pub async fn build_init_code(&mut self) -> Result<Bytes, SdkError> {
        if self.is_deployed().await? {
            return Ok(Bytes::default());
        }
        self.wallet.wallet_init_code().await
    }

    /// Fill call data and its gas limit from the intent.
    ///
    /// An empty-target, empty-payload intent is a no-op transfer
    /// placeholder and short-circuits to empty call data with a minimal
    /// fixed gas limit.
    pub async fn build_call_data_and_gas_limit(
        &mut self,
        details: &TransactionDetails,
    ) -> Result<(Bytes, U256), SdkError> {
        if details.is_placeholder() {
            return Ok((Bytes::default(), self.gas.transfer_call_gas_limit));
        }

        let value = details.value.unwrap_or(U256::ZERO);
        let call_data = self
            .wallet
            .encode_execute(
                details.target.unwrap_or(Address::ZERO),
                value,
                &details.data,
                details.is_delegate_call,
            )
            .await?;

        let call_gas_limit = match details.gas_limit {
            Some(limit) => limit,
            None => {
                let sender = self.resolve_address().await?;
                let estimate = self
                    .chain
                    .estimate_gas(self.entry_point, sender, call_data.clone())
                    .await?;
                U256::from(estimate)
            }
        };

        Ok((call_data, call_gas_limit))
    }

    /// Verification gas: the fixed baseline, plus the estimated cost of the
    /// counterfactual-address call while the init code is non-empty, since
    /// deployment overhead is folded into verification.
    pub async fn build_verification_gas_limit(
        &self,
        init_code: &Bytes,
    ) -> Result<U256, SdkError> {
        let mut verification_gas_limit = self.gas.verification_gas_limit;

        if !init_code.is_empty() {
            let data = getSenderAddressCall {
                initCode: init_code.clone(),
            }
            .abi_encode();

            let init_gas = self
                .chain
                .estimate_gas(Address::ZERO, self.entry_point, data.into())
                .await?;
            verification_gas_limit += U256::from(init_gas);
        }

        Ok(verification_gas_limit)
    }

    /// Cost of posting the operation's call data on-chain plus overhead.
    /// The division by bundle size rounds down; bundle size is fixed at 1
    /// until bundling exists, making this formula provisional.
    pub fn build_pre_verification_gas(&self, _userop: &UserOperation) -> U256 {
        self.gas.pre_verification_base_cost / U256::from(self.gas.bundle_size)
    }

    /// Fee fields for the operation. Values the intent supplies are used
    /// unchanged, including an explicit zero; only strictly-absent fields
    /// are filled from the chain's current fee estimate.
    pub async fn build_fee_fields(
        &self,
        details: &TransactionDetails,
    ) -> Result<(U256, U256), SdkError> {
        let mut max_fee_per_gas = details.max_fee_per_gas;
        let mut max_priority_fee_per_gas = details.max_priority_fee_per_gas;

        if max_fee_per_gas.is_none() || max_priority_fee_per_gas.is_none() {
            let fees = self.chain.fee_data().await?;
            max_fee_per_gas = max_fee_per_gas.or(Some(fees.max_fee_per_gas));
            max_priority_fee_per_gas =
                max_priority_fee_per_gas.or(Some(fees.max_priority_fee_per_gas));
        }

        Ok((
            U256::from(max_fee_per_gas.unwrap_or_default()),
            U256::from(max_priority_fee_per_gas.unwrap_or_default()),
        ))
    }

    /// The operation's request id: the value that is actually signed. This
    /// matches what the entry point computes on-chain, so no view call is
    /// needed. The signature field is excluded from the hash.
    pub fn request_id(&self, userop: &UserOperation) -> B256 {
        compute_request_id(userop, self.entry_point, self.chain.chain_id())
    }

    /// Create a user operation with every field filled except the
    /// signature.
    pub async fn create_unsigned_user_op(
        &mut self,
        details: &TransactionDetails,
    ) -> Result<UserOperation, SdkError> {
        let (call_data, call_gas_limit) = self.build_call_data_and_gas_limit(details).await?;
        let init_code = self.build_init_code().await?;

        tracing::debug!(init_code_len = init_code.len(), "init code determined");

        let verification_gas_limit = self.build_verification_gas_limit(&init_code).await?;
        let (max_fee_per_gas, max_priority_fee_per_gas) = self.build_fee_fields(details).await?;
        let nonce = self.wallet.nonce(details.batch_id).await?;
        let sender = self.resolve_address().await?;

        let mut userop = UserOperation {
            sender,
            nonce,
            init_code,
            call_data,
            call_gas_limit,
            verification_gas_limit,
            pre_verification_gas: U256::ZERO,
            max_fee_per_gas,
            max_priority_fee_per_gas,
            paymaster_and_data: Bytes::default(),
            signature: Bytes::default(),
        };

        userop.pre_verification_gas = self.build_pre_verification_gas(&userop);

        userop.paymaster_and_data = match &self.paymaster {
            Some(paymaster) => paymaster.paymaster_and_data(&userop).await?,
            None => Bytes::default(),
        };

        tracing::debug!(sender = %userop.sender, nonce = %userop.nonce, "user operation assembled");

        Ok(userop)
    }

    /// Sign the filled operation over its request id. The signature field
    /// of the input is ignored, not validated.
    pub async fn sign_user_op(&self, userop: &UserOperation) -> Result<UserOperation, SdkError> {
        let request_id = self.request_id(userop);

        tracing::debug!(request_id = %request_id, "signing user operation");

        let signature = self.wallet.sign_request_id(request_id).await?;

        Ok(UserOperation {
            signature,
            ..userop.clone()
        })
    }

    /// Create and sign a user operation. The primary entry point for
    /// callers.
    pub async fn create_signed_user_op(
        &mut self,
        details: &TransactionDetails,
    ) -> Result<UserOperation, SdkError> {
        let userop = self.create_unsigned_user_op(details).await?;
        self.sign_user_op(&userop).await
    }
}
