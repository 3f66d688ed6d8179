use alloy::{
    primitives::{Address, B256, Bytes, U256},
    sol,
    sol_types::SolCall,
};
use relaykit_core::{chain::ChainReader, error::SdkError, signer::DigestSigner};

use super::SmartWalletAccount;

sol! {
    function deployCounterFactualWallet(address owner, address entryPoint, address handler, uint256 index) returns (address);
}

sol! {
    function getNonce(uint256 batchId) view returns (uint256);
}

sol! {
    function execFromEntryPoint(address dest, uint256 value, bytes func, uint8 operation, uint256 gasLimit);
}

/// A smart wallet deployed (or deployable) through a wallet factory.
///
/// `wallet_address` is the wallet's deployed or counterfactual address; for
/// a wallet that has never been resolved, construct it from the builder's
/// `resolve_address` result. Nonce lookups against an address with no code
/// report zero rather than failing, since an undeployed wallet has never
/// consumed a nonce.
pub struct FactoryDeployedWallet<'a, C: ChainReader, S: DigestSigner> {
    pub chain: &'a C,
    pub signer: S,
    pub factory_address: Address,
    pub entry_point: Address,
    pub fallback_handler: Address,
    pub index: U256,
    pub wallet_address: Address,
}

impl<C: ChainReader, S: DigestSigner> SmartWalletAccount for FactoryDeployedWallet<'_, C, S> {
    async fn wallet_init_code(&self) -> Result<Bytes, SdkError> {
        // initCode = factory address followed by the factory create call
        let mut init_code: Vec<u8> = self.factory_address.into_array().to_vec();

        let create_call = deployCounterFactualWalletCall {
            owner: self.signer.address(),
            entryPoint: self.entry_point,
            handler: self.fallback_handler,
            index: self.index,
        }
        .abi_encode();

        init_code.extend_from_slice(&create_call);
        Ok(Bytes::from(init_code))
    }

    async fn nonce(&self, batch_id: U256) -> Result<U256, SdkError> {
        let data = getNonceCall { batchId: batch_id }.abi_encode();

        let ret = self
            .chain
            .call(Address::ZERO, self.wallet_address, data.into())
            .await?;

        if ret.is_empty() {
            // No code at the wallet address yet, so no nonce consumed
            return Ok(U256::ZERO);
        }

        getNonceCall::abi_decode_returns(&ret).map_err(|e| {
            SdkError::contract_decoding_error(
                Some(self.wallet_address),
                self.chain.chain_id(),
                e.to_string(),
            )
        })
    }

    async fn encode_execute(
        &self,
        target: Address,
        value: U256,
        data: &Bytes,
        is_delegate_call: bool,
    ) -> Result<Bytes, SdkError> {
        let operation: u8 = if is_delegate_call { 1 } else { 0 };

        Ok(execFromEntryPointCall {
            dest: target,
            value,
            func: data.clone(),
            operation,
            // 0 forwards all available gas
            gasLimit: U256::ZERO,
        }
        .abi_encode()
        .into())
    }

    async fn sign_request_id(&self, request_id: B256) -> Result<Bytes, SdkError> {
        self.signer.sign_digest(request_id).await
    }
}
