use alloy::primitives::{Address, B256, Bytes, U256};
use relaykit_aa_types::UserOperation;
use relaykit_core::error::SdkError;

mod factory_wallet;
pub use factory_wallet::FactoryDeployedWallet;

/// Capability set a concrete smart-wallet kind must provide for the
/// user-operation builder to work with it:
///
/// - `wallet_init_code` - the factory deployment bytes that create the
///   wallet; deterministic for a given wallet configuration.
/// - `nonce` - the wallet's current replay-protection counter for a batch
///   lane.
/// - `encode_execute` - the call data that, executed by the entry point
///   through this wallet, performs the requested action.
/// - `sign_request_id` - a signature over a user operation's request id.
pub trait SmartWalletAccount {
    #[allow(async_fn_in_trait)]
    async fn wallet_init_code(&self) -> Result<Bytes, SdkError>;

    #[allow(async_fn_in_trait)]
    async fn nonce(&self, batch_id: U256) -> Result<U256, SdkError>;

    #[allow(async_fn_in_trait)]
    async fn encode_execute(
        &self,
        target: Address,
        value: U256,
        data: &Bytes,
        is_delegate_call: bool,
    ) -> Result<Bytes, SdkError>;

    #[allow(async_fn_in_trait)]
    async fn sign_request_id(&self, request_id: B256) -> Result<Bytes, SdkError>;
}

/// Capability that supplies the `paymasterAndData` bytes for a
/// partially-filled operation (fee sponsorship).
pub trait Paymaster {
    #[allow(async_fn_in_trait)]
    async fn paymaster_and_data(&self, userop: &UserOperation) -> Result<Bytes, SdkError>;
}

/// Paymaster stand-in for wallets that pay their own fees.
pub struct NoPaymaster;

impl Paymaster for NoPaymaster {
    async fn paymaster_and_data(&self, _userop: &UserOperation) -> Result<Bytes, SdkError> {
        Ok(Bytes::default())
    }
}
