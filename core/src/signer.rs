use alloy::{
    primitives::{Address, B256, Bytes},
    signers::{Signer, local::PrivateKeySigner},
};

use crate::error::SdkError;

/// Capability to sign a 32-byte digest. The user-operation pipeline signs
/// request ids through this, so wallet owners can plug in whatever key
/// management they use.
pub trait DigestSigner: Send + Sync {
    fn address(&self) -> Address;

    #[allow(async_fn_in_trait)]
    async fn sign_digest(&self, digest: B256) -> Result<Bytes, SdkError>;
}

impl DigestSigner for PrivateKeySigner {
    fn address(&self) -> Address {
        PrivateKeySigner::address(self)
    }

    async fn sign_digest(&self, digest: B256) -> Result<Bytes, SdkError> {
        let signature =
            self.sign_hash(&digest)
                .await
                .map_err(|e| SdkError::SigningError {
                    message: e.to_string(),
                })?;

        Ok(signature.as_bytes().to_vec().into())
    }
}
