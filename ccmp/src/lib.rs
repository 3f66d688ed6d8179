//! Cross-chain deposit-and-call orchestration: turns a token-transfer
//! request into a liquidity-pool `depositAndCall` intent that the
//! user-operation builder can sign.

pub mod manager;
pub mod node;
pub mod types;

pub use manager::{DepositAndCallManager, PreDepositChecker, TransferFeeEstimator};
pub use types::{MessagePayload, OptionalTransferArgs, RouterAdaptor, TokenTransferArgs};
