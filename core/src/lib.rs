pub mod chain;
pub mod constants;
pub mod error;
pub mod signer;
pub mod transaction;
