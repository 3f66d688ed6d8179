use alloy::primitives::{Address, address};

/// Entry point this SDK targets when the caller does not configure one.
pub const DEFAULT_ENTRYPOINT_ADDRESS: Address =
    address!("0x5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

/// Baseline gas reserved for signature/nonce verification of a user
/// operation, before any deployment overhead is added.
pub const DEFAULT_VERIFICATION_GAS_LIMIT: u64 = 100_000;

/// Call gas limit used for the empty-intent transfer placeholder.
pub const TRANSFER_CALL_GAS_LIMIT: u64 = 21_000;

/// Fixed cost assumed for posting a user operation's call data on-chain.
pub const PRE_VERIFICATION_BASE_COST: u64 = 21_000;

/// Assumed bundle size when deriving pre-verification gas. Bundling is not
/// implemented anywhere yet, so this stays at 1.
pub const DEFAULT_BUNDLE_SIZE: u64 = 1;
