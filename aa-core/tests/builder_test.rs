use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use alloy::{
    eips::eip1559::Eip1559Estimation,
    primitives::{Address, B256, Bytes, U256, address},
    sol_types::SolValue,
};
use relaykit_aa_core::{
    userop::{GasConfig, UserOpBuilder},
    wallet::{Paymaster, SmartWalletAccount},
};
use relaykit_aa_types::{UserOperation, compute_request_id};
use relaykit_core::{
    chain::ChainReader, constants::DEFAULT_ENTRYPOINT_ADDRESS, error::SdkError,
    transaction::TransactionDetails,
};

const WALLET_ADDRESS: Address = address!("0xAAaAaAaaAaAaAaaAaAAAAAAAAaaaAaAaAaaAaaAa");
const COUNTERFACTUAL: Address = address!("0xC0FFEE00000000000000000000000000000000cf");

const INIT_GAS_ESTIMATE: u64 = 55_000;
const CALL_GAS_ESTIMATE: u64 = 88_000;
const MAX_FEE: u128 = 30_000_000_000;
const MAX_PRIORITY_FEE: u128 = 1_500_000_000;

/// Chain double that serves canned responses and counts every query.
struct MockChain {
    code: Mutex<Bytes>,
    get_code_calls: AtomicUsize,
    static_call_calls: AtomicUsize,
    estimate_gas_calls: AtomicUsize,
    fee_data_calls: AtomicUsize,
}

impl MockChain {
    fn deployed() -> Self {
        Self::with_code(Bytes::from(vec![0x60, 0x80]))
    }

    fn undeployed() -> Self {
        Self::with_code(Bytes::default())
    }

    fn with_code(code: Bytes) -> Self {
        Self {
            code: Mutex::new(code),
            get_code_calls: AtomicUsize::new(0),
            static_call_calls: AtomicUsize::new(0),
            estimate_gas_calls: AtomicUsize::new(0),
            fee_data_calls: AtomicUsize::new(0),
        }
    }

    fn set_code(&self, code: Bytes) {
        *self.code.lock().unwrap() = code;
    }
}

impl ChainReader for MockChain {
    fn chain_id(&self) -> u64 {
        137
    }

    async fn get_code(&self, _address: Address) -> Result<Bytes, SdkError> {
        self.get_code_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.code.lock().unwrap().clone())
    }

    async fn estimate_gas(
        &self,
        from: Address,
        _to: Address,
        _data: Bytes,
    ) -> Result<u64, SdkError> {
        self.estimate_gas_calls.fetch_add(1, Ordering::SeqCst);
        // The deployment-overhead estimate is issued from the zero address,
        // execution estimates from the entry point.
        if from == Address::ZERO {
            Ok(INIT_GAS_ESTIMATE)
        } else {
            Ok(CALL_GAS_ESTIMATE)
        }
    }

    async fn fee_data(&self) -> Result<Eip1559Estimation, SdkError> {
        self.fee_data_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Eip1559Estimation {
            max_fee_per_gas: MAX_FEE,
            max_priority_fee_per_gas: MAX_PRIORITY_FEE,
        })
    }

    async fn call(&self, _from: Address, _to: Address, _data: Bytes) -> Result<Bytes, SdkError> {
        self.static_call_calls.fetch_add(1, Ordering::SeqCst);
        Ok(COUNTERFACTUAL.abi_encode().into())
    }
}

struct MockWallet {
    nonce: U256,
    signature: Bytes,
}

impl MockWallet {
    fn new() -> Self {
        Self {
            nonce: U256::from(3),
            signature: Bytes::from(vec![0x51, 0x16, 0xab]),
        }
    }

    fn init_code() -> Bytes {
        Bytes::from(vec![0xfa; 40])
    }
}

impl SmartWalletAccount for MockWallet {
    async fn wallet_init_code(&self) -> Result<Bytes, SdkError> {
        Ok(Self::init_code())
    }

    async fn nonce(&self, _batch_id: U256) -> Result<U256, SdkError> {
        Ok(self.nonce)
    }

    async fn encode_execute(
        &self,
        target: Address,
        value: U256,
        data: &Bytes,
        _is_delegate_call: bool,
    ) -> Result<Bytes, SdkError> {
        Ok((target, value, data.clone()).abi_encode().into())
    }

    async fn sign_request_id(&self, _request_id: B256) -> Result<Bytes, SdkError> {
        Ok(self.signature.clone())
    }
}

struct MockPaymaster;

impl Paymaster for MockPaymaster {
    async fn paymaster_and_data(&self, _userop: &UserOperation) -> Result<Bytes, SdkError> {
        Ok(Bytes::from(vec![0x99; 20]))
    }
}

#[tokio::test]
async fn entry_point_defaults_to_the_canonical_address() {
    let chain = MockChain::deployed();
    let builder = UserOpBuilder::new(MockWallet::new(), &chain);
    assert_eq!(builder.entry_point(), DEFAULT_ENTRYPOINT_ADDRESS);

    let custom = address!("0x9999999999999999999999999999999999999999");
    let builder = UserOpBuilder::new(MockWallet::new(), &chain).with_entry_point(custom);
    assert_eq!(builder.entry_point(), custom);
}

#[tokio::test]
async fn explicit_address_never_queries_the_chain() {
    let chain = MockChain::deployed();
    let mut builder =
        UserOpBuilder::new(MockWallet::new(), &chain).with_wallet_address(WALLET_ADDRESS);

    assert_eq!(builder.resolve_address().await.unwrap(), WALLET_ADDRESS);
    assert_eq!(builder.resolve_address().await.unwrap(), WALLET_ADDRESS);
    assert_eq!(chain.static_call_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn counterfactual_address_is_resolved_exactly_once() {
    let chain = MockChain::undeployed();
    let mut builder = UserOpBuilder::new(MockWallet::new(), &chain);

    let first = builder.resolve_address().await.unwrap();
    let second = builder.resolve_address().await.unwrap();

    assert_eq!(first, COUNTERFACTUAL);
    assert_eq!(second, first);
    assert_eq!(chain.static_call_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn deployment_check_is_terminal_once_code_is_seen() {
    let chain = MockChain::deployed();
    let mut builder =
        UserOpBuilder::new(MockWallet::new(), &chain).with_wallet_address(WALLET_ADDRESS);

    assert!(builder.is_deployed().await.unwrap());
    assert_eq!(chain.get_code_calls.load(Ordering::SeqCst), 1);

    // Even if the chain were to report empty code later, the memoized
    // result stands and no further query is issued.
    chain.set_code(Bytes::default());
    assert!(builder.is_deployed().await.unwrap());
    assert_eq!(chain.get_code_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn init_code_is_present_only_while_undeployed() {
    let chain = MockChain::undeployed();
    let mut builder =
        UserOpBuilder::new(MockWallet::new(), &chain).with_wallet_address(WALLET_ADDRESS);

    assert_eq!(
        builder.build_init_code().await.unwrap(),
        MockWallet::init_code()
    );

    // Wallet gets deployed mid-session; the next build switches to empty.
    chain.set_code(Bytes::from(vec![0x60, 0x80]));
    assert_eq!(builder.build_init_code().await.unwrap(), Bytes::default());

    // And stays empty without further code queries.
    let queries_so_far = chain.get_code_calls.load(Ordering::SeqCst);
    assert_eq!(builder.build_init_code().await.unwrap(), Bytes::default());
    assert_eq!(chain.get_code_calls.load(Ordering::SeqCst), queries_so_far);
}

#[tokio::test]
async fn placeholder_intent_short_circuits_call_data_and_gas() {
    let chain = MockChain::deployed();
    let mut builder =
        UserOpBuilder::new(MockWallet::new(), &chain).with_wallet_address(WALLET_ADDRESS);

    // Other intent fields must not matter for the fast path.
    let details = TransactionDetails {
        value: Some(U256::from(5)),
        gas_limit: Some(U256::from(1_000_000)),
        is_delegate_call: true,
        ..Default::default()
    };

    let (call_data, call_gas_limit) =
        builder.build_call_data_and_gas_limit(&details).await.unwrap();

    assert_eq!(call_data, Bytes::default());
    assert_eq!(call_gas_limit, U256::from(21_000));
    assert_eq!(chain.estimate_gas_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn explicit_gas_limit_skips_estimation() {
    let chain = MockChain::deployed();
    let mut builder =
        UserOpBuilder::new(MockWallet::new(), &chain).with_wallet_address(WALLET_ADDRESS);

    let details = TransactionDetails {
        target: Some(Address::ZERO),
        data: Bytes::from(vec![0x01]),
        gas_limit: Some(U256::from(123_456)),
        ..Default::default()
    };

    let (_, call_gas_limit) = builder.build_call_data_and_gas_limit(&details).await.unwrap();

    assert_eq!(call_gas_limit, U256::from(123_456));
    assert_eq!(chain.estimate_gas_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_gas_limit_is_estimated_from_the_entry_point() {
    let chain = MockChain::deployed();
    let mut builder =
        UserOpBuilder::new(MockWallet::new(), &chain).with_wallet_address(WALLET_ADDRESS);

    let details = TransactionDetails {
        target: Some(Address::ZERO),
        data: Bytes::from(vec![0x01]),
        ..Default::default()
    };

    let (_, call_gas_limit) = builder.build_call_data_and_gas_limit(&details).await.unwrap();

    assert_eq!(call_gas_limit, U256::from(CALL_GAS_ESTIMATE));
    assert_eq!(chain.estimate_gas_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn explicit_zero_fee_is_preserved_and_only_missing_field_filled() {
    let chain = MockChain::deployed();
    let builder =
        UserOpBuilder::new(MockWallet::new(), &chain).with_wallet_address(WALLET_ADDRESS);

    let details = TransactionDetails {
        max_fee_per_gas: Some(0),
        ..Default::default()
    };

    let (max_fee, max_priority) = builder.build_fee_fields(&details).await.unwrap();

    assert_eq!(max_fee, U256::ZERO);
    assert_eq!(max_priority, U256::from(MAX_PRIORITY_FEE));
    assert_eq!(chain.fee_data_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn fully_specified_fees_skip_the_fee_query() {
    let chain = MockChain::deployed();
    let builder =
        UserOpBuilder::new(MockWallet::new(), &chain).with_wallet_address(WALLET_ADDRESS);

    let details = TransactionDetails {
        max_fee_per_gas: Some(42),
        max_priority_fee_per_gas: Some(7),
        ..Default::default()
    };

    let (max_fee, max_priority) = builder.build_fee_fields(&details).await.unwrap();

    assert_eq!(max_fee, U256::from(42));
    assert_eq!(max_priority, U256::from(7));
    assert_eq!(chain.fee_data_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn signed_op_for_deployed_wallet_end_to_end() {
    let chain = MockChain::deployed();
    let wallet = MockWallet::new();
    let expected_signature = wallet.signature.clone();
    let mut builder = UserOpBuilder::new(wallet, &chain).with_wallet_address(WALLET_ADDRESS);

    let userop = builder
        .create_signed_user_op(&TransactionDetails::default())
        .await
        .unwrap();

    assert_eq!(userop.sender, WALLET_ADDRESS);
    assert_eq!(userop.call_data, Bytes::default());
    assert_eq!(userop.call_gas_limit, U256::from(21_000));
    assert_eq!(userop.init_code, Bytes::default());
    assert_eq!(userop.nonce, U256::from(3));
    assert_eq!(userop.pre_verification_gas, U256::from(21_000));
    assert_eq!(userop.max_fee_per_gas, U256::from(MAX_FEE));
    assert_eq!(userop.paymaster_and_data, Bytes::default());
    assert_eq!(userop.signature, expected_signature);
}

#[tokio::test]
async fn unsigned_op_for_phantom_wallet_carries_deployment_overhead() {
    let chain = MockChain::undeployed();
    let mut builder =
        UserOpBuilder::new(MockWallet::new(), &chain).with_wallet_address(WALLET_ADDRESS);

    let userop = builder
        .create_unsigned_user_op(&TransactionDetails::default())
        .await
        .unwrap();

    assert_eq!(userop.init_code, MockWallet::init_code());
    assert_eq!(
        userop.verification_gas_limit,
        U256::from(100_000 + INIT_GAS_ESTIMATE)
    );
    assert_eq!(userop.signature, Bytes::default());
}

#[tokio::test]
async fn paymaster_bytes_are_attached_when_configured() {
    let chain = MockChain::deployed();
    let mut builder = UserOpBuilder::new(MockWallet::new(), &chain)
        .with_wallet_address(WALLET_ADDRESS)
        .with_paymaster(MockPaymaster);

    let userop = builder
        .create_unsigned_user_op(&TransactionDetails::default())
        .await
        .unwrap();

    assert_eq!(userop.paymaster_and_data, Bytes::from(vec![0x99; 20]));
}

#[tokio::test]
async fn signing_ignores_any_signature_already_present() {
    let chain = MockChain::deployed();
    let wallet = MockWallet::new();
    let expected_signature = wallet.signature.clone();
    let mut builder = UserOpBuilder::new(wallet, &chain).with_wallet_address(WALLET_ADDRESS);

    let mut userop = builder
        .create_unsigned_user_op(&TransactionDetails::default())
        .await
        .unwrap();
    let unsigned_request_id = builder.request_id(&userop);

    userop.signature = Bytes::from(vec![0xff; 65]);
    let signed = builder.sign_user_op(&userop).await.unwrap();

    assert_eq!(signed.signature, expected_signature);
    // The stale signature did not leak into the request id.
    assert_eq!(
        compute_request_id(&signed, DEFAULT_ENTRYPOINT_ADDRESS, 137),
        unsigned_request_id
    );
}

#[tokio::test]
async fn custom_gas_config_is_honored() {
    let chain = MockChain::deployed();
    let mut builder = UserOpBuilder::new(MockWallet::new(), &chain)
        .with_wallet_address(WALLET_ADDRESS)
        .with_gas_config(GasConfig {
            verification_gas_limit: U256::from(200_000),
            transfer_call_gas_limit: U256::from(30_000),
            pre_verification_base_cost: U256::from(45_000),
            bundle_size: 2,
        });

    let userop = builder
        .create_unsigned_user_op(&TransactionDetails::default())
        .await
        .unwrap();

    assert_eq!(userop.call_gas_limit, U256::from(30_000));
    assert_eq!(userop.verification_gas_limit, U256::from(200_000));
    // 45_000 / 2, rounding down.
    assert_eq!(userop.pre_verification_gas, U256::from(22_500));
}
