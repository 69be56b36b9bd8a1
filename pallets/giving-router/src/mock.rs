extern crate alloc;

use crate as pallet_giving_router;
use polkadot_sdk::frame_support::traits::fungibles::Mutate;
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl, ord_parameter_types,
  traits::{ConstU16, ConstU32, ConstU64, ConstU128, Get, UnixTime},
};
use polkadot_sdk::frame_system;
use polkadot_sdk::frame_system::{EnsureRoot, EnsureSignedBy};
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::{Balance, params};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// Asset id of the base asset in the test environment
pub const BASE_ASSET: u32 = 1;

/// Account wired as the operator capability
pub const OPERATOR: u64 = 10;

/// Account wired as the confirmer capability
pub const CONFIRMER: u64 = 20;

/// Default vault account used by tests
pub const VAULT: u64 = 77;

/// Redeem rate precision: `RATE_ONE` means one base asset unit per share
pub const RATE_ONE: u128 = 1_000_000_000_000;

// State containers for stateful mocks
thread_local! {
    // Vault share ledger: (vault, owner) -> shares
    static VAULT_SHARES: RefCell<BTreeMap<(u64, u64), Balance>> = const { RefCell::new(BTreeMap::new()) };

    // Base asset units minted per share, scaled by RATE_ONE
    static REDEEM_RATE: RefCell<u128> = const { RefCell::new(RATE_ONE) };

    // When set, the next vault redeem fails
    static FAIL_REDEEM: RefCell<bool> = const { RefCell::new(false) };

    // When set, the vault redeem re-enters redeem_donations and records the outcome
    static REENTER_ON_REDEEM: RefCell<bool> = const { RefCell::new(false) };
    static REENTRY_RESULT: RefCell<Option<DispatchResult>> = const { RefCell::new(None) };

    // Mock wall clock, unix seconds
    static NOW: RefCell<u64> = const { RefCell::new(0) };
}

// Helper methods to setup state
pub fn set_share_balance(vault: u64, owner: u64, shares: Balance) {
  VAULT_SHARES.with(|s| s.borrow_mut().insert((vault, owner), shares));
}

pub fn set_redeem_rate(rate: u128) {
  REDEEM_RATE.with(|r| *r.borrow_mut() = rate);
}

pub fn fail_next_redeem() {
  FAIL_REDEEM.with(|f| *f.borrow_mut() = true);
}

pub fn reenter_on_redeem() {
  REENTER_ON_REDEEM.with(|f| *f.borrow_mut() = true);
}

pub fn reentry_result() -> Option<DispatchResult> {
  REENTRY_RESULT.with(|r| r.borrow().clone())
}

pub fn set_now(secs: u64) {
  NOW.with(|n| *n.borrow_mut() = secs);
}

pub fn advance_time(secs: u64) {
  NOW.with(|n| *n.borrow_mut() += secs);
}

pub fn current_time() -> u64 {
  NOW.with(|n| *n.borrow())
}

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    Assets: polkadot_sdk::pallet_assets,
    GivingRouter: pallet_giving_router,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = u64;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<u128>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = u128;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

impl polkadot_sdk::pallet_assets::Config for Test {
  type RuntimeEvent = RuntimeEvent;
  type Balance = u128;
  type AssetId = u32;
  type AssetIdParameter = u32;
  type Currency = Balances;
  type CreateOrigin = polkadot_sdk::frame_support::traits::AsEnsureOriginWithArg<
    frame_system::EnsureSigned<Self::AccountId>,
  >;
  type ForceOrigin = frame_system::EnsureRoot<Self::AccountId>;
  type AssetDeposit = ConstU128<1>;
  type AssetAccountDeposit = ConstU128<1>;
  type MetadataDepositBase = ConstU128<1>;
  type MetadataDepositPerByte = ConstU128<1>;
  type ApprovalDeposit = ConstU128<1>;
  type StringLimit = ConstU32<50>;
  type Freezer = ();
  type Extra = ();
  type ReserveData = ();
  type CallbackHandle = ();
  type WeightInfo = ();
  type RemoveItemsLimit = ConstU32<5>;
  type Holder = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = AssetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct AssetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl polkadot_sdk::pallet_assets::BenchmarkHelper<u32, ()> for AssetBenchmarkHelper {
  fn create_asset_id_parameter(id: u32) -> u32 {
    id
  }
  fn create_reserve_id_parameter(_id: u32) -> () {
    ()
  }
}

/// Mock wall clock driven by the `NOW` thread local
pub struct MockTime;
impl UnixTime for MockTime {
  fn now() -> core::time::Duration {
    core::time::Duration::from_secs(current_time())
  }
}

/// Stateful vault mock: a share ledger plus a configurable redeem rate.
///
/// Redemption burns the owner's shares and mints the base asset to the
/// receiver. The `REENTER_ON_REDEEM` switch makes the redeem call back into
/// `redeem_donations`, modeling a hostile re-entrant vault.
pub struct MockVault;
impl pallet_giving_router::YieldVault<u64> for MockVault {
  fn share_balance(vault: &u64, who: &u64) -> Balance {
    VAULT_SHARES.with(|s| s.borrow().get(&(*vault, *who)).copied().unwrap_or(0))
  }

  fn redeem(
    vault: &u64,
    shares: Balance,
    receiver: &u64,
    owner: &u64,
  ) -> Result<Balance, DispatchError> {
    if FAIL_REDEEM.with(|f| core::mem::take(&mut *f.borrow_mut())) {
      return Err(DispatchError::Other("vault redeem failed"));
    }

    if REENTER_ON_REDEEM.with(|f| core::mem::take(&mut *f.borrow_mut())) {
      let outcome = GivingRouter::redeem_donations(RuntimeOrigin::signed(OPERATOR));
      REENTRY_RESULT.with(|r| *r.borrow_mut() = Some(outcome));
    }

    let held = VAULT_SHARES.with(|s| s.borrow().get(&(*vault, *owner)).copied().unwrap_or(0));
    if shares > held {
      return Err(DispatchError::Other("insufficient vault shares"));
    }
    VAULT_SHARES.with(|s| s.borrow_mut().insert((*vault, *owner), held - shares));

    let rate = REDEEM_RATE.with(|r| *r.borrow());
    let assets_out = shares.saturating_mul(rate) / RATE_ONE;
    if assets_out > 0 {
      <Assets as Mutate<u64>>::mint_into(BASE_ASSET, receiver, assets_out)?;
    }
    Ok(assets_out)
  }
}

ord_parameter_types! {
  pub const OperatorAccount: u64 = OPERATOR;
  pub const ConfirmerAccount: u64 = CONFIRMER;
}

pub struct PalletIdStub;
impl Get<PalletId> for PalletIdStub {
  fn get() -> PalletId {
    PalletId(*primitives::pallet_ids::GIVING_ROUTER_PALLET_ID)
  }
}

impl pallet_giving_router::Config for Test {
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = RouterBenchmarkHelper;
  type Assets = Assets;
  type Currency = Balances;
  type Vault = MockVault;
  type TimeProvider = MockTime;
  type OperatorOrigin = EnsureSignedBy<OperatorAccount, u64>;
  type ConfirmerOrigin = EnsureSignedBy<ConfirmerAccount, u64>;
  type SuperAdminOrigin = EnsureRoot<u64>;
  type PalletId = PalletIdStub;
  type BaseAsset = ConstU32<{ BASE_ASSET }>;
  type DefaultDonationBps = ConstU16<{ params::DEFAULT_DONATION_BPS }>;
  type DefaultRedemptionInterval = ConstU64<{ params::DEFAULT_REDEMPTION_INTERVAL_SECS }>;
  type WeightInfo = ();
}

#[cfg(feature = "runtime-benchmarks")]
pub struct RouterBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<u64> for RouterBenchmarkHelper {
  fn prepare_vault(
    vault: &u64,
    router: &u64,
    shares: primitives::Balance,
  ) -> polkadot_sdk::sp_runtime::DispatchResult {
    set_share_balance(*vault, *router, shares);
    Ok(())
  }

  fn fund_router(
    asset: primitives::AssetKind,
    router: &u64,
    amount: primitives::Balance,
  ) -> polkadot_sdk::sp_runtime::DispatchResult {
    use polkadot_sdk::frame_support::traits::Currency;
    match asset {
      primitives::AssetKind::Native => {
        let _ = Balances::deposit_creating(router, amount);
      }
      primitives::AssetKind::Local(id) => {
        Assets::mint_into(id, router, amount)?;
      }
    }
    Ok(())
  }

  fn advance_past_cooldown() {
    advance_time(params::DEFAULT_REDEMPTION_INTERVAL_SECS + 1);
  }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_assets::GenesisConfig::<Test> {
    assets: alloc::vec![(BASE_ASSET, 1, true, 1)], // Base asset, owner 1, sufficient, min_bal 1
    metadata: alloc::vec![],
    accounts: alloc::vec![],
    reserves: alloc::vec![],
    next_asset_id: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  // Router genesis: pallet account gets provider ref (ED-free)
  pallet_giving_router::GenesisConfig::<Test>::default()
    .assimilate_storage(&mut t)
    .unwrap();

  // Reset state
  VAULT_SHARES.with(|s| s.borrow_mut().clear());
  REDEEM_RATE.with(|r| *r.borrow_mut() = RATE_ONE);
  FAIL_REDEEM.with(|f| *f.borrow_mut() = false);
  REENTER_ON_REDEEM.with(|f| *f.borrow_mut() = false);
  REENTRY_RESULT.with(|r| *r.borrow_mut() = None);

  // A realistic wall clock well past the default interval, so the first
  // cycle in each test starts available.
  set_now(1_700_000_000);

  t.into()
}
