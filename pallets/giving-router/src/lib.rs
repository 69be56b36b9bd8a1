//! Giving Router Pallet
//!
//! Redeems yield-bearing vault shares on a fixed cadence and routes a
//! configurable share of the proceeds to weighted donation protocols.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  fn prepare_vault(
    vault: &AccountId,
    router: &AccountId,
    shares: primitives::Balance,
  ) -> frame::deps::sp_runtime::DispatchResult;
  fn fund_router(
    asset: primitives::AssetKind,
    router: &AccountId,
    amount: primitives::Balance,
  ) -> frame::deps::sp_runtime::DispatchResult;
  fn advance_past_cooldown();
}

#[frame::pallet]
pub mod pallet {
  use super::WeightInfo;
  use alloc::vec::Vec;
  use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
  use frame::deps::{
    frame_support::{
      storage::with_storage_layer,
      traits::{
        EnsureOrigin, UnixTime,
        fungible::{Inspect as NativeInspect, Mutate as NativeMutate},
        fungibles::{Inspect as FungiblesInspect, Mutate as FungiblesMutate},
        tokens::Preservation,
      },
    },
    sp_runtime::{
      DispatchError,
      traits::{AccountIdConversion, Zero},
    },
  };
  use frame::prelude::*;
  use polkadot_sdk::sp_core::U256;
  use primitives::{AssetKind, Balance, ProtocolId, params};
  use scale_info::TypeInfo;

  /// Configuration trait for the giving router pallet
  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// The assets pallet holding the base asset and any recoverable token
    type Assets: FungiblesInspect<Self::AccountId, AssetId = u32, Balance = Balance>
      + FungiblesMutate<Self::AccountId, AssetId = u32, Balance = Balance>;

    /// The currency trait for native token recovery
    type Currency: NativeInspect<Self::AccountId, Balance = Balance>
      + NativeMutate<Self::AccountId, Balance = Balance>;

    /// The yield-source vault, consumed through a narrow redeem interface
    type Vault: YieldVault<Self::AccountId>;

    /// Wall-clock source for the redemption cadence gate
    type TimeProvider: UnixTime;

    /// Origin for configuration, cycle triggering and disbursement requests
    type OperatorOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Origin for off-chain execution confirmations and impact records
    type ConfirmerOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Origin for emergency fund recovery
    type SuperAdminOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// The pallet ID for the giving router
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// Asset id of the base asset that redeemed yield is denominated in
    #[pallet::constant]
    type BaseAsset: Get<u32>;

    /// Default share of redeemed assets routed to donations, in basis points
    #[pallet::constant]
    type DefaultDonationBps: Get<u16>;

    /// Default minimum spacing between redemption cycles, in seconds
    #[pallet::constant]
    type DefaultRedemptionInterval: Get<u64>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  /// Narrow interface onto the yield-source vault.
  ///
  /// The vault's own deposit/accounting mechanics are out of scope; the
  /// router only queries its share balance and redeems shares for the base
  /// asset.
  pub trait YieldVault<AccountId> {
    /// Shares held by `who` in `vault`
    fn share_balance(vault: &AccountId, who: &AccountId) -> Balance;

    /// Redeem `shares` for the base asset, crediting `receiver`
    fn redeem(
      vault: &AccountId,
      shares: Balance,
      receiver: &AccountId,
      owner: &AccountId,
    ) -> Result<Balance, DispatchError>;
  }

  /// A registered donation protocol.
  ///
  /// Protocols are appended in registration order and never removed;
  /// disabling is the only removal mechanism.
  #[derive(
    Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
  )]
  pub struct ProtocolInfo {
    pub id: ProtocolId,
    pub name: BoundedVec<u8, ConstU32<64>>,
    pub weight: Balance,
    pub enabled: bool,
  }

  /// The pallet struct
  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Registered protocols in registration order
  #[pallet::storage]
  #[pallet::getter(fn protocols)]
  pub type Protocols<T: Config> = StorageValue<
    _,
    BoundedVec<ProtocolInfo, ConstU32<{ params::MAX_PROTOCOLS }>>,
    ValueQuery,
  >;

  /// Running sum of all registered weights, enabled or disabled
  #[pallet::storage]
  #[pallet::getter(fn total_weight)]
  pub type TotalWeight<T: Config> = StorageValue<_, Balance, ValueQuery>;

  /// Allocated donations not yet drawn down by a disbursement request
  #[pallet::storage]
  #[pallet::getter(fn pending_donations)]
  pub type PendingDonations<T: Config> =
    StorageMap<_, Blake2_128Concat, ProtocolId, Balance, ValueQuery>;

  /// Unix timestamp of the last successful arming of the redemption gate
  #[pallet::storage]
  #[pallet::getter(fn last_redemption)]
  pub type LastRedemption<T: Config> = StorageValue<_, u64, ValueQuery>;

  /// Current minimum spacing between redemption cycles (can be updated by the operator)
  #[pallet::storage]
  #[pallet::getter(fn redemption_interval)]
  pub type RedemptionInterval<T: Config> =
    StorageValue<_, u64, ValueQuery, T::DefaultRedemptionInterval>;

  /// Current donation share in basis points (can be updated by the operator)
  #[pallet::storage]
  #[pallet::getter(fn donation_bps)]
  pub type DonationBps<T: Config> = StorageValue<_, u16, ValueQuery, T::DefaultDonationBps>;

  /// Account of the yield vault the router redeems against
  #[pallet::storage]
  #[pallet::getter(fn vault_account)]
  pub type VaultAccount<T: Config> = StorageValue<_, T::AccountId, OptionQuery>;

  /// Events for the giving router pallet
  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// A protocol was registered or updated
    ProtocolUpserted {
      protocol_id: ProtocolId,
      weight: Balance,
      enabled: bool,
    },
    /// Donation share updated
    DonationBpsUpdated { old_bps: u16, new_bps: u16 },
    /// Redemption cadence updated
    RedemptionIntervalUpdated { old_interval: u64, new_interval: u64 },
    /// Vault reference updated
    VaultUpdated { vault: T::AccountId },
    /// Yield-bearing tokens arrived at the router
    HarvestReceived { amount: Balance },
    /// Vault shares redeemed for the base asset
    Redeemed {
      assets_out: Balance,
      donation_amount: Balance,
    },
    /// A protocol's pending balance was credited
    DonationAllocated {
      protocol_id: ProtocolId,
      amount: Balance,
    },
    /// A redemption cycle failed after the gate was armed
    RedemptionFailed { error: DispatchError },
    /// Pending balance drawn down; intent for the off-chain worker
    DisbursementRequested {
      protocol_id: ProtocolId,
      amount: Balance,
      aux_data: BoundedVec<u8, ConstU32<256>>,
    },
    /// Off-chain execution reported complete (uncorrelated with any request)
    DisbursementConfirmed {
      protocol_id: ProtocolId,
      amount: Balance,
      external_ref: BoundedVec<u8, ConstU32<128>>,
    },
    /// Donation impact recorded
    ImpactRecorded {
      protocol_id: ProtocolId,
      donor: BoundedVec<u8, ConstU32<64>>,
      amount: Balance,
      metadata_ref: BoundedVec<u8, ConstU32<128>>,
    },
    /// Funds recovered by the super admin
    EmergencyWithdrawal {
      asset: AssetKind,
      to: T::AccountId,
      amount: Balance,
    },
  }

  /// Errors for the giving router pallet
  #[pallet::error]
  pub enum Error<T> {
    /// The redemption cadence gate is still armed
    CooldownActive,
    /// Redemption interval below the one hour floor
    IntervalTooSmall,
    /// Donation share above 10000 basis points
    BpsOutOfRange,
    /// Zero is not a valid protocol identifier
    InvalidId,
    /// Vault reference missing or unusable
    InvalidAddress,
    /// Protocol was never registered
    UnknownProtocol,
    /// Amount must be non-zero
    ZeroAmount,
    /// Request exceeds the protocol's pending balance
    InsufficientAllocation,
    /// No protocol weight registered
    NoProtocolsConfigured,
    /// Every registered protocol is disabled
    NoEnabledProtocols,
    /// Registry is full
    TooManyProtocols,
    /// Arithmetic overflow occurred
    ArithmeticOverflow,
  }

  /// Implementation of the giving router pallet
  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Register a new protocol or update an existing one (operator only)
    ///
    /// The registry is append-only: an unknown id is appended, a known id has
    /// its name, weight and enabled flag replaced in place. `TotalWeight`
    /// moves by the signed delta between the old and new weight.
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::upsert_protocol())]
    pub fn upsert_protocol(
      origin: OriginFor<T>,
      protocol_id: ProtocolId,
      name: BoundedVec<u8, ConstU32<64>>,
      weight: Balance,
      enabled: bool,
    ) -> DispatchResult {
      T::OperatorOrigin::ensure_origin(origin)?;
      ensure!(protocol_id != 0, Error::<T>::InvalidId);
      Protocols::<T>::try_mutate(|protocols| -> DispatchResult {
        if let Some(existing) = protocols.iter_mut().find(|p| p.id == protocol_id) {
          // Single signed delta keeps the running total exact when the
          // weight shrinks; TotalWeight >= old weight is a registry invariant.
          let new_total = TotalWeight::<T>::get()
            .saturating_sub(existing.weight)
            .checked_add(weight)
            .ok_or(Error::<T>::ArithmeticOverflow)?;
          existing.name = name;
          existing.weight = weight;
          existing.enabled = enabled;
          TotalWeight::<T>::put(new_total);
        } else {
          let new_total = TotalWeight::<T>::get()
            .checked_add(weight)
            .ok_or(Error::<T>::ArithmeticOverflow)?;
          protocols
            .try_push(ProtocolInfo {
              id: protocol_id,
              name,
              weight,
              enabled,
            })
            .map_err(|_| Error::<T>::TooManyProtocols)?;
          TotalWeight::<T>::put(new_total);
        }
        Ok(())
      })?;
      Self::deposit_event(Event::ProtocolUpserted {
        protocol_id,
        weight,
        enabled,
      });
      Ok(())
    }

    /// Update the donation share in basis points (operator only)
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::set_donation_bps())]
    pub fn set_donation_bps(origin: OriginFor<T>, new_bps: u16) -> DispatchResult {
      T::OperatorOrigin::ensure_origin(origin)?;
      ensure!(
        new_bps as Balance <= params::BPS_DENOMINATOR,
        Error::<T>::BpsOutOfRange
      );
      let old_bps = DonationBps::<T>::get();
      DonationBps::<T>::put(new_bps);
      Self::deposit_event(Event::DonationBpsUpdated { old_bps, new_bps });
      Ok(())
    }

    /// Update the redemption cadence (operator only)
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::set_redemption_interval())]
    pub fn set_redemption_interval(origin: OriginFor<T>, new_interval: u64) -> DispatchResult {
      T::OperatorOrigin::ensure_origin(origin)?;
      ensure!(
        new_interval >= params::MIN_REDEMPTION_INTERVAL_SECS,
        Error::<T>::IntervalTooSmall
      );
      let old_interval = RedemptionInterval::<T>::get();
      RedemptionInterval::<T>::put(new_interval);
      Self::deposit_event(Event::RedemptionIntervalUpdated {
        old_interval,
        new_interval,
      });
      Ok(())
    }

    /// Update the vault reference (operator only)
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::set_vault())]
    pub fn set_vault(origin: OriginFor<T>, vault: T::AccountId) -> DispatchResult {
      T::OperatorOrigin::ensure_origin(origin)?;
      ensure!(vault != Self::account_id(), Error::<T>::InvalidAddress);
      VaultAccount::<T>::put(&vault);
      Self::deposit_event(Event::VaultUpdated { vault });
      Ok(())
    }

    /// Run one redemption cycle (operator only)
    ///
    /// Arms the cadence gate, redeems the router's full vault share balance
    /// for the base asset, and credits the donation share across enabled
    /// protocols. The gate is armed before the vault call: a nested cycle
    /// triggered from inside the redeem observes the updated timestamp and is
    /// rejected. A failure after the gate keeps the timestamp armed and is
    /// surfaced as a `RedemptionFailed` event.
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::redeem_donations())]
    pub fn redeem_donations(origin: OriginFor<T>) -> DispatchResult {
      T::OperatorOrigin::ensure_origin(origin)?;
      let now = T::TimeProvider::now().as_secs();
      ensure!(
        now >= LastRedemption::<T>::get().saturating_add(RedemptionInterval::<T>::get()),
        Error::<T>::CooldownActive
      );
      LastRedemption::<T>::put(now);
      // Everything after the gate runs in its own storage layer: a failure
      // rolls back the partial cycle but not the armed timestamp.
      let result = with_storage_layer(|| -> DispatchResult {
        let vault = VaultAccount::<T>::get().ok_or(Error::<T>::InvalidAddress)?;
        let router = Self::account_id();
        let shares = T::Vault::share_balance(&vault, &router);
        let assets_out = T::Vault::redeem(&vault, shares, &router, &router)?;
        let donation_amount = Self::mul_div(
          assets_out,
          DonationBps::<T>::get() as Balance,
          params::BPS_DENOMINATOR,
        )?;
        if !donation_amount.is_zero() {
          let protocols = Protocols::<T>::get();
          let allocations =
            Self::compute_shares(donation_amount, &protocols, TotalWeight::<T>::get())?;
          for (protocol_id, amount) in allocations {
            PendingDonations::<T>::mutate(protocol_id, |pending| {
              *pending = pending.saturating_add(amount)
            });
            Self::deposit_event(Event::DonationAllocated {
              protocol_id,
              amount,
            });
          }
          Self::deposit_event(Event::Redeemed {
            assets_out,
            donation_amount,
          });
        }
        Ok(())
      });
      if let Err(error) = result {
        Self::deposit_event(Event::RedemptionFailed { error });
      }
      Ok(())
    }

    /// Draw down a protocol's pending balance and emit an execution intent
    /// for the off-chain worker (operator only)
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::request_disbursement())]
    pub fn request_disbursement(
      origin: OriginFor<T>,
      protocol_id: ProtocolId,
      amount: Balance,
      aux_data: BoundedVec<u8, ConstU32<256>>,
    ) -> DispatchResult {
      T::OperatorOrigin::ensure_origin(origin)?;
      ensure!(
        Protocols::<T>::get().iter().any(|p| p.id == protocol_id),
        Error::<T>::UnknownProtocol
      );
      ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
      PendingDonations::<T>::try_mutate(protocol_id, |pending| -> DispatchResult {
        *pending = pending
          .checked_sub(amount)
          .ok_or(Error::<T>::InsufficientAllocation)?;
        Ok(())
      })?;
      Self::deposit_event(Event::DisbursementRequested {
        protocol_id,
        amount,
        aux_data,
      });
      Ok(())
    }

    /// Record that an off-chain disbursement completed (confirmer only)
    ///
    /// Deliberately uncorrelated with any prior request: on-chain state owns
    /// accounting, the off-chain worker owns execution truth.
    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::confirm_disbursement())]
    pub fn confirm_disbursement(
      origin: OriginFor<T>,
      protocol_id: ProtocolId,
      amount: Balance,
      external_ref: BoundedVec<u8, ConstU32<128>>,
    ) -> DispatchResult {
      T::ConfirmerOrigin::ensure_origin(origin)?;
      Self::deposit_event(Event::DisbursementConfirmed {
        protocol_id,
        amount,
        external_ref,
      });
      Ok(())
    }

    /// Record donation impact attribution (confirmer only)
    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::record_impact())]
    pub fn record_impact(
      origin: OriginFor<T>,
      protocol_id: ProtocolId,
      donor: BoundedVec<u8, ConstU32<64>>,
      amount: Balance,
      metadata_ref: BoundedVec<u8, ConstU32<128>>,
    ) -> DispatchResult {
      T::ConfirmerOrigin::ensure_origin(origin)?;
      Self::deposit_event(Event::ImpactRecorded {
        protocol_id,
        donor,
        amount,
        metadata_ref,
      });
      Ok(())
    }

    /// Record that yield-bearing tokens arrived at the router (operator only)
    #[pallet::call_index(8)]
    #[pallet::weight(T::WeightInfo::notify_harvest())]
    pub fn notify_harvest(origin: OriginFor<T>, amount: Balance) -> DispatchResult {
      T::OperatorOrigin::ensure_origin(origin)?;
      Self::deposit_event(Event::HarvestReceived { amount });
      Ok(())
    }

    /// Recover an arbitrary token from the router account (super admin only)
    #[pallet::call_index(9)]
    #[pallet::weight(T::WeightInfo::emergency_withdraw())]
    pub fn emergency_withdraw(
      origin: OriginFor<T>,
      asset: AssetKind,
      to: T::AccountId,
      amount: Balance,
    ) -> DispatchResult {
      T::SuperAdminOrigin::ensure_origin(origin)?;
      let router = Self::account_id();
      match asset {
        AssetKind::Native => {
          <T::Currency as NativeMutate<T::AccountId>>::transfer(
            &router,
            &to,
            amount,
            Preservation::Expendable,
          )?;
        }
        AssetKind::Local(id) => {
          T::Assets::transfer(id, &router, &to, amount, Preservation::Expendable)?;
        }
      }
      Self::deposit_event(Event::EmergencyWithdrawal { asset, to, amount });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Get the pallet's account ID (derived from PalletId)
    pub fn account_id() -> T::AccountId {
      T::PalletId::get().into_account_truncating()
    }

    /// Registered protocol ids in registration order
    pub fn protocol_ids() -> Vec<ProtocolId> {
      Protocols::<T>::get().iter().map(|p| p.id).collect()
    }

    /// Batch query of pending balances
    pub fn pending_for(protocol_ids: Vec<ProtocolId>) -> Vec<(ProtocolId, Balance)> {
      protocol_ids
        .into_iter()
        .map(|id| (id, PendingDonations::<T>::get(id)))
        .collect()
    }

    /// Vault shares currently held by the router
    pub fn share_balance() -> Balance {
      match VaultAccount::<T>::get() {
        Some(vault) => T::Vault::share_balance(&vault, &Self::account_id()),
        None => 0,
      }
    }

    /// Base asset currently held by the router
    pub fn base_asset_balance() -> Balance {
      T::Assets::balance(T::BaseAsset::get(), &Self::account_id())
    }

    /// Unix timestamp at which the next redemption cycle becomes available
    pub fn next_redemption_at() -> u64 {
      LastRedemption::<T>::get().saturating_add(RedemptionInterval::<T>::get())
    }

    /// Split `total_amount` across enabled protocols in proportion to their
    /// weight.
    ///
    /// Every enabled protocol except the last gets the floored proportional
    /// share; the last enabled protocol takes the running remainder, so the
    /// emitted shares always sum to exactly `total_amount`. Disabled
    /// protocols receive nothing but their weight stays in the denominator.
    fn compute_shares(
      total_amount: Balance,
      protocols: &[ProtocolInfo],
      total_weight: Balance,
    ) -> Result<Vec<(ProtocolId, Balance)>, DispatchError> {
      ensure!(!total_weight.is_zero(), Error::<T>::NoProtocolsConfigured);
      let enabled_count = protocols.iter().filter(|p| p.enabled).count();
      ensure!(enabled_count > 0, Error::<T>::NoEnabledProtocols);

      let mut shares = Vec::with_capacity(enabled_count);
      if total_amount.is_zero() {
        return Ok(shares);
      }

      let mut remaining = total_amount;
      let mut processed = 0usize;
      for protocol in protocols.iter().filter(|p| p.enabled) {
        processed += 1;
        let share = if processed == enabled_count {
          remaining
        } else {
          Self::mul_div(total_amount, protocol.weight, total_weight)?
        };
        if !share.is_zero() {
          shares.push((protocol.id, share));
          remaining = remaining.saturating_sub(share);
        }
      }
      Ok(shares)
    }

    /// floor(amount * numerator / denominator) without intermediate overflow
    fn mul_div(
      amount: Balance,
      numerator: Balance,
      denominator: Balance,
    ) -> Result<Balance, DispatchError> {
      let result = U256::from(amount)
        .checked_mul(U256::from(numerator))
        .ok_or(Error::<T>::ArithmeticOverflow)?
        .checked_div(U256::from(denominator))
        .ok_or(Error::<T>::ArithmeticOverflow)?;

      if result > U256::from(u128::MAX) {
        return Err(Error::<T>::ArithmeticOverflow.into());
      }

      Ok(result.as_u128())
    }
  }

  /// Genesis configuration — ensures pallet account is ED-free
  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    #[serde(skip)]
    pub _marker: core::marker::PhantomData<T>,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      // Router account survives zero native balance via provider reference
      frame_system::Pallet::<T>::inc_providers(&Pallet::<T>::account_id());
    }
  }
}
