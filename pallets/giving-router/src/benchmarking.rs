use crate::*;
use polkadot_sdk::frame_benchmarking::v2::*;
use polkadot_sdk::frame_support::traits::EnsureOrigin;
use primitives::params;

fn operator_origin<T: Config>() -> Result<T::RuntimeOrigin, BenchmarkError> {
  T::OperatorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)
}

fn confirmer_origin<T: Config>() -> Result<T::RuntimeOrigin, BenchmarkError> {
  T::ConfirmerOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)
}

fn register_protocols<T: Config>(count: u32) -> Result<(), BenchmarkError> {
  let origin = operator_origin::<T>()?;
  for id in 1..=count {
    Pallet::<T>::upsert_protocol(
      origin.clone(),
      id,
      b"benchmark protocol".to_vec().try_into().expect("fits"),
      1,
      true,
    )?;
  }
  Ok(())
}

#[benchmarks]
mod benches {
  use super::*;

  #[benchmark]
  fn upsert_protocol() -> Result<(), BenchmarkError> {
    // Worst case: the registry is already at capacity and the final entry is
    // updated in place.
    register_protocols::<T>(params::MAX_PROTOCOLS)?;
    let origin = operator_origin::<T>()?;
    let name = b"updated protocol".to_vec().try_into().expect("fits");

    #[extrinsic_call]
    _(
      origin as T::RuntimeOrigin,
      params::MAX_PROTOCOLS,
      name,
      500,
      false,
    );
    Ok(())
  }

  #[benchmark]
  fn set_donation_bps() -> Result<(), BenchmarkError> {
    let origin = operator_origin::<T>()?;

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, 5_000);
    Ok(())
  }

  #[benchmark]
  fn set_redemption_interval() -> Result<(), BenchmarkError> {
    let origin = operator_origin::<T>()?;

    #[extrinsic_call]
    _(
      origin as T::RuntimeOrigin,
      params::MIN_REDEMPTION_INTERVAL_SECS,
    );
    Ok(())
  }

  #[benchmark]
  fn set_vault() -> Result<(), BenchmarkError> {
    let origin = operator_origin::<T>()?;
    let vault: T::AccountId = account("vault", 0, 0);

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, vault);
    Ok(())
  }

  #[benchmark]
  fn redeem_donations() -> Result<(), BenchmarkError> {
    // Worst case: a full registry receiving allocations.
    register_protocols::<T>(params::MAX_PROTOCOLS)?;
    let origin = operator_origin::<T>()?;
    let vault: T::AccountId = account("vault", 0, 0);
    Pallet::<T>::set_vault(origin.clone(), vault.clone())?;
    T::BenchmarkHelper::prepare_vault(&vault, &Pallet::<T>::account_id(), 1_000_000u128)?;
    T::BenchmarkHelper::advance_past_cooldown();

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin);
    Ok(())
  }

  #[benchmark]
  fn request_disbursement() -> Result<(), BenchmarkError> {
    register_protocols::<T>(1)?;
    PendingDonations::<T>::insert(1, 1_000_000u128);
    let origin = operator_origin::<T>()?;
    let aux_data = b"wire:benchmark".to_vec().try_into().expect("fits");

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, 1, 500_000u128, aux_data);
    Ok(())
  }

  #[benchmark]
  fn confirm_disbursement() -> Result<(), BenchmarkError> {
    let origin = confirmer_origin::<T>()?;
    let external_ref = b"0xbenchmark".to_vec().try_into().expect("fits");

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, 1, 500_000u128, external_ref);
    Ok(())
  }

  #[benchmark]
  fn record_impact() -> Result<(), BenchmarkError> {
    let origin = confirmer_origin::<T>()?;
    let donor = b"0xdonor".to_vec().try_into().expect("fits");
    let metadata_ref = b"ipfs://benchmark".to_vec().try_into().expect("fits");

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, 1, donor, 500_000u128, metadata_ref);
    Ok(())
  }

  #[benchmark]
  fn notify_harvest() -> Result<(), BenchmarkError> {
    let origin = operator_origin::<T>()?;

    #[extrinsic_call]
    _(origin as T::RuntimeOrigin, 1_000_000u128);
    Ok(())
  }

  #[benchmark]
  fn emergency_withdraw() -> Result<(), BenchmarkError> {
    let origin = T::SuperAdminOrigin::try_successful_origin()
      .map_err(|_| BenchmarkError::Weightless)?;
    let router = Pallet::<T>::account_id();
    T::BenchmarkHelper::fund_router(primitives::AssetKind::Native, &router, 1_000_000u128)?;
    let to: T::AccountId = account("recipient", 0, 0);

    #[extrinsic_call]
    _(
      origin as T::RuntimeOrigin,
      primitives::AssetKind::Native,
      to,
      500_000u128,
    );
    Ok(())
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
