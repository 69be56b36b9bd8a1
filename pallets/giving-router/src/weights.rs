#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use polkadot_sdk::frame_support::{traits::Get, weights::{Weight, constants::RocksDbWeight}};
use core::marker::PhantomData;

pub trait WeightInfo {
	fn upsert_protocol() -> Weight;
	fn set_donation_bps() -> Weight;
	fn set_redemption_interval() -> Weight;
	fn set_vault() -> Weight;
	fn redeem_donations() -> Weight;
	fn request_disbursement() -> Weight;
	fn confirm_disbursement() -> Weight;
	fn record_impact() -> Weight;
	fn notify_harvest() -> Weight;
	fn emergency_withdraw() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config> WeightInfo for SubstrateWeight<T> {
	fn upsert_protocol() -> Weight {
		Weight::from_parts(25_000_000, 3000)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(2))
	}
	fn set_donation_bps() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_redemption_interval() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().reads(1))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn set_vault() -> Weight {
		Weight::from_parts(15_000_000, 1500)
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn redeem_donations() -> Weight {
		Weight::from_parts(120_000_000, 6000)
			.saturating_add(T::DbWeight::get().reads(6))
			.saturating_add(T::DbWeight::get().writes(102))
	}
	fn request_disbursement() -> Weight {
		Weight::from_parts(30_000_000, 3000)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(1))
	}
	fn confirm_disbursement() -> Weight {
		Weight::from_parts(10_000_000, 0)
	}
	fn record_impact() -> Weight {
		Weight::from_parts(10_000_000, 0)
	}
	fn notify_harvest() -> Weight {
		Weight::from_parts(10_000_000, 0)
	}
	fn emergency_withdraw() -> Weight {
		Weight::from_parts(40_000_000, 3500)
			.saturating_add(T::DbWeight::get().reads(2))
			.saturating_add(T::DbWeight::get().writes(2))
	}
}

impl WeightInfo for () {
	fn upsert_protocol() -> Weight {
		Weight::from_parts(25_000_000, 3000)
	}
	fn set_donation_bps() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
	fn set_redemption_interval() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
	fn set_vault() -> Weight {
		Weight::from_parts(15_000_000, 1500)
	}
	fn redeem_donations() -> Weight {
		Weight::from_parts(120_000_000, 6000)
	}
	fn request_disbursement() -> Weight {
		Weight::from_parts(30_000_000, 3000)
	}
	fn confirm_disbursement() -> Weight {
		Weight::from_parts(10_000_000, 0)
	}
	fn record_impact() -> Weight {
		Weight::from_parts(10_000_000, 0)
	}
	fn notify_harvest() -> Weight {
		Weight::from_parts(10_000_000, 0)
	}
	fn emergency_withdraw() -> Weight {
		Weight::from_parts(40_000_000, 3500)
	}
}
