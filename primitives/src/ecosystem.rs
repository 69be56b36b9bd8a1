//! Ecosystem Constants for the Giving Router
//!
//! This module centralizes all system-level constants: pallet IDs for
//! account derivation, identifier types, and the economic parameters that
//! govern redemption cadence and the donation split.
//!
//! These constants are the single source of truth for system architecture and
//! are re-used across runtime configurations via the primitives crate.

/// Balance type alias for consistency across ecosystem
pub type Balance = u128;

/// Identifier of a registered donation protocol.
///
/// Assigned by the operator at registration and immutable afterwards.
/// Zero is reserved as the invalid identifier.
pub type ProtocolId = u32;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// These IDs are used by Polkadot SDK's `PalletId::into_account_truncating()`
/// to deterministically generate accounts for pallet-specific operations.
pub mod pallet_ids {
  /// Giving Router pallet ID (yield redemption and donation routing)
  pub const GIVING_ROUTER_PALLET_ID: &[u8; 8] = b"givroutr";
}

/// Ecosystem parameters defining mathematical constants and thresholds.
///
/// These parameters coordinate the economic properties of the router and are
/// global across runtime configurations.
pub mod params {
  use super::Balance;

  /// Denominator for basis-point arithmetic (10000 = 100%).
  pub const BPS_DENOMINATOR: Balance = 10_000;

  /// Share of redeemed assets routed to donations, in basis points.
  ///
  /// Defaults to the full amount. Governable between 0 and
  /// `BPS_DENOMINATOR` inclusive.
  pub const DEFAULT_DONATION_BPS: u16 = 10_000;

  /// Default minimum spacing between redemption cycles (7 days).
  pub const DEFAULT_REDEMPTION_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;

  /// Hard floor for the redemption interval (1 hour).
  ///
  /// Shorter intervals would defeat the cadence gate entirely; attempts to
  /// configure below this floor are rejected.
  pub const MIN_REDEMPTION_INTERVAL_SECS: u64 = 60 * 60;

  /// Maximum number of protocols the registry will hold.
  ///
  /// The registry is append-only (protocols are disabled, never removed), so
  /// this bound caps the allocation loop for the lifetime of the system.
  pub const MAX_PROTOCOLS: u32 = 100;
}
