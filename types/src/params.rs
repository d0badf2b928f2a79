//! Protocol parameters: stake floor, window bounds, description limits, fees.

use crate::address::Address;
use crate::amount::Amount;
use crate::error::TypesError;
use serde::{Deserialize, Serialize};

/// All tunable protocol parameters.
///
/// Defaults are the values of the live deployment: 1-unit minimum stake,
/// 1-minute minimum windows, a 30-day ceiling on the combined windows,
/// and a 2% fee on the losing pool split evenly between proposer and platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtocolParams {
    /// Minimum `stake_amount` an event may be created with (raw units).
    #[serde(with = "amount_as_u64")]
    pub min_stake: Amount,

    /// Maximum description length of a root event, in characters.
    pub max_description_len: usize,

    /// Maximum description length of a contest, in characters.
    pub max_contest_description_len: usize,

    /// Minimum length of each of the commit and reveal windows, in minutes.
    pub min_phase_minutes: u64,

    /// Maximum combined length of the commit and reveal windows, in minutes.
    pub max_total_minutes: u64,

    /// Share of the losing pool paid to the event's proposer (basis points).
    pub proposer_fee_bps: u32,

    /// Share of the losing pool paid to the platform (basis points).
    pub platform_fee_bps: u32,

    /// Recipient of the platform fee and of the platform remainder.
    pub platform_address: Address,
}

impl ProtocolParams {
    pub const BPS_DENOMINATOR: u128 = 10_000;

    /// Combined fee rate on the losing pool (basis points).
    pub fn total_fee_bps(&self) -> u32 {
        self.proposer_fee_bps.saturating_add(self.platform_fee_bps)
    }

    /// Check that every accepted event opens in its commit phase and can
    /// always be settled.
    pub fn validate(&self) -> Result<(), TypesError> {
        let invalid = |msg: String| Err(TypesError::InvalidParams(msg));
        if self.min_phase_minutes < 1 {
            return invalid("min_phase_minutes must be at least 1".into());
        }
        if self.min_stake.is_zero() {
            return invalid("min_stake must be at least 1".into());
        }
        if u128::from(self.total_fee_bps()) > Self::BPS_DENOMINATOR {
            return invalid(format!(
                "proposer_fee_bps + platform_fee_bps is {}, at most {} allowed",
                self.total_fee_bps(),
                Self::BPS_DENOMINATOR
            ));
        }
        if self.max_total_minutes < self.min_phase_minutes.saturating_mul(2) {
            return invalid(format!(
                "max_total_minutes ({}) cannot fit two windows of min_phase_minutes ({})",
                self.max_total_minutes, self.min_phase_minutes
            ));
        }
        Ok(())
    }
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            min_stake: Amount::units(1),
            max_description_len: 280,
            max_contest_description_len: 500,
            min_phase_minutes: 1,
            max_total_minutes: 30 * 24 * 60,
            proposer_fee_bps: 100,
            platform_fee_bps: 100,
            platform_address: Address::from_static("historia_platform"),
        }
    }
}

/// TOML integers are 64-bit, so the stake floor travels as `u64`.
mod amount_as_u64 {
    use crate::amount::Amount;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(amount: &Amount, s: S) -> Result<S::Ok, S::Error> {
        let raw = u64::try_from(amount.raw())
            .map_err(|_| serde::ser::Error::custom("amount exceeds u64"))?;
        s.serialize_u64(raw)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Amount, D::Error> {
        u64::deserialize(d).map(|raw| Amount::new(u128::from(raw)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment() {
        let p = ProtocolParams::default();
        assert_eq!(p.min_stake.raw(), 1_000_000);
        assert_eq!(p.max_total_minutes, 43_200);
        assert_eq!(p.total_fee_bps(), 200);
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn zero_minimum_window_is_rejected() {
        let p = ProtocolParams {
            min_phase_minutes: 0,
            ..ProtocolParams::default()
        };
        assert!(matches!(p.validate(), Err(TypesError::InvalidParams(_))));
    }

    #[test]
    fn zero_minimum_stake_is_rejected() {
        let p = ProtocolParams {
            min_stake: Amount::ZERO,
            ..ProtocolParams::default()
        };
        assert!(matches!(p.validate(), Err(TypesError::InvalidParams(_))));
    }

    #[test]
    fn fees_above_the_whole_pool_are_rejected() {
        let p = ProtocolParams {
            proposer_fee_bps: 6_000,
            platform_fee_bps: 6_000,
            ..ProtocolParams::default()
        };
        assert!(matches!(p.validate(), Err(TypesError::InvalidParams(_))));

        let whole = ProtocolParams {
            proposer_fee_bps: 5_000,
            platform_fee_bps: 5_000,
            ..ProtocolParams::default()
        };
        assert_eq!(whole.validate(), Ok(()));
    }

    #[test]
    fn total_window_must_hold_both_phases() {
        let p = ProtocolParams {
            min_phase_minutes: 10,
            max_total_minutes: 15,
            ..ProtocolParams::default()
        };
        assert!(matches!(p.validate(), Err(TypesError::InvalidParams(_))));
    }
}
