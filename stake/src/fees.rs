//! Fee extraction from the losing pool.

use crate::error::StakeError;
use historia_types::{Amount, ProtocolParams};
use serde::{Deserialize, Serialize};

/// The fee cut from a losing pool, split between proposer and platform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    pub proposer: Amount,
    pub platform: Amount,
}

impl FeeSplit {
    /// Each share is `pool × bps / 10 000`, rounded down independently.
    pub fn compute(losing_pool: Amount, params: &ProtocolParams) -> Result<Self, StakeError> {
        Ok(Self {
            proposer: bps_of(losing_pool, params.proposer_fee_bps)?,
            platform: bps_of(losing_pool, params.platform_fee_bps)?,
        })
    }

    pub fn total(&self) -> Result<Amount, StakeError> {
        self.proposer
            .checked_add(self.platform)
            .ok_or(StakeError::Overflow)
    }
}

fn bps_of(amount: Amount, bps: u32) -> Result<Amount, StakeError> {
    amount
        .raw()
        .checked_mul(u128::from(bps))
        .map(|v| Amount::new(v / ProtocolParams::BPS_DENOMINATOR))
        .ok_or(StakeError::Overflow)
}
