use anchor_lang::prelude::*;

use crate::calculator::collateral_for_floor_price;
use crate::constants::*;

/// Settings shared by the aggregator, the liquidation watch and the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub program_id: Pubkey,
    /// Seconds between liquidation view re-fetches.
    pub liquidation_poll_interval: i64,
    pub collateral_ratio_bps: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program_id: crate::ID,
            liquidation_poll_interval: DEFAULT_LIQUIDATION_POLL_INTERVAL,
            collateral_ratio_bps: DEFAULT_COLLATERAL_RATIO_BPS,
        }
    }
}

impl ClientConfig {
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_liquidation_poll_interval(mut self, seconds: i64) -> Self {
        self.liquidation_poll_interval = seconds.max(0);
        self
    }

    pub fn with_collateral_ratio_bps(mut self, collateral_ratio_bps: u16) -> Self {
        self.collateral_ratio_bps = collateral_ratio_bps;
        self
    }

    /// Collateral to ask for when listing an NFT with this floor price.
    pub fn collateral_for(&self, floor_price: u64) -> Result<u64> {
        collateral_for_floor_price(floor_price, self.collateral_ratio_bps)
    }
}
