use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::calculator::LoanTerms;
use crate::constants::*;
use crate::error::ErrorCode;
use crate::source::AccountFilter;

/// A lender's standing offer. Mirrors the program's `Listing` account.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Listing {
    pub lender: Pubkey,
    pub nft_mint: Pubkey,
    /// seconds
    pub loan_duration: u64,
    pub interest_rate_bps: u16,
    pub collateral_amount: u64,
    pub is_active: bool,
    pub bump: u8,
}

impl Listing {
    pub const MAX_SPACE: usize = 32 + // lender
        32 + // nft_mint
        8 +  // loan_duration
        2 +  // interest_rate_bps
        8 +  // collateral_amount
        1 +  // is_active
        1; // bump

    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut data = data;
        Self::try_deserialize(&mut data).map_err(|_| error!(ErrorCode::AccountDecodeFailed))
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms::new(
            self.collateral_amount,
            self.interest_rate_bps,
            self.loan_duration,
        )
    }

    /// Listing accounts only.
    pub fn discriminator_filter() -> AccountFilter {
        AccountFilter::memcmp(DISCRIMINATOR_OFFSET, Self::DISCRIMINATOR.to_vec())
    }

    pub fn size_filter() -> AccountFilter {
        AccountFilter::DataSize((8 + Self::MAX_SPACE) as u64)
    }

    pub fn active_filters() -> Vec<AccountFilter> {
        vec![
            Self::discriminator_filter(),
            Self::size_filter(),
            AccountFilter::memcmp(LISTING_IS_ACTIVE_OFFSET, vec![1]),
        ]
    }

    pub fn lender_filters(lender: &Pubkey) -> Vec<AccountFilter> {
        let mut filters = Self::active_filters();
        filters.push(AccountFilter::memcmp(LISTING_LENDER_OFFSET, lender.to_bytes().to_vec()));
        filters
    }
}
