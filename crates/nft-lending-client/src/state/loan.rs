use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::calculator::{LoanQuote, LoanTerms};
use crate::constants::*;
use crate::error::ErrorCode;
use crate::source::AccountFilter;

/// An accepted listing. Mirrors the program's `Loan` account.
#[account]
#[derive(Debug, PartialEq, Eq)]
pub struct Loan {
    pub borrower: Pubkey,
    pub listing: Pubkey,
    pub start_time: i64,
    // start_time + loan_duration; liquidation threshold
    pub end_time: i64,
    pub collateral_amount: u64,
    pub interest_rate_bps: u16,
    pub is_active: bool,
    pub bump: u8,
}

impl Loan {
    pub const MAX_SPACE: usize = 32 + // borrower
        32 + // listing
        8 +  // start_time
        8 +  // end_time
        8 +  // collateral_amount
        2 +  // interest_rate_bps
        1 +  // is_active
        1; // bump

    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut data = data;
        Self::try_deserialize(&mut data).map_err(|_| error!(ErrorCode::AccountDecodeFailed))
    }

    pub fn duration(&self) -> u64 {
        self.end_time.saturating_sub(self.start_time).max(0) as u64
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms::new(self.collateral_amount, self.interest_rate_bps, self.duration())
    }

    pub fn quote(&self, now: i64) -> Result<LoanQuote> {
        LoanQuote::at(self.terms(), self.start_time, now)
    }

    /// Active and strictly past its end time.
    pub fn is_liquidatable(&self, now: i64) -> bool {
        self.is_active && self.end_time < now
    }

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
            AccountFilter::memcmp(LOAN_IS_ACTIVE_OFFSET, vec![1]),
        ]
    }

    pub fn borrower_filters(borrower: &Pubkey) -> Vec<AccountFilter> {
        let mut filters = Self::active_filters();
        filters.push(AccountFilter::memcmp(LOAN_BORROWER_OFFSET, borrower.to_bytes().to_vec()));
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000;

    fn loan() -> Loan {
        Loan {
            borrower: Pubkey::new_unique(),
            listing: Pubkey::new_unique(),
            start_time: T0,
            end_time: T0 + 7 * SECONDS_PER_DAY,
            collateral_amount: 10 * LAMPORTS_PER_SOL,
            interest_rate_bps: 1_250,
            is_active: true,
            bump: 253,
        }
    }

    #[test]
    fn documented_offsets_match_the_encoding() {
        let loan = loan();
        let mut data = Vec::new();
        loan.try_serialize(&mut data).unwrap();

        assert_eq!(data.len(), 8 + Loan::MAX_SPACE);
        assert_eq!(&data[LOAN_BORROWER_OFFSET..LOAN_BORROWER_OFFSET + 32], loan.borrower.as_ref());
        assert_eq!(&data[LOAN_LISTING_OFFSET..LOAN_LISTING_OFFSET + 32], loan.listing.as_ref());
        assert_eq!(data[LOAN_IS_ACTIVE_OFFSET], 1);
        assert!(Loan::borrower_filters(&loan.borrower).iter().all(|f| f.matches(&data)));
        assert!(!Loan::borrower_filters(&Pubkey::new_unique()).iter().all(|f| f.matches(&data)));

        assert_eq!(Loan::decode(&data).unwrap(), loan);
    }

    #[test]
    fn liquidatable_only_strictly_after_end_time() {
        let loan = loan();
        assert!(!loan.is_liquidatable(loan.end_time - 1));
        assert!(!loan.is_liquidatable(loan.end_time));
        assert!(loan.is_liquidatable(loan.end_time + 1));

        let repaid = Loan {
            is_active: false,
            ..loan
        };
        assert!(!repaid.is_liquidatable(repaid.end_time + SECONDS_PER_DAY));
    }

    #[test]
    fn terms_use_the_loan_window() {
        let loan = loan();
        assert_eq!(loan.duration(), 7 * SECONDS_PER_DAY as u64);
        assert_eq!(loan.terms().total_interest().unwrap(), 23_972_602);

        let quote = loan.quote(T0 + 8 * SECONDS_PER_DAY).unwrap();
        assert_eq!(quote.due_time, loan.end_time);
        assert!(quote.is_overdue);
    }
}
