use anchor_lang::prelude::*;

use crate::calculator::LoanQuote;
use crate::config::ClientConfig;
use crate::error::ErrorCode;
use crate::source::{AccountFilter, AccountSource};
use crate::state::{Listing, Loan};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub address: Pubkey,
    pub listing: Listing,
}

/// A loan joined with the listing it was taken against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanEntry {
    pub address: Pubkey,
    pub loan: Loan,
    pub listing: Listing,
    pub quote: LoanQuote,
}

impl LoanEntry {
    pub fn lender(&self) -> Pubkey {
        self.listing.lender
    }

    pub fn nft_mint(&self) -> Pubkey {
        self.listing.nft_mint
    }
}

pub fn filter_active_listings(
    records: impl IntoIterator<Item = (Pubkey, Listing)>,
) -> Vec<ListingEntry> {
    records
        .into_iter()
        .filter(|(_, listing)| listing.is_active)
        .map(|(address, listing)| ListingEntry { address, listing })
        .collect()
}

pub fn filter_active_loans(
    records: impl IntoIterator<Item = (Pubkey, Loan)>,
) -> Vec<(Pubkey, Loan)> {
    records.into_iter().filter(|(_, loan)| loan.is_active).collect()
}

/// Active loans with `end_time < now`, most overdue first.
pub fn filter_liquidatable(
    records: impl IntoIterator<Item = (Pubkey, Loan)>,
    now: i64,
) -> Vec<(Pubkey, Loan)> {
    let mut loans: Vec<_> = records
        .into_iter()
        .filter(|(_, loan)| loan.is_liquidatable(now))
        .collect();
    loans.sort_by_key(|(_, loan)| loan.end_time);
    loans
}

/// Everything one wallet is party to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portfolio {
    pub owner: Pubkey,
    // active listings still waiting for a borrower
    pub listings: Vec<ListingEntry>,
    pub borrowed: Vec<LoanEntry>,
    pub lent: Vec<LoanEntry>,
}

impl Portfolio {
    /// Sum of what the owner must repay across its open loans.
    pub fn outstanding_repayment(&self) -> Result<u64> {
        self.borrowed.iter().try_fold(0u64, |total, entry| {
            total
                .checked_add(entry.quote.total_repayment)
                .ok_or_else(|| error!(ErrorCode::MathOverflow))
        })
    }

    /// Loans the owner lent that can now be liquidated.
    pub fn liquidatable(&self) -> impl Iterator<Item = &LoanEntry> {
        self.lent.iter().filter(|entry| entry.quote.is_liquidatable())
    }
}

pub struct Aggregator<S> {
    program_id: Pubkey,
    source: S,
}

impl<S: AccountSource> Aggregator<S> {
    pub fn new(config: &ClientConfig, source: S) -> Self {
        Self {
            program_id: config.program_id,
            source,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn fetch<T>(&self, filters: &[AccountFilter], decode: fn(&[u8]) -> Result<T>) -> Result<Vec<(Pubkey, T)>> {
        let accounts = self.source.get_program_accounts(&self.program_id, filters)?;
        Ok(accounts
            .into_iter()
            .filter_map(|(address, data)| match decode(&data) {
                Ok(account) => Some((address, account)),
                Err(_) => {
                    msg!("skipping undecodable account {}", address);
                    None
                }
            })
            .collect())
    }

    /// Joins each loan to its listing. Loans whose listing is gone or
    /// unreadable are dropped.
    fn join(&self, loans: Vec<(Pubkey, Loan)>, now: i64) -> Result<Vec<LoanEntry>> {
        let mut entries = Vec::with_capacity(loans.len());
        for (address, loan) in loans {
            let listing = match self.source.get_account(&loan.listing)? {
                Some(data) => match Listing::decode(&data) {
                    Ok(listing) => listing,
                    Err(_) => continue,
                },
                None => continue,
            };
            let quote = match loan.quote(now) {
                Ok(quote) => quote,
                Err(_) => {
                    msg!("skipping loan {} with out-of-range terms", address);
                    continue;
                }
            };
            entries.push(LoanEntry {
                address,
                loan,
                listing,
                quote,
            });
        }
        Ok(entries)
    }

    pub fn active_listings(&self) -> Result<Vec<ListingEntry>> {
        let listings = self.fetch(&Listing::active_filters(), Listing::decode)?;
        Ok(filter_active_listings(listings))
    }

    pub fn listings_by_lender(&self, lender: &Pubkey) -> Result<Vec<ListingEntry>> {
        let listings = self.fetch(&Listing::lender_filters(lender), Listing::decode)?;
        Ok(filter_active_listings(
            listings.into_iter().filter(|(_, l)| l.lender == *lender),
        ))
    }

    pub fn active_loans(&self, now: i64) -> Result<Vec<LoanEntry>> {
        let loans = self.fetch(&Loan::active_filters(), Loan::decode)?;
        self.join(filter_active_loans(loans), now)
    }

    pub fn loans_by_borrower(&self, borrower: &Pubkey, now: i64) -> Result<Vec<LoanEntry>> {
        let loans = self.fetch(&Loan::borrower_filters(borrower), Loan::decode)?;
        self.join(
            filter_active_loans(loans.into_iter().filter(|(_, l)| l.borrower == *borrower)),
            now,
        )
    }

    pub fn liquidatable_loans(&self, now: i64) -> Result<Vec<LoanEntry>> {
        let loans = self.fetch(&Loan::active_filters(), Loan::decode)?;
        self.join(filter_liquidatable(loans, now), now)
    }

    pub fn portfolio(&self, owner: &Pubkey, now: i64) -> Result<Portfolio> {
        let lent = self
            .active_loans(now)?
            .into_iter()
            .filter(|entry| entry.listing.lender == *owner)
            .collect();

        Ok(Portfolio {
            owner: *owner,
            listings: self.listings_by_lender(owner)?,
            borrowed: self.loans_by_borrower(owner, now)?,
            lent,
        })
    }
}

/// Liquidation view state: the last liquidatable snapshot, refreshed on a
/// polling interval.
#[derive(Debug, Clone)]
pub struct LiquidationWatch {
    poll_interval: i64,
    last_refresh: Option<i64>,
    loans: Vec<LoanEntry>,
}

impl LiquidationWatch {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            poll_interval: config.liquidation_poll_interval,
            last_refresh: None,
            loans: Vec::new(),
        }
    }

    pub fn is_due(&self, now: i64) -> bool {
        match self.last_refresh {
            Some(at) => now.saturating_sub(at) >= self.poll_interval,
            None => true,
        }
    }

    /// Re-fetches when the interval has elapsed. Returns whether it did.
    pub fn poll<S: AccountSource>(&mut self, aggregator: &Aggregator<S>, now: i64) -> Result<bool> {
        if !self.is_due(now) {
            return Ok(false);
        }
        self.refresh(aggregator, now)?;
        Ok(true)
    }

    /// Unconditional re-fetch. A failed fetch keeps the previous snapshot.
    pub fn refresh<S: AccountSource>(&mut self, aggregator: &Aggregator<S>, now: i64) -> Result<()> {
        self.loans = aggregator.liquidatable_loans(now)?;
        self.last_refresh = Some(now);
        Ok(())
    }

    pub fn loans(&self) -> &[LoanEntry] {
        &self.loans
    }

    pub fn last_refresh(&self) -> Option<i64> {
        self.last_refresh
    }
}
