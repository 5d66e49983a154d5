use anchor_lang::prelude::*;
use anchor_lang::Discriminator;

use crate::error::ErrorCode;

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCreated {
    pub listing: Pubkey,
    pub lender: Pubkey,
    pub nft_mint: Pubkey,
    pub loan_duration: u64,
    pub interest_rate_bps: u16,
    pub collateral_amount: u64,
    pub timestamp: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCancelled {
    pub listing: Pubkey,
    pub lender: Pubkey,
    pub nft_mint: Pubkey,
    pub timestamp: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanStarted {
    pub loan: Pubkey,
    pub listing: Pubkey,
    pub borrower: Pubkey,
    pub lender: Pubkey,
    pub collateral_amount: u64,
    pub start_time: i64,
    pub end_time: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanRepaid {
    pub loan: Pubkey,
    pub borrower: Pubkey,
    pub lender: Pubkey,
    pub repaid_amount: u64,
    pub timestamp: i64,
}

#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanLiquidated {
    pub loan: Pubkey,
    pub borrower: Pubkey,
    pub lender: Pubkey,
    pub collateral_amount: u64,
    pub timestamp: i64,
}

/// One entry of the activity feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    ListingCreated(ListingCreated),
    ListingCancelled(ListingCancelled),
    LoanStarted(LoanStarted),
    LoanRepaid(LoanRepaid),
    LoanLiquidated(LoanLiquidated),
}

fn parse<T: AnchorDeserialize>(mut body: &[u8]) -> Result<T> {
    T::deserialize(&mut body).map_err(|_| error!(ErrorCode::EventDecodeFailed))
}

impl ActivityEvent {
    /// Decodes a program event payload (discriminator followed by Borsh
    /// fields), as carried base64-encoded in `Program data:` log lines.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return err!(ErrorCode::EventDecodeFailed);
        }
        let (discriminator, body) = data.split_at(8);

        if discriminator == &ListingCreated::DISCRIMINATOR[..] {
            Ok(Self::ListingCreated(parse(body)?))
        } else if discriminator == &ListingCancelled::DISCRIMINATOR[..] {
            Ok(Self::ListingCancelled(parse(body)?))
        } else if discriminator == &LoanStarted::DISCRIMINATOR[..] {
            Ok(Self::LoanStarted(parse(body)?))
        } else if discriminator == &LoanRepaid::DISCRIMINATOR[..] {
            Ok(Self::LoanRepaid(parse(body)?))
        } else if discriminator == &LoanLiquidated::DISCRIMINATOR[..] {
            Ok(Self::LoanLiquidated(parse(body)?))
        } else {
            err!(ErrorCode::UnknownEvent)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ListingCreated(_) => "listed",
            Self::ListingCancelled(_) => "cancelled",
            Self::LoanStarted(_) => "borrowed",
            Self::LoanRepaid(_) => "repaid",
            Self::LoanLiquidated(_) => "liquidated",
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            Self::ListingCreated(e) => e.timestamp,
            Self::ListingCancelled(e) => e.timestamp,
            Self::LoanStarted(e) => e.start_time,
            Self::LoanRepaid(e) => e.timestamp,
            Self::LoanLiquidated(e) => e.timestamp,
        }
    }

    /// Wallets that should see this entry in their activity.
    pub fn involves(&self, wallet: &Pubkey) -> bool {
        match self {
            Self::ListingCreated(e) => e.lender == *wallet,
            Self::ListingCancelled(e) => e.lender == *wallet,
            Self::LoanStarted(e) => e.borrower == *wallet || e.lender == *wallet,
            Self::LoanRepaid(e) => e.borrower == *wallet || e.lender == *wallet,
            Self::LoanLiquidated(e) => e.borrower == *wallet || e.lender == *wallet,
        }
    }
}

/// Decodes every payload it can, newest first. Payloads from other programs
/// or unknown events are skipped.
pub fn activity_feed<'a>(payloads: impl IntoIterator<Item = &'a [u8]>) -> Vec<ActivityEvent> {
    let mut feed: Vec<ActivityEvent> = payloads
        .into_iter()
        .filter_map(|data| ActivityEvent::decode(data).ok())
        .collect();
    feed.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
    feed
}
