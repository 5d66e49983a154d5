use std::fmt;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_spl::associated_token::spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use anchor_spl::token;

use crate::config::ClientConfig;
use crate::error::ErrorCode;
use crate::instructions::*;
use crate::pda;
use crate::source::{fetch_account, AccountSource};
use crate::state::{Listing, Loan};

/// The connected wallet: knows its key, signs and sends a bundle.
pub trait Wallet {
    /// `None` while disconnected.
    fn public_key(&self) -> Option<Pubkey>;

    /// Signs `instructions` as one transaction, submits it and returns the
    /// signature once confirmed.
    fn sign_and_send(&mut self, instructions: &[Instruction]) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    List {
        nft_mint: Pubkey,
        // seconds
        loan_duration: u64,
        interest_rate_bps: u16,
        collateral_amount: u64,
    },
    Borrow {
        listing: Pubkey,
    },
    Repay {
        loan: Pubkey,
    },
    Cancel {
        listing: Pubkey,
    },
    Liquidate {
        loan: Pubkey,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List { .. } => ListNft::NAME,
            Self::Borrow { .. } => Borrow::NAME,
            Self::Repay { .. } => Repay::NAME,
            Self::Cancel { .. } => CancelListing::NAME,
            Self::Liquidate { .. } => Liquidate::NAME,
        }
    }
}

/// One-shot outcome shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Success {
        action: &'static str,
        signature: String,
    },
    Failure {
        action: &'static str,
        message: String,
    },
}

impl Notification {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success { action, signature } => write!(f, "{} confirmed: {}", action, signature),
            Self::Failure { action, message } => write!(f, "{} failed: {}", action, message),
        }
    }
}

pub struct Dispatcher<S, W> {
    program_id: Pubkey,
    source: S,
    wallet: W,
}

impl<S: AccountSource, W: Wallet> Dispatcher<S, W> {
    pub fn new(config: &ClientConfig, source: S, wallet: W) -> Self {
        Self {
            program_id: config.program_id,
            source,
            wallet,
        }
    }

    pub fn wallet(&self) -> &W {
        &self.wallet
    }

    pub fn wallet_mut(&mut self) -> &mut W {
        &mut self.wallet
    }

    /// Runs `action` end to end and reports the outcome. Never fails: every
    /// error is logged and turned into a `Notification::Failure`.
    pub fn dispatch(&mut self, action: &Action) -> Notification {
        let name = action.name();
        msg!("Action: {}", name);
        match self.submit(action) {
            Ok(signature) => {
                msg!("{} confirmed: {}", name, signature);
                Notification::Success {
                    action: name,
                    signature,
                }
            }
            Err(err) => {
                msg!("{} failed: {}", name, err);
                Notification::Failure {
                    action: name,
                    message: err.to_string(),
                }
            }
        }
    }

    pub fn submit(&mut self, action: &Action) -> Result<String> {
        let instructions = self.build(action)?;
        msg!("submitting {} instruction(s)", instructions.len());
        self.wallet.sign_and_send(&instructions)
    }

    /// The instruction bundle for `action`: missing token accounts first,
    /// then the program instruction.
    pub fn build(&self, action: &Action) -> Result<Vec<Instruction>> {
        let payer = self
            .wallet
            .public_key()
            .ok_or_else(|| error!(ErrorCode::WalletNotConnected))?;
        let mut bundle = Vec::with_capacity(2);

        match action {
            Action::List {
                nft_mint,
                loan_duration,
                interest_rate_bps,
                collateral_amount,
            } => {
                require!(*nft_mint != Pubkey::default(), ErrorCode::MissingMint);
                require!(*collateral_amount > 0, ErrorCode::InvalidAmountError);
                require!(*loan_duration > 0, ErrorCode::InvalidDurationError);

                let accounts = ListNft::resolve(&self.program_id, payer, *nft_mint);
                self.ensure_token_account(&payer, &accounts.escrow_authority, nft_mint, &mut bundle)?;
                bundle.push(accounts.instruction(
                    &self.program_id,
                    ListNftArgs {
                        loan_duration: *loan_duration,
                        interest_rate_bps: *interest_rate_bps,
                        collateral_amount: *collateral_amount,
                    },
                )?);
            }
            Action::Borrow { listing } => {
                let listing_account = self.listing(listing)?;
                let accounts = Borrow::resolve(&self.program_id, payer, *listing, &listing_account);
                self.ensure_token_account(&payer, &payer, &listing_account.nft_mint, &mut bundle)?;
                bundle.push(accounts.instruction(&self.program_id)?);
            }
            Action::Repay { loan } => {
                let loan_account = self.loan(loan)?;
                let listing_account = self.listing(&loan_account.listing)?;
                let accounts =
                    Repay::resolve(&self.program_id, payer, *loan, &loan_account, &listing_account);
                self.ensure_token_account(
                    &payer,
                    &listing_account.lender,
                    &listing_account.nft_mint,
                    &mut bundle,
                )?;
                bundle.push(accounts.instruction(&self.program_id)?);
            }
            Action::Cancel { listing } => {
                let listing_account = self.listing(listing)?;
                let accounts =
                    CancelListing::resolve(&self.program_id, payer, *listing, &listing_account);
                self.ensure_token_account(&payer, &payer, &listing_account.nft_mint, &mut bundle)?;
                bundle.push(accounts.instruction(&self.program_id)?);
            }
            Action::Liquidate { loan } => {
                let loan_account = self.loan(loan)?;
                let accounts = Liquidate::resolve(&self.program_id, payer, *loan, &loan_account);
                bundle.push(accounts.instruction(&self.program_id)?);
            }
        }

        Ok(bundle)
    }

    fn listing(&self, address: &Pubkey) -> Result<Listing> {
        fetch_account::<Listing>(&self.source, address)?
            .ok_or_else(|| error!(ErrorCode::ListingNotFound))
    }

    fn loan(&self, address: &Pubkey) -> Result<Loan> {
        fetch_account::<Loan>(&self.source, address)?.ok_or_else(|| error!(ErrorCode::LoanNotFound))
    }

    fn ensure_token_account(
        &self,
        payer: &Pubkey,
        owner: &Pubkey,
        mint: &Pubkey,
        bundle: &mut Vec<Instruction>,
    ) -> Result<()> {
        let address = pda::user_token_account(owner, mint);
        if !self.source.account_exists(&address)? {
            bundle.push(create_associated_token_account_idempotent(
                payer,
                owner,
                mint,
                &token::ID,
            ));
        }
        Ok(())
    }
}
