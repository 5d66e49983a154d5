use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;

use crate::constants::{ESCROW_SEED, LISTING_SEED, LOAN_SEED};

/// Program-owned authority holding NFTs and collateral in custody.
pub fn escrow_authority(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[ESCROW_SEED], program_id)
}

pub fn listing_address(program_id: &Pubkey, lender: &Pubkey, nft_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[LISTING_SEED, lender.as_ref(), nft_mint.as_ref()],
        program_id,
    )
}

pub fn loan_address(program_id: &Pubkey, listing: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[LOAN_SEED, listing.as_ref()], program_id)
}

/// Escrow authority's token account for `nft_mint`.
pub fn nft_vault(program_id: &Pubkey, nft_mint: &Pubkey) -> Pubkey {
    let (authority, _) = escrow_authority(program_id);
    get_associated_token_address(&authority, nft_mint)
}

pub fn user_token_account(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}
