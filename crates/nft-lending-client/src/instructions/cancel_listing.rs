use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_spl::token;

use crate::instructions::{encode_instruction_data, NoArgs};
use crate::pda;
use crate::state::Listing;

//lender withdraws an unborrowed listing and takes the NFT back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelListing {
    pub lender: Pubkey,
    pub listing: Pubkey,
    pub nft_mint: Pubkey,
    pub escrow_authority: Pubkey,
    pub nft_vault: Pubkey,
    pub lender_nft_ata: Pubkey,
    pub token_program: Pubkey,
}

impl CancelListing {
    pub const NAME: &'static str = "cancel_listing";

    pub fn resolve(
        program_id: &Pubkey,
        lender: Pubkey,
        listing_address: Pubkey,
        listing: &Listing,
    ) -> Self {
        Self {
            lender,
            listing: listing_address,
            nft_mint: listing.nft_mint,
            escrow_authority: pda::escrow_authority(program_id).0,
            nft_vault: pda::nft_vault(program_id, &listing.nft_mint),
            lender_nft_ata: pda::user_token_account(&lender, &listing.nft_mint),
            token_program: token::ID,
        }
    }

    pub fn account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.lender, true),
            AccountMeta::new(self.listing, false),
            AccountMeta::new_readonly(self.nft_mint, false),
            AccountMeta::new_readonly(self.escrow_authority, false),
            AccountMeta::new(self.nft_vault, false),
            AccountMeta::new(self.lender_nft_ata, false),
            AccountMeta::new_readonly(self.token_program, false),
        ]
    }

    pub fn instruction(&self, program_id: &Pubkey) -> Result<Instruction> {
        Ok(Instruction {
            program_id: *program_id,
            accounts: self.account_metas(),
            data: encode_instruction_data(Self::NAME, &NoArgs {})?,
        })
    }
}
