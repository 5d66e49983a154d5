use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::system_program;
use anchor_spl::{associated_token, token};

use crate::instructions::{encode_instruction_data, NoArgs};
use crate::pda;
use crate::state::Listing;

//borrower locks collateral in escrow and receives the listed NFT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrow {
    pub borrower: Pubkey,
    pub listing: Pubkey,
    pub loan: Pubkey,
    pub nft_mint: Pubkey,
    pub escrow_authority: Pubkey,
    pub nft_vault: Pubkey,
    pub borrower_nft_ata: Pubkey,
    pub token_program: Pubkey,
    pub associated_token_program: Pubkey,
    pub system_program: Pubkey,
}

impl Borrow {
    pub const NAME: &'static str = "borrow";

    pub fn resolve(
        program_id: &Pubkey,
        borrower: Pubkey,
        listing_address: Pubkey,
        listing: &Listing,
    ) -> Self {
        Self {
            borrower,
            listing: listing_address,
            loan: pda::loan_address(program_id, &listing_address).0,
            nft_mint: listing.nft_mint,
            escrow_authority: pda::escrow_authority(program_id).0,
            nft_vault: pda::nft_vault(program_id, &listing.nft_mint),
            borrower_nft_ata: pda::user_token_account(&borrower, &listing.nft_mint),
            token_program: token::ID,
            associated_token_program: associated_token::ID,
            system_program: system_program::ID,
        }
    }

    pub fn account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.borrower, true),
            AccountMeta::new(self.listing, false),
            AccountMeta::new(self.loan, false),
            AccountMeta::new_readonly(self.nft_mint, false),
            AccountMeta::new(self.escrow_authority, false),
            AccountMeta::new(self.nft_vault, false),
            AccountMeta::new(self.borrower_nft_ata, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.associated_token_program, false),
            AccountMeta::new_readonly(self.system_program, false),
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
