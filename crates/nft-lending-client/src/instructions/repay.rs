use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::system_program;
use anchor_spl::token;

use crate::instructions::{encode_instruction_data, NoArgs};
use crate::pda;
use crate::state::{Listing, Loan};

//borrower returns the NFT, pays interest to the lender and unlocks collateral
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repay {
    pub borrower: Pubkey,
    pub lender: Pubkey,
    pub listing: Pubkey,
    pub loan: Pubkey,
    pub nft_mint: Pubkey,
    pub escrow_authority: Pubkey,
    pub borrower_nft_ata: Pubkey,
    pub lender_nft_ata: Pubkey,
    pub token_program: Pubkey,
    pub system_program: Pubkey,
}

impl Repay {
    pub const NAME: &'static str = "repay";

    pub fn resolve(
        program_id: &Pubkey,
        borrower: Pubkey,
        loan_address: Pubkey,
        loan: &Loan,
        listing: &Listing,
    ) -> Self {
        Self {
            borrower,
            lender: listing.lender,
            listing: loan.listing,
            loan: loan_address,
            nft_mint: listing.nft_mint,
            escrow_authority: pda::escrow_authority(program_id).0,
            borrower_nft_ata: pda::user_token_account(&borrower, &listing.nft_mint),
            lender_nft_ata: pda::user_token_account(&listing.lender, &listing.nft_mint),
            token_program: token::ID,
            system_program: system_program::ID,
        }
    }

    pub fn account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.borrower, true),
            AccountMeta::new(self.lender, false),
            AccountMeta::new(self.listing, false),
            AccountMeta::new(self.loan, false),
            AccountMeta::new_readonly(self.nft_mint, false),
            AccountMeta::new(self.escrow_authority, false),
            AccountMeta::new(self.borrower_nft_ata, false),
            AccountMeta::new(self.lender_nft_ata, false),
            AccountMeta::new_readonly(self.token_program, false),
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
