use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::system_program;
use anchor_spl::{associated_token, token};

use crate::instructions::encode_instruction_data;
use crate::pda;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListNftArgs {
    //duration in seconds
    pub loan_duration: u64,
    pub interest_rate_bps: u16,
    pub collateral_amount: u64,
}

//lender moves the NFT into the vault and publishes the terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNft {
    pub lender: Pubkey,
    pub nft_mint: Pubkey,
    pub lender_nft_ata: Pubkey,
    pub listing: Pubkey,
    pub escrow_authority: Pubkey,
    pub nft_vault: Pubkey,
    pub token_program: Pubkey,
    pub associated_token_program: Pubkey,
    pub system_program: Pubkey,
}

impl ListNft {
    pub const NAME: &'static str = "list_nft";

    pub fn resolve(program_id: &Pubkey, lender: Pubkey, nft_mint: Pubkey) -> Self {
        Self {
            lender,
            nft_mint,
            lender_nft_ata: pda::user_token_account(&lender, &nft_mint),
            listing: pda::listing_address(program_id, &lender, &nft_mint).0,
            escrow_authority: pda::escrow_authority(program_id).0,
            nft_vault: pda::nft_vault(program_id, &nft_mint),
            token_program: token::ID,
            associated_token_program: associated_token::ID,
            system_program: system_program::ID,
        }
    }

    pub fn account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.lender, true),
            AccountMeta::new_readonly(self.nft_mint, false),
            AccountMeta::new(self.lender_nft_ata, false),
            AccountMeta::new(self.listing, false),
            AccountMeta::new_readonly(self.escrow_authority, false),
            AccountMeta::new(self.nft_vault, false),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.associated_token_program, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }

    pub fn instruction(&self, program_id: &Pubkey, args: ListNftArgs) -> Result<Instruction> {
        Ok(Instruction {
            program_id: *program_id,
            accounts: self.account_metas(),
            data: encode_instruction_data(Self::NAME, &args)?,
        })
    }
}
