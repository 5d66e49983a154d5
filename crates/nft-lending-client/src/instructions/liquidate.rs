use anchor_lang::prelude::*;
use anchor_lang::solana_program::instruction::Instruction;
use anchor_lang::system_program;

use crate::instructions::{encode_instruction_data, NoArgs};
use crate::pda;
use crate::state::Loan;

//lender claims the escrowed collateral of an overdue loan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Liquidate {
    pub lender: Pubkey,
    pub listing: Pubkey,
    pub loan: Pubkey,
    pub escrow_authority: Pubkey,
    pub system_program: Pubkey,
}

impl Liquidate {
    pub const NAME: &'static str = "liquidate";

    pub fn resolve(program_id: &Pubkey, lender: Pubkey, loan_address: Pubkey, loan: &Loan) -> Self {
        Self {
            lender,
            listing: loan.listing,
            loan: loan_address,
            escrow_authority: pda::escrow_authority(program_id).0,
            system_program: system_program::ID,
        }
    }

    pub fn account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.lender, true),
            AccountMeta::new(self.listing, false),
            AccountMeta::new(self.loan, false),
            AccountMeta::new(self.escrow_authority, false),
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
