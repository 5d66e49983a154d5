pub mod borrow;
pub mod cancel_listing;
pub mod liquidate;
pub mod list_nft;
pub mod repay;

pub use borrow::*;
pub use cancel_listing::*;
pub use liquidate::*;
pub use list_nft::*;
pub use repay::*;

use anchor_lang::prelude::*;
use anchor_lang::solana_program::hash::hash;

use crate::error::ErrorCode;

/// First 8 bytes of `sha256("global:<name>")`, the Anchor instruction selector.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&hash(format!("global:{name}").as_bytes()).to_bytes()[..8]);
    discriminator
}

pub(crate) fn encode_instruction_data<T: AnchorSerialize>(name: &str, args: &T) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator(name).to_vec();
    args.serialize(&mut data)
        .map_err(|_| error!(ErrorCode::InstructionEncodingFailed))?;
    Ok(data)
}

/// Argument-less instructions.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoArgs {}
