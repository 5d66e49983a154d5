use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Wallet not connected")]
    WalletNotConnected,
    #[msg("Missing NFT mint")]
    MissingMint,
    #[msg("Invalid collateral amount")]
    InvalidAmountError,
    #[msg("Invalid loan duration")]
    InvalidDurationError,
    #[msg("Listing not found")]
    ListingNotFound,
    #[msg("Loan not found")]
    LoanNotFound,
    #[msg("NFT metadata not found")]
    NftNotFound,
    #[msg("Collection not found")]
    CollectionNotFound,
    #[msg("NFT is not part of a verified collection")]
    UnverifiedCollection,
    #[msg("Account data could not be decoded")]
    AccountDecodeFailed,
    #[msg("Event payload could not be decoded")]
    EventDecodeFailed,
    #[msg("Unknown event discriminator")]
    UnknownEvent,
    #[msg("Instruction data could not be encoded")]
    InstructionEncodingFailed,
    #[msg("Arithmetic overflow")]
    MathOverflow,
    #[msg("Account source request failed")]
    SourceUnavailable,
    #[msg("Transaction submission failed")]
    SubmissionFailed,
}
