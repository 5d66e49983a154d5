// PDA seeds
pub const ESCROW_SEED: &[u8] = b"escrow";
pub const LISTING_SEED: &[u8] = b"listing";
pub const LOAN_SEED: &[u8] = b"loan";

// Time
pub const SECONDS_PER_MINUTE: i64 = 60;
pub const SECONDS_PER_HOUR: i64 = 3_600;
pub const SECONDS_PER_DAY: i64 = 86_400;
pub const DAYS_PER_YEAR: u64 = 365;
pub const SECONDS_PER_YEAR: u64 = DAYS_PER_YEAR * SECONDS_PER_DAY as u64; // 31_536_000

// Rates are annual, in basis points
pub const BPS_DENOMINATOR: u64 = 10_000;
pub const BPS_PER_PERCENT: u64 = 100;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;
pub const SOL_DECIMALS: usize = 9;

// Collateral defaults to the full floor price
pub const DEFAULT_COLLATERAL_RATIO_BPS: u16 = 10_000;

// Liquidation view re-fetch period, in seconds
pub const DEFAULT_LIQUIDATION_POLL_INTERVAL: i64 = 30;

// Byte offsets inside the Anchor-encoded accounts (8-byte discriminator first)
pub const DISCRIMINATOR_OFFSET: usize = 0;
pub const LISTING_LENDER_OFFSET: usize = 8;
pub const LISTING_NFT_MINT_OFFSET: usize = 40;
pub const LISTING_IS_ACTIVE_OFFSET: usize = 90;
pub const LOAN_BORROWER_OFFSET: usize = 8;
pub const LOAN_LISTING_OFFSET: usize = 40;
pub const LOAN_IS_ACTIVE_OFFSET: usize = 98;
