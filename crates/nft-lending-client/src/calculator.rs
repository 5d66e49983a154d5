use std::fmt;

use anchor_lang::prelude::*;

use crate::constants::*;
use crate::error::ErrorCode;

// lamports, annual bps and seconds; u128 intermediates, results round down

/// Terms a loan is priced with: principal (floor price or locked collateral),
/// annual rate and duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanTerms {
    pub principal: u64,
    pub interest_rate_bps: u16,
    /// seconds
    pub duration: u64,
}

impl LoanTerms {
    pub fn new(principal: u64, interest_rate_bps: u16, duration: u64) -> Self {
        Self {
            principal,
            interest_rate_bps,
            duration,
        }
    }

    pub fn daily_interest(&self) -> Result<u64> {
        daily_interest(self.principal, self.interest_rate_bps)
    }

    pub fn accrued_interest(&self, elapsed: u64) -> Result<u64> {
        accrued_interest(self.principal, self.interest_rate_bps, elapsed)
    }

    /// Interest owed at the due date.
    pub fn total_interest(&self) -> Result<u64> {
        self.accrued_interest(self.duration)
    }

    pub fn total_repayment(&self) -> Result<u64> {
        self.principal
            .checked_add(self.total_interest()?)
            .ok_or_else(|| error!(ErrorCode::MathOverflow))
    }

    pub fn due_date(&self, start_time: i64) -> Result<i64> {
        due_date(start_time, self.duration)
    }
}

/// principal × bps / (10 000 × 365)
pub fn daily_interest(principal: u64, interest_rate_bps: u16) -> Result<u64> {
    accrued_interest(principal, interest_rate_bps, SECONDS_PER_DAY as u64)
}

/// Simple interest prorated per second:
/// principal × bps × elapsed / (10 000 × 365 × 86 400).
pub fn accrued_interest(principal: u64, interest_rate_bps: u16, elapsed: u64) -> Result<u64> {
    let numerator = (principal as u128)
        .checked_mul(interest_rate_bps as u128)
        .and_then(|v| v.checked_mul(elapsed as u128))
        .ok_or_else(|| error!(ErrorCode::MathOverflow))?;
    let interest = numerator / (BPS_DENOMINATOR as u128 * SECONDS_PER_YEAR as u128);
    u64::try_from(interest).map_err(|_| error!(ErrorCode::MathOverflow))
}

pub fn due_date(start_time: i64, duration: u64) -> Result<i64> {
    i64::try_from(duration)
        .ok()
        .and_then(|d| start_time.checked_add(d))
        .ok_or_else(|| error!(ErrorCode::MathOverflow))
}

/// max(0, due − now)
pub fn time_remaining(due_time: i64, now: i64) -> i64 {
    due_time.saturating_sub(now).max(0)
}

/// max(0, now − due)
pub fn time_overdue(due_time: i64, now: i64) -> i64 {
    now.saturating_sub(due_time).max(0)
}

pub fn is_overdue(due_time: i64, now: i64) -> bool {
    now > due_time
}

/// Whole days between `start_time` and `now`, zero before the start.
pub fn days_elapsed(start_time: i64, now: i64) -> u64 {
    (now.saturating_sub(start_time).max(0) / SECONDS_PER_DAY) as u64
}

/// Collateral required against a floor price at `collateral_ratio_bps`.
pub fn collateral_for_floor_price(floor_price: u64, collateral_ratio_bps: u16) -> Result<u64> {
    let collateral = (floor_price as u128) * (collateral_ratio_bps as u128) / BPS_DENOMINATOR as u128;
    u64::try_from(collateral).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Lamports as SOL with `decimals` fractional digits, truncated.
pub fn lamports_to_sol_string(lamports: u64, decimals: usize) -> String {
    let whole = lamports / LAMPORTS_PER_SOL;
    let decimals = decimals.min(SOL_DECIMALS);
    if decimals == 0 {
        return whole.to_string();
    }
    let fraction = format!("{:09}", lamports % LAMPORTS_PER_SOL);
    format!("{}.{}", whole, &fraction[..decimals])
}

/// 1250 -> "12.50"
pub fn bps_to_percent_string(bps: u16) -> String {
    let bps = bps as u64;
    format!("{}.{:02}", bps / BPS_PER_PERCENT, bps % BPS_PER_PERCENT)
}

/// A non-negative span of seconds split for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBreakdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeBreakdown {
    pub fn from_seconds(total: i64) -> Self {
        let total = total.max(0);
        Self {
            days: total / SECONDS_PER_DAY,
            hours: total % SECONDS_PER_DAY / SECONDS_PER_HOUR,
            minutes: total % SECONDS_PER_HOUR / SECONDS_PER_MINUTE,
            seconds: total % SECONDS_PER_MINUTE,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl fmt::Display for TimeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d {}h", self.days, self.hours)
        } else if self.hours > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else {
            write!(f, "{}m {}s", self.minutes, self.seconds)
        }
    }
}

/// Everything a loan card shows, evaluated at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanQuote {
    pub terms: LoanTerms,
    pub start_time: i64,
    pub due_time: i64,
    pub daily_interest: u64,
    pub accrued_interest: u64,
    pub total_interest: u64,
    pub total_repayment: u64,
    pub time_remaining: TimeBreakdown,
    pub time_overdue: TimeBreakdown,
    pub is_overdue: bool,
}

impl LoanQuote {
    pub fn at(terms: LoanTerms, start_time: i64, now: i64) -> Result<Self> {
        let due_time = terms.due_date(start_time)?;
        let elapsed = now.saturating_sub(start_time).max(0) as u64;

        Ok(Self {
            terms,
            start_time,
            due_time,
            daily_interest: terms.daily_interest()?,
            accrued_interest: terms.accrued_interest(elapsed)?,
            total_interest: terms.total_interest()?,
            total_repayment: terms.total_repayment()?,
            time_remaining: TimeBreakdown::from_seconds(time_remaining(due_time, now)),
            time_overdue: TimeBreakdown::from_seconds(time_overdue(due_time, now)),
            is_overdue: is_overdue(due_time, now),
        })
    }

    /// Liquidation opens once the due date has passed.
    pub fn is_liquidatable(&self) -> bool {
        self.is_overdue
    }
}
