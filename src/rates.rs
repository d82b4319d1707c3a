use serde::{Deserialize, Serialize};

use crate::error::LoanError;

/// Number of monthly periods that share one entry of the rate sequence.
pub const PERIODS_PER_BLOCK: i64 = 12;

/// Fractional part of a term (in years) below which the term counts as whole.
const FRACTION_EPSILON: f64 = 0.0001;

/// Returns the monthly fractional rate that applies to `period_index` (1-based).
///
/// Periods are grouped in blocks of [`PERIODS_PER_BLOCK`], each block reading
/// one annual percentage from `period_rates`. A block outside the sequence,
/// including the negative blocks of non-positive indexes, falls back to the
/// last rate. An annual `5` becomes `5 / 100 / 12`.
pub fn rate_for_period(period_rates: &[f64], period_index: i64) -> f64 {
    let block = period_index.saturating_sub(1).div_euclid(PERIODS_PER_BLOCK);

    let annual_rate = usize::try_from(block)
        .ok()
        .and_then(|block| period_rates.get(block))
        .or_else(|| period_rates.last())
        .copied()
        .unwrap_or_default();

    annual_rate / 100.0 / 12.0
}

/// One run of consecutive months sharing a single annual rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBlock {
    /// 1-based position of the block, i.e. the loan year it covers.
    pub period: u32,
    /// Number of monthly periods in the block.
    pub months: i64,
}

/// A loan term given in (possibly fractional) years, split into rate blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerm {
    pub years: f64,
    pub total_months: i64,
    pub full_years: u32,
    pub has_fraction: bool,
}

impl LoanTerm {
    /// Builds a term from a year count such as `1.5`.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::InvalidTerm`] if `years` is not finite, not positive,
    /// or rounds to zero months.
    pub fn from_years(years: f64) -> Result<Self, LoanError> {
        if !years.is_finite() || years <= 0.0 || years > f64::from(u32::MAX) {
            return Err(LoanError::InvalidTerm(years.to_string()));
        }

        let total_months = (years * 12.0).round() as i64;
        if total_months <= 0 {
            return Err(LoanError::InvalidTerm(years.to_string()));
        }

        let full_years = years.floor();
        Ok(Self {
            years,
            total_months,
            full_years: full_years as u32,
            has_fraction: years - full_years > FRACTION_EPSILON,
        })
    }

    /// Number of rate blocks, one per started year.
    pub fn block_count(&self) -> u32 {
        self.full_years + u32::from(self.has_fraction)
    }

    /// The rate blocks of this term, in order. Every block holds a full year
    /// except the last one, which takes whatever months remain.
    pub fn blocks(&self) -> Vec<RateBlock> {
        let count = self.block_count();
        (1..=count)
            .map(|period| {
                let months = if period < count {
                    PERIODS_PER_BLOCK
                } else {
                    self.total_months - i64::from(count - 1) * PERIODS_PER_BLOCK
                };
                RateBlock { period, months }
            })
            .collect()
    }
}
