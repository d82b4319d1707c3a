use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::schedule::{
    AmortizationMethod, LoanRequest, Schedule, compute_annuity_schedule,
    compute_fixed_principal_schedule,
};

/// Headline figures of a schedule, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub method: AmortizationMethod,
    /// Number of periods in the schedule.
    pub periods: usize,
    /// The payment of the first period.
    pub first_payment: Decimal,
    /// The payment of the last period.
    pub last_payment: Decimal,
    /// The sum of all interest portions.
    pub total_interest: Decimal,
    /// The sum of all payments.
    pub total_payment: Decimal,
    /// Balance left after the last period, zero when fully amortized.
    pub final_balance: Decimal,
}

impl ScheduleSummary {
    /// Reduces `schedule` into its totals.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::NonFiniteResult`] if any total is `NaN` or infinite,
    /// which is what an annuity at a zero rate produces.
    pub fn from_schedule(schedule: &Schedule) -> Result<Self, LoanError> {
        let first_payment = schedule.first().map_or(0.0, |row| row.total_payment);
        let last_payment = schedule.last().map_or(0.0, |row| row.total_payment);

        Ok(Self {
            method: schedule.method,
            periods: schedule.len(),
            first_payment: to_money(first_payment, "first_payment")?,
            last_payment: to_money(last_payment, "last_payment")?,
            total_interest: to_money(schedule.total_interest(), "total_interest")?,
            total_payment: to_money(schedule.total_payment(), "total_payment")?,
            final_balance: to_money(schedule.final_balance().unwrap_or_default(), "final_balance")?,
        })
    }
}

/// Converts a float amount to a [`Decimal`] rounded to two places.
fn to_money(value: f64, field: &'static str) -> Result<Decimal, LoanError> {
    let amount = Decimal::from_f64(value).ok_or(LoanError::NonFiniteResult { field })?;
    let rounded = amount.round_dp(2);

    // -0.00 left over from float noise reads as zero
    if rounded.is_zero() {
        return Ok(dec!(0));
    }
    Ok(rounded)
}

/// Both schedules of one loan, side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodComparison {
    pub annuity: Schedule,
    pub fixed_principal: Schedule,
}

impl MethodComparison {
    /// Extra interest paid by choosing the annuity over fixed principal.
    pub fn interest_saving(&self) -> f64 {
        self.annuity.total_interest() - self.fixed_principal.total_interest()
    }

    /// Summaries of the annuity and fixed-principal schedules, in that order.
    pub fn summaries(&self) -> Result<(ScheduleSummary, ScheduleSummary), LoanError> {
        Ok((
            ScheduleSummary::from_schedule(&self.annuity)?,
            ScheduleSummary::from_schedule(&self.fixed_principal)?,
        ))
    }
}

/// Computes both methods for `request`, ignoring its own method.
pub fn compare_methods(request: &LoanRequest) -> MethodComparison {
    MethodComparison {
        annuity: compute_annuity_schedule(
            request.principal,
            request.total_periods,
            &request.period_rates,
        ),
        fixed_principal: compute_fixed_principal_schedule(
            request.principal,
            request.total_periods,
            &request.period_rates,
        ),
    }
}
