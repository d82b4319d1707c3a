use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::payment::level_payment;
use crate::rates::rate_for_period;

/// How the principal is paid back over the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmortizationMethod {
    /// The payment is re-solved every period so that the remaining balance
    /// amortizes over the remaining term at the current rate.
    Annuity,
    /// The same share of principal every period, so payments decline.
    FixedPrincipal,
}

impl fmt::Display for AmortizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmortizationMethod::Annuity => write!(f, "annuity"),
            AmortizationMethod::FixedPrincipal => write!(f, "fixed"),
        }
    }
}

impl FromStr for AmortizationMethod {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annuity" => Ok(AmortizationMethod::Annuity),
            "fixed" | "fixed_principal" | "fixed-principal" => Ok(AmortizationMethod::FixedPrincipal),
            _ => Err(LoanError::UnknownMethod(s.to_string())),
        }
    }
}

/// Validated parameters of a schedule computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// The initial balance.
    pub principal: f64,
    /// The number of monthly periods. Zero or less produces no rows.
    pub total_periods: i64,
    /// Annual percentages, one per block of twelve periods.
    pub period_rates: Vec<f64>,
    pub method: AmortizationMethod,
}

/// The breakdown of a single period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// 1-based period number.
    pub period: i64,
    /// Balance owed when the period starts.
    pub beginning_balance: f64,
    /// Interest charged on the beginning balance.
    pub interest_portion: f64,
    /// Principal repaid in the period.
    pub principal_portion: f64,
    /// Interest plus principal.
    pub total_payment: f64,
    /// Balance left once the principal portion is repaid.
    pub ending_balance: f64,
}

/// An amortization table, one row per period in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub method: AmortizationMethod,
    pub rows: Vec<ScheduleRow>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&ScheduleRow> {
        self.rows.first()
    }

    pub fn last(&self) -> Option<&ScheduleRow> {
        self.rows.last()
    }

    /// Sum of the interest portions.
    pub fn total_interest(&self) -> f64 {
        self.rows.iter().map(|row| row.interest_portion).sum()
    }

    /// Sum of the payments.
    pub fn total_payment(&self) -> f64 {
        self.rows.iter().map(|row| row.total_payment).sum()
    }

    /// Balance after the last period, or `None` for an empty schedule.
    pub fn final_balance(&self) -> Option<f64> {
        self.last().map(|row| row.ending_balance)
    }
}

/// Lazily produces the rows of a schedule, one period per call to `next`.
///
/// The remaining balance is the only state carried between periods. The
/// iterator is finite and cannot be restarted.
#[derive(Debug, Clone)]
pub struct ScheduleRows<'a> {
    method: AmortizationMethod,
    period_rates: &'a [f64],
    total_periods: i64,
    fixed_principal: f64,
    next_period: i64,
    balance: f64,
}

impl<'a> ScheduleRows<'a> {
    pub fn new(
        method: AmortizationMethod,
        principal: f64,
        total_periods: i64,
        period_rates: &'a [f64],
    ) -> Self {
        let fixed_principal = if total_periods > 0 {
            principal / total_periods as f64
        } else {
            0.0
        };

        Self {
            method,
            period_rates,
            total_periods,
            fixed_principal,
            next_period: 1,
            balance: principal,
        }
    }

    fn remaining(&self) -> usize {
        usize::try_from(self.total_periods.saturating_sub(self.next_period).saturating_add(1)).unwrap_or(0)
    }
}

impl Iterator for ScheduleRows<'_> {
    type Item = ScheduleRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_period > self.total_periods {
            return None;
        }

        let period = self.next_period;
        let beginning_balance = self.balance;
        let rate = rate_for_period(self.period_rates, period);
        let interest_portion = beginning_balance * rate;

        let principal_portion = match self.method {
            AmortizationMethod::Annuity => {
                let periods_left = self.total_periods - period + 1;
                level_payment(beginning_balance, rate, periods_left) - interest_portion
            }
            AmortizationMethod::FixedPrincipal => self.fixed_principal,
        };

        let row = ScheduleRow {
            period,
            beginning_balance,
            interest_portion,
            principal_portion,
            total_payment: interest_portion + principal_portion,
            ending_balance: beginning_balance - principal_portion,
        };
        trace!("{} period {period}: {row:?}", self.method);

        self.balance = row.ending_balance;
        self.next_period += 1;
        Some(row)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ScheduleRows<'_> {}

impl FusedIterator for ScheduleRows<'_> {}

fn collect_schedule(
    method: AmortizationMethod,
    principal: f64,
    total_periods: i64,
    period_rates: &[f64],
) -> Schedule {
    debug!(
        "computing {method} schedule: principal={principal}, periods={total_periods}, rate blocks={}",
        period_rates.len()
    );

    Schedule {
        method,
        rows: ScheduleRows::new(method, principal, total_periods, period_rates).collect(),
    }
}

/// Computes an annuity schedule.
///
/// Every period the payment is solved again for the current balance, the
/// current block's rate and the periods left, so a rate change between blocks
/// re-amortizes what is still owed. An all-zero rate sequence has no
/// solution under this formula and yields `NaN` rows.
///
/// Returns an empty schedule when `total_periods` is zero or negative.
pub fn compute_annuity_schedule(principal: f64, total_periods: i64, period_rates: &[f64]) -> Schedule {
    collect_schedule(AmortizationMethod::Annuity, principal, total_periods, period_rates)
}

/// Computes a fixed-principal schedule.
///
/// Each period repays `principal / total_periods` plus interest on the
/// balance, so the balance reaches zero whatever the rates are.
///
/// Returns an empty schedule when `total_periods` is zero or negative.
pub fn compute_fixed_principal_schedule(
    principal: f64,
    total_periods: i64,
    period_rates: &[f64],
) -> Schedule {
    collect_schedule(
        AmortizationMethod::FixedPrincipal,
        principal,
        total_periods,
        period_rates,
    )
}

/// Computes the schedule of `request` with its own method.
pub fn compute_schedule(request: &LoanRequest) -> Schedule {
    match request.method {
        AmortizationMethod::Annuity => compute_annuity_schedule(
            request.principal,
            request.total_periods,
            &request.period_rates,
        ),
        AmortizationMethod::FixedPrincipal => compute_fixed_principal_schedule(
            request.principal,
            request.total_periods,
            &request.period_rates,
        ),
    }
}
