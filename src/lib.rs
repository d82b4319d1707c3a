//! `loan_amortization` computes month-by-month repayment schedules for a loan.
//!
//! Two amortization methods are supported:
//! - **Annuity**: the payment is solved again every month so the remaining balance
//!   is paid off over the remaining term at the current rate. With one rate the
//!   payment stays level; when the rate changes the payment follows.
//! - **Fixed principal**: the same share of principal is repaid every month and
//!   interest is charged on what is left, so payments decline over time.
//!
//! Rates are given as annual percentages, one per loan year. Months beyond the
//! last supplied year keep using the last rate.
//!
//! ## Usage
//!
//! ```rust
//! use loan_amortization::{calculate_loan_plan, LoanPlanInput};
//!
//! let input = LoanPlanInput {
//!     amount: "100,000".to_string(),
//!     years: "2".to_string(),
//!     rates: vec!["5".to_string(), "6".to_string()],
//!     method: "annuity".to_string(),
//! };
//!
//! match calculate_loan_plan(&input) {
//!     Ok(plan) => {
//!         println!("First payment:  {:.2}", plan.summary.first_payment);
//!         println!("Total interest: {:.2}", plan.summary.total_interest);
//!         println!("Total paid:     {:.2}", plan.summary.total_payment);
//!     }
//!     Err(e) => {
//!         eprintln!("Error calculating loan plan: {e:#}");
//!     }
//! }
//! ```
//!
//! The engine functions can also be called directly with validated numbers:
//!
//! ```rust
//! use loan_amortization::compute_fixed_principal_schedule;
//!
//! let schedule = compute_fixed_principal_schedule(12_000.0, 12, &[12.0]);
//! assert_eq!(schedule.len(), 12);
//! assert!((schedule.total_interest() - 780.0).abs() < 1e-9);
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod input;
pub mod payment;
pub mod rates;
pub mod schedule;
pub mod summary;

pub use error::LoanError;
pub use input::LoanPlanInput;
pub use payment::calculate_monthly_payment;
pub use rates::{LoanTerm, PERIODS_PER_BLOCK, RateBlock, rate_for_period};
pub use schedule::{
    AmortizationMethod, LoanRequest, Schedule, ScheduleRow, ScheduleRows,
    compute_annuity_schedule, compute_fixed_principal_schedule, compute_schedule,
};
pub use summary::{MethodComparison, ScheduleSummary, compare_methods};

/// A validated request with its schedule and totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPlan {
    pub request: LoanRequest,
    pub schedule: Schedule,
    pub summary: ScheduleSummary,
}

/// Validates raw input, computes the schedule and summarizes it.
///
/// This is the main entry point of the library.
///
/// # Errors
///
/// Returns an error if the input is rejected (see [`LoanError`]) or if the
/// schedule totals are not finite, as with an annuity at a zero rate.
pub fn calculate_loan_plan(input: &LoanPlanInput) -> Result<LoanPlan, anyhow::Error> {
    let request = input.validate().context("Invalid loan input")?;
    let schedule = compute_schedule(&request);
    let summary = ScheduleSummary::from_schedule(&schedule)
        .with_context(|| format!("Cannot summarize {} schedule", request.method))?;

    Ok(LoanPlan {
        request,
        schedule,
        summary,
    })
}
