/// Level payment that amortizes `balance` over `periods_left` periods at `rate`.
///
/// PMT = r * (B * (1 + r)^n) / ((1 + r)^n - 1)
///
/// There is no zero-rate branch here: at `rate == 0` the denominator vanishes
/// and the result is `NaN`. Annuity schedules are built on this form.
pub(crate) fn level_payment(balance: f64, rate: f64, periods_left: i64) -> f64 {
    let growth = (1.0 + rate).powf(periods_left as f64);
    rate * (balance * growth) / (growth - 1.0)
}

/// Calculates the constant monthly payment of a loan (spreadsheet `PMT`).
///
/// # Arguments
///
/// * `rate_per_period` - The fractional rate of one period (`0.005` for 0.5%).
/// * `total_periods` - The number of payments.
/// * `loan_amount` - The principal.
///
/// Returns `0.0` when `total_periods` or `loan_amount` is not positive, and
/// `loan_amount / total_periods` when the rate is zero.
pub fn calculate_monthly_payment(rate_per_period: f64, total_periods: i64, loan_amount: f64) -> f64 {
    if total_periods <= 0 || loan_amount <= 0.0 {
        return 0.0;
    }

    if rate_per_period == 0.0 {
        return loan_amount / total_periods as f64;
    }

    level_payment(loan_amount, rate_per_period, total_periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.005, 12, 100_000.0, 8606.64)]
    #[case(0.0, 12, 100_000.0, 8333.33)]
    #[case(-0.005, 12, 100_000.0, 8064.99)]
    #[case(0.01, 12, 12_000.0, 1066.185)]
    fn test_calculate_monthly_payment(
        #[case] rate: f64,
        #[case] periods: i64,
        #[case] amount: f64,
        #[case] expected: f64,
    ) {
        let payment = calculate_monthly_payment(rate, periods, amount);
        assert!((payment - expected).abs() < 0.005, "got {payment}");
    }

    #[rstest]
    #[case(0.005, 12, 0.0)]
    #[case(0.005, 0, 100_000.0)]
    #[case(0.005, -12, 100_000.0)]
    #[case(0.005, 12, -100_000.0)]
    fn test_calculate_monthly_payment_degenerate_inputs(
        #[case] rate: f64,
        #[case] periods: i64,
        #[case] amount: f64,
    ) {
        assert_eq!(calculate_monthly_payment(rate, periods, amount), 0.0);
    }

    #[test]
    fn test_level_payment_last_period_clears_balance() {
        let balance = 1_234.56;
        let rate = 0.004;
        let payment = level_payment(balance, rate, 1);
        assert!((payment - balance * (1.0 + rate)).abs() < 1e-9);
    }

    #[test]
    fn test_level_payment_zero_rate_is_nan() {
        assert!(level_payment(100_000.0, 0.0, 12).is_nan());
    }
}
