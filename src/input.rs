use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::LoanError;
use crate::rates::LoanTerm;
use crate::schedule::{AmortizationMethod, LoanRequest};

/// Loan parameters as typed by a user, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanPlanInput {
    /// The loan amount, optionally with `,` thousands separators ("360,000").
    pub amount: String,
    /// The term in years, fractions allowed ("1.5").
    pub years: String,
    /// One annual percentage per loan year, in order.
    pub rates: Vec<String>,
    /// `annuity` or `fixed`.
    pub method: String,
}

impl LoanPlanInput {
    /// Reads an input from JSON text.
    pub fn from_json(text: &str) -> Result<Self, LoanError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Checks every field and derives the schedule request.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoanError`] found, checking the amount, the term,
    /// the rates and the method in that order.
    pub fn validate(&self) -> Result<LoanRequest, LoanError> {
        let principal = parse_amount(&self.amount)?;
        let term = parse_term(&self.years)?;
        let period_rates = parse_rates(&self.rates)?;
        let method = self.method.parse::<AmortizationMethod>()?;

        let blocks = term.block_count() as usize;
        if period_rates.len() < blocks {
            warn!(
                "{} rate(s) given for {blocks} loan year(s), later years reuse the last rate",
                period_rates.len()
            );
        }

        Ok(LoanRequest {
            principal,
            total_periods: term.total_months,
            period_rates,
            method,
        })
    }
}

/// Parses a positive, finite loan amount. Thousands separators are ignored.
pub fn parse_amount(raw: &str) -> Result<f64, LoanError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();

    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => {
            warn!("rejected loan amount {raw:?}");
            Err(LoanError::InvalidAmount(raw.to_string()))
        }
    }
}

/// Parses a term in years into a [`LoanTerm`].
pub fn parse_term(raw: &str) -> Result<LoanTerm, LoanError> {
    let years = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| LoanError::InvalidTerm(raw.to_string()))?;

    LoanTerm::from_years(years).map_err(|_| {
        warn!("rejected loan term {raw:?}");
        LoanError::InvalidTerm(raw.to_string())
    })
}

/// Parses annual percentages. Each must be finite and not negative.
pub fn parse_rates<S: AsRef<str>>(raw: &[S]) -> Result<Vec<f64>, LoanError> {
    if raw.is_empty() {
        return Err(LoanError::MissingRates);
    }

    raw.iter()
        .enumerate()
        .map(|(index, value)| {
            let value = value.as_ref();
            match value.trim().parse::<f64>() {
                Ok(rate) if rate.is_finite() && rate >= 0.0 => Ok(rate),
                _ => {
                    warn!("rejected interest rate {value:?} at position {index}");
                    Err(LoanError::InvalidRate {
                        index,
                        value: value.to_string(),
                    })
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn input(amount: &str, years: &str, rates: &[&str], method: &str) -> LoanPlanInput {
        LoanPlanInput {
            amount: amount.to_string(),
            years: years.to_string(),
            rates: rates.iter().map(|rate| rate.to_string()).collect(),
            method: method.to_string(),
        }
    }

    #[test]
    fn test_validate_happy_path() {
        let request = input("100,000", "1.5", &["5", "6.25"], "annuity")
            .validate()
            .unwrap();

        assert_eq!(
            request,
            LoanRequest {
                principal: 100_000.0,
                total_periods: 18,
                period_rates: vec![5.0, 6.25],
                method: AmortizationMethod::Annuity,
            }
        );
    }

    #[test]
    fn test_validate_accepts_fewer_rates_than_years() {
        let request = input("360000", "30", &["10.5"], "fixed").validate().unwrap();

        assert_eq!(request.total_periods, 360);
        assert_eq!(request.period_rates, vec![10.5]);
        assert_eq!(request.method, AmortizationMethod::FixedPrincipal);
    }

    #[rstest]
    #[case("abc")]
    #[case("")]
    #[case("0")]
    #[case("-5")]
    #[case("inf")]
    #[case("NaN")]
    fn test_parse_amount_rejects(#[case] raw: &str) {
        assert!(matches!(parse_amount(raw), Err(LoanError::InvalidAmount(_))));
    }

    #[rstest]
    #[case("100,000", 100_000.0)]
    #[case(" 1,234,567.89 ", 1_234_567.89)]
    #[case("0.5", 0.5)]
    fn test_parse_amount_accepts(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!(parse_amount(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("ten")]
    #[case("0")]
    #[case("-2")]
    #[case("0.02")]
    fn test_parse_term_rejects(#[case] raw: &str) {
        assert!(matches!(parse_term(raw), Err(LoanError::InvalidTerm(_))));
    }

    #[test]
    fn test_parse_rates_reports_position() {
        let error = parse_rates(&["5", "six", "7"]).unwrap_err();
        assert!(matches!(
            error,
            LoanError::InvalidRate { index: 1, ref value } if value == "six"
        ));

        assert!(matches!(
            parse_rates(&["5", "-1"]),
            Err(LoanError::InvalidRate { index: 1, .. })
        ));
    }

    #[test]
    fn test_parse_rates_requires_one_rate() {
        let rates: [&str; 0] = [];
        assert!(matches!(parse_rates(&rates), Err(LoanError::MissingRates)));
    }

    #[test]
    fn test_parse_rates_allows_zero() {
        assert_eq!(parse_rates(&["0", " 4.5 "]).unwrap(), vec![0.0, 4.5]);
    }

    #[test]
    fn test_validate_rejects_unknown_method() {
        let result = input("1000", "1", &["5"], "balloon").validate();
        assert!(matches!(result, Err(LoanError::UnknownMethod(_))));
    }

    #[test]
    fn test_from_json() {
        let parsed = LoanPlanInput::from_json(
            r#"{"amount": "250,000", "years": "2", "rates": ["4", "4.5"], "method": "annuity"}"#,
        )
        .unwrap();

        assert_eq!(parsed, input("250,000", "2", &["4", "4.5"], "annuity"));
        assert!(matches!(
            LoanPlanInput::from_json("{\"amount\": 5}"),
            Err(LoanError::Json(_))
        ));
    }
}
