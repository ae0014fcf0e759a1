//! Fixed-rate mortgage payment estimate.

use super::display::{format_currency_cents, format_percent, format_price};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Calculator inputs. Missing fields take the calculator's starting values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct MortgageInput {
    /// Home price in dollars
    pub home_price: f64,
    /// Down payment in dollars
    pub down_payment: f64,
    /// Loan term in years
    pub loan_term_years: f64,
    /// Annual interest rate in percent, e.g. 6.5
    pub interest_rate: f64,
}

impl Default for MortgageInput {
    fn default() -> Self {
        Self {
            home_price: 500_000.0,
            down_payment: 100_000.0,
            loan_term_years: 30.0,
            interest_rate: 6.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MortgageBreakdown {
    pub principal: f64,
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
    /// Down payment as a percentage of the price; `None` when the price is zero.
    pub down_payment_percent: Option<f64>,
}

impl MortgageBreakdown {
    /// Formatted lines as the calculator displays them.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Monthly payment: {}", format_currency_cents(self.monthly_payment)),
            format!("Loan amount: {}", format_price(self.principal)),
            format!("Total interest: {}", format_price(self.total_interest)),
            format!("Total payment: {}", format_price(self.total_payment)),
        ];
        if let Some(pct) = self.down_payment_percent {
            lines.push(format!("Down payment: {} of home price", format_percent(pct, 1)));
        }
        lines
    }
}

/// Amortized monthly payment `P·r·(1+r)^n / ((1+r)^n − 1)`.
///
/// When the principal, the monthly rate or the number of payments is not
/// positive, every amount is zero.
pub fn calculate(input: &MortgageInput) -> MortgageBreakdown {
    let principal = input.home_price - input.down_payment;
    let monthly_rate = input.interest_rate / 100.0 / 12.0;
    let payments = input.loan_term_years * 12.0;

    let down_payment_percent =
        (input.home_price > 0.0).then(|| input.down_payment / input.home_price * 100.0);

    let valid = [principal, monthly_rate, payments]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0);
    if !valid {
        return MortgageBreakdown {
            principal: principal.max(0.0),
            monthly_payment: 0.0,
            total_payment: 0.0,
            total_interest: 0.0,
            down_payment_percent,
        };
    }

    let growth = (1.0 + monthly_rate).powf(payments);
    let monthly_payment = principal * monthly_rate * growth / (growth - 1.0);
    let total_payment = monthly_payment * payments;

    MortgageBreakdown {
        principal,
        monthly_payment,
        total_payment,
        total_interest: total_payment - principal,
        down_payment_percent,
    }
}
