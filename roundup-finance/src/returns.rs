//! Returns engine: the full parse → validate → period pipeline followed by a
//! per-K-period projection of compounded, inflation-adjusted growth and the
//! tax benefit of the chosen strategy.

use roundup_core::{
    InvestmentStrategy, Result, ReturnsRequest, ReturnsResponse, RoundupError, SavingsByDate,
    Settings, TaxCalculator,
};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::parser::parse_expenses;
use crate::periods::PeriodRules;
use crate::validator::validate;

/// Profit on `principal` after `years` of annual compounding at `rate`
pub fn compound_profit(principal: Decimal, rate: Decimal, years: u32) -> Result<Decimal> {
    let growth = (Decimal::ONE + rate)
        .checked_powi(i64::from(years))
        .ok_or(RoundupError::ProjectionOverflow { years })?;
    growth
        .checked_sub(Decimal::ONE)
        .and_then(|gain| principal.checked_mul(gain))
        .ok_or(RoundupError::ProjectionOverflow { years })
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>, field: &'static str) -> Result<Decimal> {
    values
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or(RoundupError::Overflow { field })
}

#[derive(Debug, Clone, Copy)]
pub struct ReturnsEngine<'a> {
    settings: &'a Settings,
}

impl<'a> ReturnsEngine<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Whole-request checks; per-transaction problems are not errors
    fn check(&self, request: &ReturnsRequest) -> Result<()> {
        self.settings.check_age(request.age)?;
        if request.wage < Decimal::ZERO {
            return Err(RoundupError::InvalidWage(request.wage));
        }
        if request.inflation < Decimal::ZERO {
            return Err(RoundupError::InvalidInflation(request.inflation));
        }
        Ok(())
    }

    pub fn compute(
        &self,
        strategy: &InvestmentStrategy,
        request: &ReturnsRequest,
    ) -> Result<ReturnsResponse> {
        self.check(request)?;
        let annual_income = self.settings.annual_income(request.wage)?;

        let transactions = parse_expenses(&request.transactions, self.settings.ceiling_multiple)?;
        let validation = validate(request.wage, &transactions);
        let rules = PeriodRules::new(&request.q, &request.p, &request.k);
        let filtered = rules.apply(&validation.valid)?;

        let total_transaction_amount = checked_sum(validation.valid.iter().map(|t| t.amount), "amount")?;
        let total_ceiling = checked_sum(validation.valid.iter().map(|t| t.ceiling), "ceiling")?;

        // None marks a bucket nothing was attributed to
        let mut buckets: Vec<Option<Decimal>> = vec![None; request.k.len()];
        for txn in filtered.iter().filter(|t| t.in_k_period) {
            if let Some(i) = rules.attribute(txn.date) {
                let bucket = buckets[i].get_or_insert(Decimal::ZERO);
                *bucket = bucket
                    .checked_add(txn.remanent)
                    .ok_or(RoundupError::Overflow { field: "remanent" })?;
            }
        }

        let years = self.settings.years_to_retirement(request.age);
        let effective_rate = strategy.annual_rate - request.inflation / dec!(100);
        let calculator = TaxCalculator::new(&self.settings.tax);

        let mut savings_by_dates = Vec::new();
        for (period, amount) in request.k.iter().zip(buckets) {
            let Some(amount) = amount else { continue };
            let profit = compound_profit(amount, effective_rate, years)?.round_dp(2);
            let tax_benefit = strategy
                .tax_benefit(&calculator, annual_income, amount)?
                .round_dp(2);
            savings_by_dates.push(SavingsByDate {
                start: period.start,
                end: period.end,
                amount,
                profit,
                tax_benefit,
            });
        }

        tracing::info!(
            strategy = strategy.name,
            age = request.age,
            years,
            %effective_rate,
            valid = validation.valid.len(),
            invalid = validation.invalid.len(),
            buckets = savings_by_dates.len(),
            "computed returns"
        );

        Ok(ReturnsResponse {
            total_transaction_amount,
            total_ceiling,
            savings_by_dates,
        })
    }
}
