//! Progressive slab tax and the benefit of a deductible contribution.

use rust_decimal::Decimal;

use crate::error::{Result, RoundupError};
use crate::settings::TaxSettings;

/// Borrowing view over the configured slab table
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    settings: &'a TaxSettings,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(settings: &'a TaxSettings) -> Self {
        Self { settings }
    }

    /// Tax owed on `income`: each band's slice of income at that band's rate
    pub fn slab_tax(&self, income: Decimal) -> Decimal {
        let mut tax = Decimal::ZERO;
        for slab in &self.settings.slabs {
            if income <= slab.lower {
                break;
            }
            let top = match slab.upper {
                Some(upper) => income.min(upper),
                None => income,
            };
            tax += (top - slab.lower) * slab.rate;
        }
        tax
    }

    /// How much of `contribution` may be deducted: capped by the statutory
    /// limit and by a share of income
    pub fn deductible_amount(&self, annual_income: Decimal, contribution: Decimal) -> Result<Decimal> {
        let income_limit = self
            .settings
            .income_percent_limit
            .checked_mul(annual_income)
            .ok_or(RoundupError::Overflow { field: "income" })?;
        Ok(contribution
            .min(income_limit)
            .min(self.settings.deduction_cap)
            .max(Decimal::ZERO))
    }

    /// Tax saved by deducting `deduction` from `income`
    pub fn benefit(&self, income: Decimal, deduction: Decimal) -> Decimal {
        let deduction = deduction.max(Decimal::ZERO).min(income.max(Decimal::ZERO));
        self.slab_tax(income) - self.slab_tax(income - deduction)
    }
}
