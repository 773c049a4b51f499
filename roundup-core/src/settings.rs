//! Engine constants: ceiling granularity, retirement horizon, tax slabs.
//!
//! Loaded once at startup and passed by shared reference; nothing here
//! changes while requests run.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoundupError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Expenses round up to the next multiple of this
    pub ceiling_multiple: Decimal,
    pub retirement_age: u32,
    /// Floor on the compounding horizon for investors at or past retirement
    pub min_investment_years: u32,
    /// Oldest accepted investor age
    pub max_age: u32,
    /// `wage` is per pay period; taxable income is `wage * wage_periods_per_year`
    pub wage_periods_per_year: u32,
    pub tax: TaxSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxSettings {
    /// Ascending, contiguous income bands
    pub slabs: Vec<TaxSlab>,
    /// Statutory ceiling on the deductible contribution
    pub deduction_cap: Decimal,
    /// Deduction may not exceed this fraction of annual income
    pub income_percent_limit: Decimal,
}

/// One progressive band: income in `[lower, upper)` is taxed at `rate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub lower: Decimal,
    /// `None` for the open top band
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxSlab {
    pub const fn new(lower: Decimal, upper: Option<Decimal>, rate: Decimal) -> Self {
        Self { lower, upper, rate }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ceiling_multiple: dec!(100),
            retirement_age: 60,
            min_investment_years: 0,
            max_age: 100,
            wage_periods_per_year: 12,
            tax: TaxSettings::default(),
        }
    }
}

impl Default for TaxSettings {
    fn default() -> Self {
        Self {
            slabs: vec![
                TaxSlab::new(dec!(0), Some(dec!(700000)), dec!(0.00)),
                TaxSlab::new(dec!(700000), Some(dec!(1000000)), dec!(0.10)),
                TaxSlab::new(dec!(1000000), Some(dec!(1200000)), dec!(0.15)),
                TaxSlab::new(dec!(1200000), Some(dec!(1500000)), dec!(0.20)),
                TaxSlab::new(dec!(1500000), None, dec!(0.30)),
            ],
            deduction_cap: dec!(200000),
            income_percent_limit: dec!(0.10),
        }
    }
}

impl Settings {
    /// Years of compounding left for an investor of `age`
    pub fn years_to_retirement(&self, age: u32) -> u32 {
        self.retirement_age
            .saturating_sub(age)
            .max(self.min_investment_years)
    }

    pub fn annual_income(&self, wage: Decimal) -> Result<Decimal> {
        wage.checked_mul(Decimal::from(self.wage_periods_per_year))
            .ok_or(RoundupError::Overflow { field: "wage" })
    }

    pub fn check_age(&self, age: u32) -> Result<()> {
        if age > self.max_age {
            return Err(RoundupError::AgeOutOfRange { age, max: self.max_age });
        }
        Ok(())
    }

    /// Reject configurations the engines cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.ceiling_multiple <= Decimal::ZERO {
            return Err(RoundupError::InvalidSettings(format!(
                "ceiling_multiple must be positive, got {}",
                self.ceiling_multiple
            )));
        }
        if self.wage_periods_per_year == 0 {
            return Err(RoundupError::InvalidSettings(
                "wage_periods_per_year must be at least 1".to_string(),
            ));
        }
        self.tax.validate()
    }
}

impl TaxSettings {
    fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(RoundupError::InvalidSettings(msg));

        if self.deduction_cap < Decimal::ZERO {
            return invalid(format!("tax.deduction_cap must not be negative, got {}", self.deduction_cap));
        }
        if self.income_percent_limit < Decimal::ZERO || self.income_percent_limit > Decimal::ONE {
            return invalid(format!(
                "tax.income_percent_limit must be within 0..=1, got {}",
                self.income_percent_limit
            ));
        }

        for (i, slab) in self.slabs.iter().enumerate() {
            if slab.rate < Decimal::ZERO || slab.rate > Decimal::ONE {
                return invalid(format!("tax.slabs[{i}].rate must be within 0..=1"));
            }
            match slab.upper {
                Some(upper) if upper <= slab.lower => {
                    return invalid(format!("tax.slabs[{i}] has upper <= lower"));
                }
                None if i + 1 != self.slabs.len() => {
                    return invalid(format!("tax.slabs[{i}] is open-ended but not the last band"));
                }
                _ => {}
            }
            if let Some(prev) = i.checked_sub(1).map(|j| &self.slabs[j]) {
                if prev.upper != Some(slab.lower) {
                    return invalid(format!("tax.slabs[{i}] does not start where tax.slabs[{}] ends", i - 1));
                }
            }
        }
        Ok(())
    }
}
