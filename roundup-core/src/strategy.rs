//! Investment strategies and the name → strategy registry.
//!
//! Strategies are `'static` constants: resolving one never allocates and the
//! result can be shared freely across threads. Adding a vehicle means adding
//! a [`StrategyKind`] variant and one registry row.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, RoundupError};
use crate::tax::TaxCalculator;

pub const NPS_RATE: Decimal = dec!(0.0711);
pub const INDEX_RATE: Decimal = dec!(0.1449);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    Nps,
    Index,
}

/// A named investment vehicle with a fixed growth rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentStrategy {
    pub kind: StrategyKind,
    /// Lookup key, also used in route names (`returns:nps`)
    pub name: &'static str,
    pub display_name: &'static str,
    /// Annual growth as a fraction (0.0711 = 7.11%)
    pub annual_rate: Decimal,
    /// Whether contributions reduce taxable income
    pub tax_deductible: bool,
}

// Indexed by `StrategyKind as usize`
static REGISTRY: [InvestmentStrategy; 2] = [
    InvestmentStrategy {
        kind: StrategyKind::Nps,
        name: "nps",
        display_name: "NPS",
        annual_rate: NPS_RATE,
        tax_deductible: true,
    },
    InvestmentStrategy {
        kind: StrategyKind::Index,
        name: "index",
        display_name: "Index (NIFTY 50)",
        annual_rate: INDEX_RATE,
        tax_deductible: false,
    },
];

impl StrategyKind {
    pub const ALL: [StrategyKind; 2] = [StrategyKind::Nps, StrategyKind::Index];

    pub fn strategy(self) -> &'static InvestmentStrategy {
        &REGISTRY[self as usize]
    }
}

impl FromStr for StrategyKind {
    type Err = RoundupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nps" => Ok(StrategyKind::Nps),
            "index" => Ok(StrategyKind::Index),
            _ => Err(RoundupError::UnknownStrategy {
                name: s.to_string(),
                available: available_names(),
            }),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().name)
    }
}

impl InvestmentStrategy {
    /// Marginal tax saved by investing `contribution` out of `annual_income`.
    /// Zero for vehicles without a deduction.
    pub fn tax_benefit(
        &self,
        calculator: &TaxCalculator<'_>,
        annual_income: Decimal,
        contribution: Decimal,
    ) -> Result<Decimal> {
        if !self.tax_deductible {
            return Ok(Decimal::ZERO);
        }
        let deduction = calculator.deductible_amount(annual_income, contribution)?;
        Ok(calculator.benefit(annual_income, deduction))
    }
}

/// Resolve a strategy by name, case-insensitively
pub fn resolve(name: &str) -> Result<&'static InvestmentStrategy> {
    name.parse::<StrategyKind>().map(StrategyKind::strategy)
}

/// Every registered strategy, in registry order
pub fn registered() -> &'static [InvestmentStrategy] {
    &REGISTRY
}

fn available_names() -> String {
    REGISTRY.iter().map(|s| s.name).collect::<Vec<_>>().join(", ")
}
