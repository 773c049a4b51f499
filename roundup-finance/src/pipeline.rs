//! Facade over the four logical operations. Holds nothing but a borrowed
//! `Settings`, so a single instance can serve concurrent callers.

use roundup_core::{
    Expense, FilterRequest, FilterResponse, Result, ReturnsRequest, ReturnsResponse, Settings,
    StrategyKind, Transaction, ValidateRequest, ValidateResponse,
};

use crate::parser::parse_expenses;
use crate::periods::apply_periods;
use crate::returns::ReturnsEngine;
use crate::validator::validate;

#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    settings: &'a Settings,
}

impl<'a> Pipeline<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// `transactions:parse`
    pub fn parse(&self, expenses: &[Expense]) -> Result<Vec<Transaction>> {
        parse_expenses(expenses, self.settings.ceiling_multiple)
    }

    /// `transactions:validator`
    pub fn validate(&self, request: &ValidateRequest) -> ValidateResponse {
        validate(request.wage, &request.transactions)
    }

    /// `transactions:filter`: parse, validate, then apply period rules
    pub fn filter(&self, request: &FilterRequest) -> Result<FilterResponse> {
        let transactions = self.parse(&request.transactions)?;
        let validation = validate(request.wage, &transactions);
        let valid = apply_periods(&validation.valid, &request.q, &request.p, &request.k)?;

        tracing::info!(
            valid = valid.len(),
            invalid = validation.invalid.len(),
            "filtered transactions"
        );
        Ok(FilterResponse {
            valid,
            invalid: validation.invalid,
        })
    }

    /// `returns:<strategy>` for a strategy given by name
    pub fn returns(&self, strategy: &str, request: &ReturnsRequest) -> Result<ReturnsResponse> {
        let kind: StrategyKind = strategy.parse()?;
        self.returns_for(kind, request)
    }

    pub fn returns_for(&self, kind: StrategyKind, request: &ReturnsRequest) -> Result<ReturnsResponse> {
        ReturnsEngine::new(self.settings).compute(kind.strategy(), request)
    }
}
