//! Period rules: Q (fixed bonus) and P (percentage bonus) adjustments, then K
//! (horizon) membership.
//!
//! Q and P run through the same match-and-accumulate pass and differ only in
//! the bonus formula. Within a pass every bonus is computed against the
//! remanent as it stood before the pass, so the order of overlapping periods
//! does not matter. Q runs before P.

use chrono::NaiveDateTime;
use roundup_core::{
    contains, KPeriod, PPeriod, QPeriod, Result, RoundupError, Transaction,
    ValidFilteredTransaction, Window,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Add the summed bonus of every period containing a transaction's date.
/// Transactions outside every period are passed through untouched. A bonus
/// or sum outside the decimal range fails with `field`.
fn match_and_accumulate<W, F>(
    transactions: &[Transaction],
    periods: &[W],
    field: &'static str,
    bonus: F,
) -> Result<Vec<Transaction>>
where
    W: Window,
    F: Fn(&Transaction, &W) -> Option<Decimal>,
{
    if periods.is_empty() {
        return Ok(transactions.to_vec());
    }

    let overflow = || RoundupError::Overflow { field };
    transactions
        .iter()
        .map(|txn| {
            let mut matched = false;
            let mut total = Decimal::ZERO;
            for period in periods.iter().filter(|p| contains(*p, txn.date)) {
                matched = true;
                total = bonus(txn, period)
                    .and_then(|b| total.checked_add(b))
                    .ok_or_else(overflow)?;
            }
            if !matched {
                return Ok(*txn);
            }
            let remanent = txn.remanent.checked_add(total).ok_or_else(overflow)?;
            Ok(txn.with_remanent(remanent))
        })
        .collect()
}

/// Q pass: each matching period adds its `fixed` amount
pub fn apply_q_periods(transactions: &[Transaction], q: &[QPeriod]) -> Result<Vec<Transaction>> {
    match_and_accumulate(transactions, q, "q.fixed", |_, period| Some(period.fixed))
}

/// P pass: each matching period adds `extra` percent of the pre-pass remanent
pub fn apply_p_periods(transactions: &[Transaction], p: &[PPeriod]) -> Result<Vec<Transaction>> {
    match_and_accumulate(transactions, p, "p.extra", |txn, period| {
        txn.remanent
            .checked_mul(period.extra)
            .map(|scaled| scaled / dec!(100))
    })
}

/// The period sets of one request, with K windows indexed for attribution
#[derive(Debug)]
pub struct PeriodRules<'a> {
    q: &'a [QPeriod],
    p: &'a [PPeriod],
    k: &'a [KPeriod],
    /// Indexes into `k`, ordered by start; ties keep input order
    k_by_start: Vec<usize>,
}

impl<'a> PeriodRules<'a> {
    pub fn new(q: &'a [QPeriod], p: &'a [PPeriod], k: &'a [KPeriod]) -> Self {
        warn_inverted("q", q);
        warn_inverted("p", p);
        warn_inverted("k", k);

        let mut k_by_start: Vec<usize> = (0..k.len()).collect();
        k_by_start.sort_by_key(|&i| k[i].start);

        Self { q, p, k, k_by_start }
    }

    /// Q pass followed by P pass
    pub fn adjust(&self, transactions: &[Transaction]) -> Result<Vec<Transaction>> {
        let after_q = apply_q_periods(transactions, self.q)?;
        apply_p_periods(&after_q, self.p)
    }

    pub fn in_k_period(&self, at: NaiveDateTime) -> bool {
        self.k.iter().any(|k| contains(k, at))
    }

    /// Index (in input order) of the earliest-starting K period containing
    /// `at`, so overlapping windows never count a transaction twice
    pub fn attribute(&self, at: NaiveDateTime) -> Option<usize> {
        self.k_by_start
            .iter()
            .copied()
            .find(|&i| contains(&self.k[i], at))
    }

    /// Adjust and tag every valid transaction. Nothing is filtered out here.
    pub fn apply(&self, valid: &[Transaction]) -> Result<Vec<ValidFilteredTransaction>> {
        let adjusted = self.adjust(valid)?;
        let tagged: Vec<_> = adjusted
            .iter()
            .map(|txn| ValidFilteredTransaction::tagged(txn, self.in_k_period(txn.date)))
            .collect();

        tracing::debug!(
            transactions = tagged.len(),
            in_k = tagged.iter().filter(|t| t.in_k_period).count(),
            q = self.q.len(),
            p = self.p.len(),
            k = self.k.len(),
            "applied period rules"
        );
        Ok(tagged)
    }
}

/// One-shot form of [`PeriodRules::apply`]
pub fn apply_periods(
    valid: &[Transaction],
    q: &[QPeriod],
    p: &[PPeriod],
    k: &[KPeriod],
) -> Result<Vec<ValidFilteredTransaction>> {
    PeriodRules::new(q, p, k).apply(valid)
}

fn warn_inverted<W: Window>(kind: &str, periods: &[W]) {
    for (i, period) in periods.iter().enumerate() {
        if period.is_inverted() {
            tracing::warn!(
                kind,
                index = i,
                start = %period.start(),
                end = %period.end(),
                "period starts after it ends and will match nothing"
            );
        }
    }
}
