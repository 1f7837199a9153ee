//! In-memory ledger used by the report binary and tests.

use std::collections::BTreeMap;

use budgetline_shared::types::{AccountId, CompanyId, DateRange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::balance::AccountBalance;
use super::entry::{Account, AnalyticLine, LedgerEntryLine, MoveLine};
use super::error::LedgerError;
use super::query::{AmountQuery, AmountSource, LedgerQuery};

/// A ledger held entirely in memory.
///
/// Every query is scoped to the requested company; rows of other companies
/// are invisible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InMemoryLedger {
    /// Chart of accounts.
    #[serde(default)]
    pub accounts: Vec<Account>,
    /// Journal items.
    #[serde(default)]
    pub move_lines: Vec<MoveLine>,
    /// Analytic items.
    #[serde(default)]
    pub analytic_lines: Vec<AnalyticLine>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an account.
    pub fn add_account(&mut self, account: Account) {
        self.accounts.push(account);
    }

    /// Records a journal item.
    pub fn post(&mut self, line: MoveLine) {
        self.move_lines.push(line);
    }

    /// Records an analytic item.
    pub fn post_analytic(&mut self, line: AnalyticLine) {
        self.analytic_lines.push(line);
    }

    /// Per-account debit/credit totals of one company over a period.
    ///
    /// Every account of the company is returned, including those without
    /// activity. Items on accounts missing from the chart are ignored.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AmountOverflow` if an account total overflows.
    pub fn account_balances(
        &self,
        company_id: CompanyId,
        period: DateRange,
    ) -> Result<Vec<AccountBalance>, LedgerError> {
        let mut balances: BTreeMap<AccountId, AccountBalance> = self
            .accounts
            .iter()
            .filter(|account| account.company_id == company_id)
            .map(|account| (account.id, AccountBalance::new(account)))
            .collect();

        for line in self
            .move_lines
            .iter()
            .filter(|line| line.company_id == company_id && period.contains(line.date))
        {
            if let Some(balance) = balances.get_mut(&line.account_id) {
                balance.add_debit(line.debit)?;
                balance.add_credit(line.credit)?;
            }
        }

        let mut balances: Vec<AccountBalance> = balances.into_values().collect();
        balances.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(balances)
    }

    fn matching_rows(&self, query: &AmountQuery) -> Vec<LedgerEntryLine> {
        let mut rows: Vec<LedgerEntryLine> = match query.source {
            AmountSource::General => self
                .move_lines
                .iter()
                .filter(|line| {
                    line.company_id == query.company_id
                        && query.period.contains(line.date)
                        && query.accepts_general_account(Some(line.account_id))
                })
                .map(LedgerEntryLine::from)
                .collect(),
            AmountSource::Analytic {
                analytic_account_id,
            } => self
                .analytic_lines
                .iter()
                .filter(|line| {
                    line.company_id == query.company_id
                        && line.analytic_account_id == analytic_account_id
                        && query.period.contains(line.date)
                        && query.accepts_general_account(line.general_account_id)
                })
                .map(LedgerEntryLine::from)
                .collect(),
        };
        rows.sort_by_key(|row| row.date);
        rows
    }
}

impl LedgerQuery for InMemoryLedger {
    fn sum(&self, query: &AmountQuery) -> Result<Option<Decimal>, LedgerError> {
        let rows = self.matching_rows(query);
        trace!(
            company_id = %query.company_id,
            period = %query.period,
            matched = rows.len(),
            "ledger sum"
        );
        if rows.is_empty() {
            return Ok(None);
        }
        rows.iter()
            .try_fold(Decimal::ZERO, |total, row| total.checked_add(row.amount))
            .map(Some)
            .ok_or(LedgerError::AmountOverflow)
    }

    fn entries(&self, query: &AmountQuery) -> Result<Vec<LedgerEntryLine>, LedgerError> {
        Ok(self.matching_rows(query))
    }
}
