//! Ledger and analytic entry rows.

use budgetline_shared::types::{AccountId, AccountTypeId, AnalyticAccountId, CompanyId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Account code (e.g., "6100").
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type_id: AccountTypeId,
    /// Owning company.
    pub company_id: CompanyId,
}

/// A journal item posted on a general ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLine {
    /// Owning company.
    pub company_id: CompanyId,
    /// Account the item is posted on.
    pub account_id: AccountId,
    /// Accounting date.
    pub date: NaiveDate,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Optional label.
    #[serde(default)]
    pub label: Option<String>,
}

impl MoveLine {
    /// Returns `credit - debit`.
    #[must_use]
    pub fn credit_minus_debit(&self) -> Decimal {
        self.credit - self.debit
    }
}

/// A cost/revenue item recorded on an analytic account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticLine {
    /// Owning company.
    pub company_id: CompanyId,
    /// Analytic account the item is recorded on.
    pub analytic_account_id: AnalyticAccountId,
    /// General account of the originating journal item, if any.
    #[serde(default)]
    pub general_account_id: Option<AccountId>,
    /// Date of the item.
    pub date: NaiveDate,
    /// Signed amount (negative for costs).
    pub amount: Decimal,
    /// Optional label.
    #[serde(default)]
    pub label: Option<String>,
}

/// A row returned when drilling into the entries behind an amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntryLine {
    /// Entry date.
    pub date: NaiveDate,
    /// General account, when known.
    pub account_id: Option<AccountId>,
    /// Analytic account, for analytic rows.
    pub analytic_account_id: Option<AnalyticAccountId>,
    /// Signed amount as it contributes to the summed total.
    pub amount: Decimal,
    /// Optional label.
    pub label: Option<String>,
}

impl From<&MoveLine> for LedgerEntryLine {
    fn from(line: &MoveLine) -> Self {
        Self {
            date: line.date,
            account_id: Some(line.account_id),
            analytic_account_id: None,
            amount: line.credit_minus_debit(),
            label: line.label.clone(),
        }
    }
}

impl From<&AnalyticLine> for LedgerEntryLine {
    fn from(line: &AnalyticLine) -> Self {
        Self {
            date: line.date,
            account_id: line.general_account_id,
            analytic_account_id: Some(line.analytic_account_id),
            amount: line.amount,
            label: line.label.clone(),
        }
    }
}
