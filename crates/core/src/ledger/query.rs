//! Ledger query service interface.
//!
//! Budget computations never touch storage directly: they describe the rows
//! they need as an [`AmountQuery`] and hand it to a [`LedgerQuery`]
//! implementation, which is responsible for applying the same row-level
//! company scoping it applies to every other read.

use std::collections::BTreeSet;

use budgetline_shared::types::{AccountId, AnalyticAccountId, CompanyId, DateRange};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::LedgerEntryLine;
use super::error::LedgerError;

/// Which rows an amount is summed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AmountSource {
    /// Journal items on general accounts, summed as `credit - debit`.
    General,
    /// Analytic items on one analytic account, summed on `amount`.
    Analytic {
        /// The analytic account to read.
        analytic_account_id: AnalyticAccountId,
    },
}

/// A summation request against the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountQuery {
    /// Company the caller is allowed to read.
    pub company_id: CompanyId,
    /// Row source.
    pub source: AmountSource,
    /// Account filter.
    ///
    /// For [`AmountSource::General`] only items on these accounts match, so an
    /// empty set matches nothing. For [`AmountSource::Analytic`] the set
    /// restricts the general account of each item; an empty set means no
    /// restriction.
    pub accounts: BTreeSet<AccountId>,
    /// Inclusive date range.
    pub period: DateRange,
}

impl AmountQuery {
    /// Query over general ledger items.
    #[must_use]
    pub fn general(
        company_id: CompanyId,
        accounts: BTreeSet<AccountId>,
        period: DateRange,
    ) -> Self {
        Self {
            company_id,
            source: AmountSource::General,
            accounts,
            period,
        }
    }

    /// Query over analytic items.
    #[must_use]
    pub fn analytic(
        company_id: CompanyId,
        analytic_account_id: AnalyticAccountId,
        accounts: BTreeSet<AccountId>,
        period: DateRange,
    ) -> Self {
        Self {
            company_id,
            source: AmountSource::Analytic {
                analytic_account_id,
            },
            accounts,
            period,
        }
    }

    /// Returns true if a general account passes the account filter.
    #[must_use]
    pub fn accepts_general_account(&self, account_id: Option<AccountId>) -> bool {
        match self.source {
            AmountSource::General => account_id.is_some_and(|id| self.accounts.contains(&id)),
            AmountSource::Analytic { .. } => {
                self.accounts.is_empty()
                    || account_id.is_some_and(|id| self.accounts.contains(&id))
            }
        }
    }
}

/// Read-only access to summed ledger activity.
pub trait LedgerQuery {
    /// Sums the signed amounts of the rows matching `query`.
    ///
    /// Returns `Ok(None)` when no row matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn sum(&self, query: &AmountQuery) -> Result<Option<Decimal>, LedgerError>;

    /// Lists the rows matching `query`, ordered by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn entries(&self, query: &AmountQuery) -> Result<Vec<LedgerEntryLine>, LedgerError>;
}

impl<L: LedgerQuery + ?Sized> LedgerQuery for &L {
    fn sum(&self, query: &AmountQuery) -> Result<Option<Decimal>, LedgerError> {
        (**self).sum(query)
    }

    fn entries(&self, query: &AmountQuery) -> Result<Vec<LedgerEntryLine>, LedgerError> {
        (**self).entries(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn period() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_general_query_with_no_accounts_matches_nothing() {
        let query = AmountQuery::general(CompanyId::new(), BTreeSet::new(), period());
        assert!(!query.accepts_general_account(Some(AccountId::new())));
        assert!(!query.accepts_general_account(None));
    }

    #[test]
    fn test_analytic_query_without_accounts_is_unrestricted() {
        let query = AmountQuery::analytic(
            CompanyId::new(),
            AnalyticAccountId::new(),
            BTreeSet::new(),
            period(),
        );
        assert!(query.accepts_general_account(Some(AccountId::new())));
        assert!(query.accepts_general_account(None));
    }

    #[test]
    fn test_analytic_query_with_accounts_requires_a_match() {
        let account = AccountId::new();
        let query = AmountQuery::analytic(
            CompanyId::new(),
            AnalyticAccountId::new(),
            BTreeSet::from([account]),
            period(),
        );
        assert!(query.accepts_general_account(Some(account)));
        assert!(!query.accepts_general_account(Some(AccountId::new())));
        assert!(!query.accepts_general_account(None));
    }
}
