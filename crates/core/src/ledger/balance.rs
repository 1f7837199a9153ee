//! Per-account balance totals.

use budgetline_shared::types::{AccountId, AccountTypeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entry::Account;
use super::error::LedgerError;

/// Debit/credit totals of one account over a period.
///
/// `balance` is `debit - credit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type_id: AccountTypeId,
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
    /// Net balance.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Creates an empty balance for an account.
    #[must_use]
    pub fn new(account: &Account) -> Self {
        Self {
            account_id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type_id: account.account_type_id,
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Adds a debit amount.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AmountOverflow` if a total overflows; the
    /// balance is left unchanged.
    pub fn add_debit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        let debit = self.debit.checked_add(amount).ok_or(LedgerError::AmountOverflow)?;
        self.set_totals(debit, self.credit)
    }

    /// Adds a credit amount.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::AmountOverflow` if a total overflows; the
    /// balance is left unchanged.
    pub fn add_credit(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        let credit = self.credit.checked_add(amount).ok_or(LedgerError::AmountOverflow)?;
        self.set_totals(self.debit, credit)
    }

    fn set_totals(&mut self, debit: Decimal, credit: Decimal) -> Result<(), LedgerError> {
        self.balance = debit.checked_sub(credit).ok_or(LedgerError::AmountOverflow)?;
        self.debit = debit;
        self.credit = credit;
        Ok(())
    }

    /// Returns true if the account had no activity and carries no balance.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero() && self.balance.is_zero()
    }
}
