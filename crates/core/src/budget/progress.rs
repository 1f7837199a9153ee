//! Budget progress computation.
//!
//! Progress figures are never stored: they are derived on every read from
//! the line, the ledger, and the evaluation date.

use std::collections::{BTreeMap, HashMap};

use budgetline_shared::types::{BudgetPostId, CompanyId};
use chrono::{NaiveDate, TimeDelta};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::BudgetError;
use super::service::resolve_post;
use super::types::{Budget, BudgetLine, BudgetLineProgress, BudgetPost, GroupProgress};
use crate::clock::Clock;
use crate::ledger::LedgerQuery;

/// Computes practical, theoretical and percentage figures for budget lines.
pub struct BudgetProgressCalculator<L> {
    ledger: L,
}

impl<L: LedgerQuery> BudgetProgressCalculator<L> {
    /// Creates a calculator reading from `ledger`.
    #[must_use]
    pub const fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// Computes the progress of one line as of `today`.
    ///
    /// `post` must be the line's budget post when it has one.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::BudgetPostNotFound` if the line's post is not
    /// supplied, or the ledger's error.
    pub fn compute(
        &self,
        company_id: CompanyId,
        line: &BudgetLine,
        post: Option<&BudgetPost>,
        today: NaiveDate,
    ) -> Result<BudgetLineProgress, BudgetError> {
        let practical_amount = self.practical_amount(company_id, line, post)?;
        let theoretical_amount = theoretical_amount(line, today);

        let progress = BudgetLineProgress {
            line_id: line.id,
            budget_post_id: line.budget_post_id,
            practical_amount,
            theoretical_amount,
            percentage: percentage(practical_amount, theoretical_amount),
            is_above_budget: is_above_budget(practical_amount, theoretical_amount),
        };
        debug!(
            line_id = %line.id,
            %today,
            practical = %progress.practical_amount,
            theoretical = %progress.theoretical_amount,
            percentage = %progress.percentage,
            above_budget = progress.is_above_budget,
            "computed budget line progress"
        );
        Ok(progress)
    }

    /// Computes the progress of every line of a budget, in line order.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::BudgetPostNotFound` if a line's post is missing
    /// from `posts`, or the ledger's error.
    pub fn compute_budget<C: Clock>(
        &self,
        budget: &Budget,
        posts: &HashMap<BudgetPostId, BudgetPost>,
        clock: &C,
    ) -> Result<Vec<BudgetLineProgress>, BudgetError> {
        let today = clock.today();
        budget
            .lines
            .iter()
            .map(|line| {
                let post = line.budget_post_id.and_then(|id| posts.get(&id));
                self.compute(budget.company_id, line, post, today)
            })
            .collect()
    }

    /// Sums the ledger activity recorded for the line in its period.
    ///
    /// No matching activity yields zero.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::BudgetPostNotFound` if the line's post is not
    /// supplied, or the ledger's error.
    pub fn practical_amount(
        &self,
        company_id: CompanyId,
        line: &BudgetLine,
        post: Option<&BudgetPost>,
    ) -> Result<Decimal, BudgetError> {
        let post = resolve_post(line, post)?;
        let query = line.amount_query(company_id, post);
        Ok(self.ledger.sum(&query)?.unwrap_or(Decimal::ZERO))
    }
}

/// Amount expected to be realised by `today`.
///
/// A paid date switches the line to all-or-nothing: nothing until the paid
/// date has passed, the full planned amount after. Otherwise the planned
/// amount is prorated linearly on elapsed time between the line bounds;
/// lines that have ended, or span zero time, expect the full amount.
#[must_use]
pub fn theoretical_amount(line: &BudgetLine, today: NaiveDate) -> Decimal {
    if let Some(paid_date) = line.paid_date {
        return if today <= paid_date {
            Decimal::ZERO
        } else {
            line.planned_amount
        };
    }

    let total = line.period.duration();
    let elapsed = today - line.period.date_from;

    if elapsed < TimeDelta::zero() {
        Decimal::ZERO
    } else if total > TimeDelta::zero() && today < line.period.date_to {
        let ratio = Decimal::from(elapsed.num_seconds()) / Decimal::from(total.num_seconds());
        line.planned_amount * ratio
    } else {
        line.planned_amount
    }
}

/// Ratio of practical to theoretical amount; zero when nothing is expected.
#[must_use]
pub fn percentage(practical: Decimal, theoretical: Decimal) -> Decimal {
    if theoretical.is_zero() {
        return Decimal::ZERO;
    }
    practical.checked_div(theoretical).unwrap_or(Decimal::ZERO)
}

/// Whether practical activity runs past the expected amount.
///
/// For a non-negative expectation that means spending more than expected;
/// for a negative (income-style) one, realising less than expected.
#[must_use]
pub fn is_above_budget(practical: Decimal, theoretical: Decimal) -> bool {
    if theoretical >= Decimal::ZERO {
        practical > theoretical
    } else {
        practical < theoretical
    }
}

/// Sums a group of line figures.
///
/// The group percentage is recomputed from the sums, which weights each line
/// by its theoretical amount.
///
/// # Errors
///
/// Returns `BudgetError::AmountOverflow` if a sum overflows.
pub fn aggregate<'a, I>(items: I) -> Result<GroupProgress, BudgetError>
where
    I: IntoIterator<Item = &'a BudgetLineProgress>,
{
    let mut group = GroupProgress::default();
    for item in items {
        group.line_count += 1;
        group.practical_amount = group
            .practical_amount
            .checked_add(item.practical_amount)
            .ok_or(BudgetError::AmountOverflow)?;
        group.theoretical_amount = group
            .theoretical_amount
            .checked_add(item.theoretical_amount)
            .ok_or(BudgetError::AmountOverflow)?;
    }
    group.percentage = percentage(group.practical_amount, group.theoretical_amount);
    group.is_above_budget = is_above_budget(group.practical_amount, group.theoretical_amount);
    Ok(group)
}

/// Groups line figures by budget post and aggregates each group.
///
/// Lines without a post are collected under `None`.
///
/// # Errors
///
/// Returns `BudgetError::AmountOverflow` if a group sum overflows.
pub fn group_by_post(
    progress: &[BudgetLineProgress],
) -> Result<BTreeMap<Option<BudgetPostId>, GroupProgress>, BudgetError> {
    let mut groups: BTreeMap<Option<BudgetPostId>, Vec<&BudgetLineProgress>> = BTreeMap::new();
    for item in progress {
        groups.entry(item.budget_post_id).or_default().push(item);
    }
    groups
        .into_iter()
        .map(|(post_id, items)| Ok((post_id, aggregate(items)?)))
        .collect()
}
