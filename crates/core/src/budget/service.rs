//! Budget service for validation and line management.

use budgetline_shared::types::{BudgetId, BudgetLineId, BudgetPostId, DateRange};
use tracing::warn;

use super::error::BudgetError;
use super::types::{
    Budget, BudgetLine, BudgetLineInput, BudgetPost, BudgetState, CreateBudgetInput,
    CreateBudgetPostInput, UpdateBudgetPostInput,
};
use crate::ledger::{LedgerEntryLine, LedgerQuery};

/// Budget service for business logic.
///
/// Every write validates the resulting state before applying it; a failed
/// call leaves its target untouched.
pub struct BudgetService;

impl BudgetService {
    /// Creates a budget post.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`Self::validate_post`].
    pub fn create_post(input: CreateBudgetPostInput) -> Result<BudgetPost, BudgetError> {
        let post = BudgetPost {
            id: BudgetPostId::new(),
            name: input.name,
            account_ids: input.account_ids,
            company_id: input.company_id,
        };
        Self::validate_post(&post)?;
        Ok(post)
    }

    /// Applies a partial update to a budget post.
    ///
    /// The post is validated as it would be after the update and left
    /// untouched if that fails.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`Self::validate_post`].
    pub fn update_post(post: &mut BudgetPost, input: UpdateBudgetPostInput) -> Result<(), BudgetError> {
        let mut updated = post.clone();
        if let Some(name) = input.name {
            updated.name = name;
        }
        if let Some(account_ids) = input.account_ids {
            updated.account_ids = account_ids;
        }
        Self::validate_post(&updated)?;
        *post = updated;
        Ok(())
    }

    /// Validates a budget post.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::EmptyName` if the name is blank.
    /// Returns `BudgetError::EmptyAccounts` if the post has no account.
    pub fn validate_post(post: &BudgetPost) -> Result<(), BudgetError> {
        Self::validate_name(&post.name)?;
        if post.account_ids.is_empty() {
            warn!(post_id = %post.id, name = %post.name, "rejected budget post without accounts");
            return Err(BudgetError::EmptyAccounts);
        }
        Ok(())
    }

    /// Creates an empty draft budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::EmptyName` if the name is blank.
    pub fn create_budget(input: CreateBudgetInput) -> Result<Budget, BudgetError> {
        Self::validate_name(&input.name)?;
        Ok(Budget {
            id: BudgetId::new(),
            name: input.name,
            user_id: input.user_id,
            company_id: input.company_id,
            period: input.period,
            state: BudgetState::Draft,
            lines: Vec::new(),
        })
    }

    /// Validates a budget line against its parent budget period.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::MissingAnalyticOrPost` if neither an analytic
    /// account nor a budget post is set.
    /// Returns `BudgetError::LineStartOutsideBudget` or
    /// `BudgetError::LineEndOutsideBudget` if a line date falls outside the
    /// budget period; the start date is checked first.
    pub fn validate_line(budget_period: &DateRange, input: &BudgetLineInput) -> Result<(), BudgetError> {
        if input.analytic_account_id.is_none() && input.budget_post_id.is_none() {
            warn!("rejected budget line without post or analytic account");
            return Err(BudgetError::MissingAnalyticOrPost);
        }

        if !budget_period.contains(input.period.date_from) {
            warn!(date_from = %input.period.date_from, budget = %budget_period, "budget line starts outside budget");
            return Err(BudgetError::LineStartOutsideBudget {
                date_from: input.period.date_from,
                budget: *budget_period,
            });
        }

        if !budget_period.contains(input.period.date_to) {
            warn!(date_to = %input.period.date_to, budget = %budget_period, "budget line ends outside budget");
            return Err(BudgetError::LineEndOutsideBudget {
                date_to: input.period.date_to,
                budget: *budget_period,
            });
        }

        Ok(())
    }

    /// Validates and appends a line to a budget.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`Self::validate_line`].
    pub fn add_line(budget: &mut Budget, input: BudgetLineInput) -> Result<BudgetLineId, BudgetError> {
        Self::validate_line(&budget.period, &input)?;

        let line = BudgetLine {
            id: BudgetLineId::new(),
            budget_id: budget.id,
            analytic_account_id: input.analytic_account_id,
            budget_post_id: input.budget_post_id,
            period: input.period,
            paid_date: input.paid_date,
            planned_amount: input.planned_amount,
        };
        let id = line.id;
        budget.lines.push(line);
        Ok(id)
    }

    /// Replaces the editable fields of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::BudgetLineNotFound` if the line does not belong
    /// to the budget, or the validation errors of [`Self::validate_line`].
    pub fn update_line(
        budget: &mut Budget,
        line_id: BudgetLineId,
        input: BudgetLineInput,
    ) -> Result<(), BudgetError> {
        let period = budget.period;
        let line = budget
            .lines
            .iter_mut()
            .find(|line| line.id == line_id)
            .ok_or(BudgetError::BudgetLineNotFound(line_id))?;
        Self::validate_line(&period, &input)?;

        line.analytic_account_id = input.analytic_account_id;
        line.budget_post_id = input.budget_post_id;
        line.period = input.period;
        line.paid_date = input.paid_date;
        line.planned_amount = input.planned_amount;
        Ok(())
    }

    /// Removes a line from its budget.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::BudgetLineNotFound` if the line does not belong
    /// to the budget.
    pub fn remove_line(budget: &mut Budget, line_id: BudgetLineId) -> Result<BudgetLine, BudgetError> {
        let index = budget
            .lines
            .iter()
            .position(|line| line.id == line_id)
            .ok_or(BudgetError::BudgetLineNotFound(line_id))?;
        Ok(budget.lines.remove(index))
    }

    /// Copies a budget and its lines under fresh IDs.
    ///
    /// The copy always starts in `draft`.
    #[must_use]
    pub fn duplicate(budget: &Budget) -> Budget {
        let id = BudgetId::new();
        Budget {
            id,
            name: budget.name.clone(),
            user_id: budget.user_id,
            company_id: budget.company_id,
            period: budget.period,
            state: BudgetState::Draft,
            lines: budget
                .lines
                .iter()
                .map(|line| BudgetLine {
                    id: BudgetLineId::new(),
                    budget_id: id,
                    ..line.clone()
                })
                .collect(),
        }
    }

    /// Lists the ledger rows behind a line's practical amount.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::BudgetLineNotFound` if the line does not belong
    /// to the budget, `BudgetError::BudgetPostNotFound` if the line's post is
    /// not supplied, or the ledger's error.
    pub fn open_entries<L: LedgerQuery>(
        ledger: &L,
        budget: &Budget,
        line_id: BudgetLineId,
        post: Option<&BudgetPost>,
    ) -> Result<Vec<LedgerEntryLine>, BudgetError> {
        let line = budget
            .line(line_id)
            .ok_or(BudgetError::BudgetLineNotFound(line_id))?;
        let post = resolve_post(line, post)?;
        let query = line.amount_query(budget.company_id, post);
        Ok(ledger.entries(&query)?)
    }

    fn validate_name(name: &str) -> Result<(), BudgetError> {
        if name.trim().is_empty() {
            return Err(BudgetError::EmptyName);
        }
        Ok(())
    }
}

/// Checks that `post` is the line's budget post.
///
/// Returns `None` for lines without a post.
pub(crate) fn resolve_post<'a>(
    line: &BudgetLine,
    post: Option<&'a BudgetPost>,
) -> Result<Option<&'a BudgetPost>, BudgetError> {
    match line.budget_post_id {
        None => Ok(None),
        Some(post_id) => match post {
            Some(post) if post.id == post_id => Ok(Some(post)),
            _ => Err(BudgetError::BudgetPostNotFound(post_id)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{InMemoryLedger, MoveLine};
    use budgetline_shared::types::{AccountId, AnalyticAccountId, CompanyId, UserId};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn year_2024() -> DateRange {
        DateRange::new(date(2024, 1, 1), date(2024, 12, 31))
    }

    fn budget() -> Budget {
        BudgetService::create_budget(CreateBudgetInput {
            name: "Operations 2024".to_string(),
            user_id: UserId::new(),
            company_id: CompanyId::new(),
            period: year_2024(),
        })
        .unwrap()
    }

    fn post_input(account_ids: BTreeSet<AccountId>) -> CreateBudgetPostInput {
        CreateBudgetPostInput {
            name: "Travel".to_string(),
            account_ids,
            company_id: CompanyId::new(),
        }
    }

    fn line_input(period: DateRange) -> BudgetLineInput {
        BudgetLineInput {
            analytic_account_id: Some(AnalyticAccountId::new()),
            budget_post_id: None,
            period,
            paid_date: None,
            planned_amount: dec!(1000),
        }
    }

    #[test]
    fn test_create_post_requires_accounts() {
        let result = BudgetService::create_post(post_input(BTreeSet::new()));
        assert!(matches!(result, Err(BudgetError::EmptyAccounts)));
    }

    #[test]
    fn test_create_post_with_one_account() {
        let account = AccountId::new();
        let post = BudgetService::create_post(post_input(BTreeSet::from([account]))).unwrap();
        assert_eq!(post.name, "Travel");
        assert!(post.account_ids.contains(&account));
    }

    #[test]
    fn test_create_post_requires_name() {
        let mut input = post_input(BTreeSet::from([AccountId::new()]));
        input.name = "  ".to_string();
        assert!(matches!(
            BudgetService::create_post(input),
            Err(BudgetError::EmptyName)
        ));
    }

    #[test]
    fn test_update_post_rejects_empty_accounts_without_changes() {
        let mut post = BudgetService::create_post(post_input(BTreeSet::from([AccountId::new()]))).unwrap();
        let before = post.clone();

        let result = BudgetService::update_post(
            &mut post,
            UpdateBudgetPostInput {
                name: Some("Renamed".to_string()),
                account_ids: Some(BTreeSet::new()),
            },
        );

        assert!(matches!(result, Err(BudgetError::EmptyAccounts)));
        assert_eq!(post, before);
    }

    #[test]
    fn test_update_post_keeps_accounts_when_not_given() {
        let mut post = BudgetService::create_post(post_input(BTreeSet::from([AccountId::new()]))).unwrap();
        BudgetService::update_post(
            &mut post,
            UpdateBudgetPostInput {
                name: Some("Renamed".to_string()),
                account_ids: None,
            },
        )
        .unwrap();
        assert_eq!(post.name, "Renamed");
        assert_eq!(post.account_ids.len(), 1);
    }

    #[test]
    fn test_line_requires_post_or_analytic() {
        let mut input = line_input(year_2024());
        input.analytic_account_id = None;
        let result = BudgetService::validate_line(&year_2024(), &input);
        assert!(matches!(result, Err(BudgetError::MissingAnalyticOrPost)));
    }

    #[test]
    fn test_line_starting_before_budget_is_rejected() {
        let input = line_input(DateRange::new(date(2023, 12, 31), date(2024, 1, 31)));
        let result = BudgetService::validate_line(&year_2024(), &input);
        assert!(matches!(
            result,
            Err(BudgetError::LineStartOutsideBudget { date_from, .. }) if date_from == date(2023, 12, 31)
        ));
    }

    #[test]
    fn test_line_ending_after_budget_is_rejected() {
        let input = line_input(DateRange::new(date(2024, 12, 1), date(2025, 1, 1)));
        let result = BudgetService::validate_line(&year_2024(), &input);
        assert!(matches!(result, Err(BudgetError::LineEndOutsideBudget { .. })));
    }

    #[test]
    fn test_line_start_after_budget_end_is_a_start_error() {
        let input = line_input(DateRange::new(date(2025, 2, 1), date(2025, 3, 1)));
        let result = BudgetService::validate_line(&year_2024(), &input);
        assert!(matches!(result, Err(BudgetError::LineStartOutsideBudget { .. })));
    }

    #[test]
    fn test_add_update_remove_line() {
        let mut budget = budget();
        let line_id = BudgetService::add_line(&mut budget, line_input(year_2024())).unwrap();
        assert_eq!(budget.lines.len(), 1);
        assert_eq!(budget.lines[0].budget_id, budget.id);

        let mut changed = line_input(DateRange::new(date(2024, 6, 1), date(2024, 6, 30)));
        changed.planned_amount = dec!(250);
        BudgetService::update_line(&mut budget, line_id, changed).unwrap();
        assert_eq!(budget.line(line_id).unwrap().planned_amount, dec!(250));

        let removed = BudgetService::remove_line(&mut budget, line_id).unwrap();
        assert_eq!(removed.id, line_id);
        assert!(budget.lines.is_empty());
    }

    #[test]
    fn test_invalid_update_leaves_line_unchanged() {
        let mut budget = budget();
        let line_id = BudgetService::add_line(&mut budget, line_input(year_2024())).unwrap();
        let before = budget.line(line_id).unwrap().clone();

        let result = BudgetService::update_line(
            &mut budget,
            line_id,
            line_input(DateRange::new(date(2024, 1, 1), date(2025, 6, 30))),
        );

        assert!(matches!(result, Err(BudgetError::LineEndOutsideBudget { .. })));
        assert_eq!(budget.line(line_id).unwrap(), &before);
    }

    #[test]
    fn test_unknown_line_is_not_found() {
        let mut budget = budget();
        let missing = BudgetLineId::new();
        assert!(matches!(
            BudgetService::remove_line(&mut budget, missing),
            Err(BudgetError::BudgetLineNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn test_state_actions_set_state_unconditionally() {
        let mut budget = budget();
        assert_eq!(budget.state, BudgetState::Draft);
        budget.action_done();
        assert_eq!(budget.state, BudgetState::Done);
        budget.action_draft();
        assert_eq!(budget.state, BudgetState::Draft);
        budget.action_validate();
        assert_eq!(budget.state, BudgetState::Validate);
        budget.action_cancel();
        assert_eq!(budget.state, BudgetState::Cancel);
        budget.action_confirm();
        assert_eq!(budget.state, BudgetState::Confirm);
    }

    #[test]
    fn test_duplicate_resets_state_and_ids() {
        let mut budget = budget();
        BudgetService::add_line(&mut budget, line_input(year_2024())).unwrap();
        budget.action_validate();

        let copy = BudgetService::duplicate(&budget);

        assert_ne!(copy.id, budget.id);
        assert_eq!(copy.state, BudgetState::Draft);
        assert_eq!(copy.lines.len(), 1);
        assert_ne!(copy.lines[0].id, budget.lines[0].id);
        assert_eq!(copy.lines[0].budget_id, copy.id);
        assert_eq!(copy.lines[0].planned_amount, budget.lines[0].planned_amount);
    }

    #[test]
    fn test_open_entries_uses_post_accounts() {
        let mut budget = budget();
        let account = AccountId::new();
        let post = BudgetService::create_post(post_input(BTreeSet::from([account]))).unwrap();
        let line_id = BudgetService::add_line(
            &mut budget,
            BudgetLineInput {
                analytic_account_id: None,
                budget_post_id: Some(post.id),
                period: year_2024(),
                paid_date: None,
                planned_amount: dec!(500),
            },
        )
        .unwrap();

        let mut ledger = InMemoryLedger::new();
        ledger.post(MoveLine {
            company_id: budget.company_id,
            account_id: account,
            date: date(2024, 4, 2),
            debit: dec!(75),
            credit: dec!(0),
            label: Some("Train".to_string()),
        });

        let entries = BudgetService::open_entries(&ledger, &budget, line_id, Some(&post)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, dec!(-75));

        let missing = BudgetService::open_entries(&ledger, &budget, line_id, None);
        assert!(matches!(missing, Err(BudgetError::BudgetPostNotFound(_))));
    }
}
