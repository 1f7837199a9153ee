//! Budget data types.

use std::collections::BTreeSet;

use budgetline_shared::types::{
    AccountId, AnalyticAccountId, AnalyticGroupId, BudgetId, BudgetLineId, BudgetPostId,
    CompanyId, DateRange, UserId,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::AmountQuery;

/// Lifecycle state of a budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetState {
    /// Being prepared.
    #[default]
    Draft,
    /// Cancelled.
    Cancel,
    /// Confirmed by its owner.
    Confirm,
    /// Validated.
    Validate,
    /// Closed.
    Done,
}

impl BudgetState {
    /// Returns the string representation of the state.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Cancel => "cancel",
            Self::Confirm => "confirm",
            Self::Validate => "validate",
            Self::Done => "done",
        }
    }

    /// Parses a state from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "draft" => Some(Self::Draft),
            "cancel" => Some(Self::Cancel),
            "confirm" => Some(Self::Confirm),
            "validate" => Some(Self::Validate),
            "done" => Some(Self::Done),
            _ => None,
        }
    }
}

impl std::fmt::Display for BudgetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named group of ledger accounts budgeted together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPost {
    /// Budget post ID.
    pub id: BudgetPostId,
    /// Name.
    pub name: String,
    /// Accounts covered by this post. Never empty.
    pub account_ids: BTreeSet<AccountId>,
    /// Owning company.
    pub company_id: CompanyId,
}

/// An analytic account lines can be tracked against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticAccount {
    /// Analytic account ID.
    pub id: AnalyticAccountId,
    /// Name.
    pub name: String,
    /// Analytic group, if any.
    #[serde(default)]
    pub group_id: Option<AnalyticGroupId>,
}

/// A budget with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget name.
    pub name: String,
    /// Responsible user.
    pub user_id: UserId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Budget period.
    pub period: DateRange,
    /// Lifecycle state.
    #[serde(default)]
    pub state: BudgetState,
    /// Budget lines, in entry order.
    #[serde(default)]
    pub lines: Vec<BudgetLine>,
}

impl Budget {
    /// Sets the state unconditionally.
    pub fn set_state(&mut self, state: BudgetState) {
        self.state = state;
    }

    /// Moves the budget to `confirm`.
    pub fn action_confirm(&mut self) {
        self.set_state(BudgetState::Confirm);
    }

    /// Moves the budget back to `draft`.
    pub fn action_draft(&mut self) {
        self.set_state(BudgetState::Draft);
    }

    /// Moves the budget to `validate`.
    pub fn action_validate(&mut self) {
        self.set_state(BudgetState::Validate);
    }

    /// Moves the budget to `cancel`.
    pub fn action_cancel(&mut self) {
        self.set_state(BudgetState::Cancel);
    }

    /// Moves the budget to `done`.
    pub fn action_done(&mut self) {
        self.set_state(BudgetState::Done);
    }

    /// Looks up a line by ID.
    #[must_use]
    pub fn line(&self, line_id: BudgetLineId) -> Option<&BudgetLine> {
        self.lines.iter().find(|line| line.id == line_id)
    }
}

/// A budget line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
    /// Budget line ID.
    pub id: BudgetLineId,
    /// Parent budget ID.
    pub budget_id: BudgetId,
    /// Analytic account, if tracked analytically.
    #[serde(default)]
    pub analytic_account_id: Option<AnalyticAccountId>,
    /// Budget post, if tracked on general accounts.
    #[serde(default)]
    pub budget_post_id: Option<BudgetPostId>,
    /// Line period. Lies within the budget period.
    pub period: DateRange,
    /// Date the planned amount is expected to be paid in full.
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
    /// Planned amount.
    pub planned_amount: Decimal,
}

impl BudgetLine {
    /// Builds the ledger query behind this line's practical amount.
    ///
    /// Analytic lines read analytic items, restricted to the post's accounts
    /// when a post is set. Other lines read journal items on the post's
    /// accounts.
    #[must_use]
    pub fn amount_query(&self, company_id: CompanyId, post: Option<&BudgetPost>) -> AmountQuery {
        let accounts = post.map(|p| p.account_ids.clone()).unwrap_or_default();
        match self.analytic_account_id {
            Some(analytic_account_id) => {
                AmountQuery::analytic(company_id, analytic_account_id, accounts, self.period)
            }
            None => AmountQuery::general(company_id, accounts, self.period),
        }
    }

    /// Display name: the budget name followed by the post and analytic
    /// account names, when set.
    #[must_use]
    pub fn display_name(
        &self,
        budget: &Budget,
        post: Option<&BudgetPost>,
        analytic: Option<&AnalyticAccount>,
    ) -> String {
        let mut name = budget.name.clone();
        if let Some(post) = post.filter(|_| self.budget_post_id.is_some()) {
            name.push_str(" - ");
            name.push_str(&post.name);
        }
        if let Some(analytic) = analytic.filter(|_| self.analytic_account_id.is_some()) {
            name.push_str(" - ");
            name.push_str(&analytic.name);
        }
        name
    }
}

/// Computed progress figures of one budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLineProgress {
    /// Budget line ID.
    pub line_id: BudgetLineId,
    /// Budget post of the line, if any.
    pub budget_post_id: Option<BudgetPostId>,
    /// Actual activity recorded in the line period.
    pub practical_amount: Decimal,
    /// Amount expected to date.
    pub theoretical_amount: Decimal,
    /// `practical / theoretical`, or zero when nothing is expected yet.
    pub percentage: Decimal,
    /// Whether the line is running past its expected amount.
    pub is_above_budget: bool,
}

/// Progress figures summed over a group of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GroupProgress {
    /// Number of lines in the group.
    pub line_count: usize,
    /// Sum of practical amounts.
    pub practical_amount: Decimal,
    /// Sum of theoretical amounts.
    pub theoretical_amount: Decimal,
    /// Weighted ratio `sum(practical) / sum(theoretical)`.
    pub percentage: Decimal,
    /// Above-budget flag evaluated on the sums.
    pub is_above_budget: bool,
}

/// Input for creating a budget post.
#[derive(Debug, Clone)]
pub struct CreateBudgetPostInput {
    /// Name.
    pub name: String,
    /// Accounts covered.
    pub account_ids: BTreeSet<AccountId>,
    /// Owning company.
    pub company_id: CompanyId,
}

/// Partial update of a budget post.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetPostInput {
    /// New name.
    pub name: Option<String>,
    /// Replacement account set.
    pub account_ids: Option<BTreeSet<AccountId>>,
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Budget name.
    pub name: String,
    /// Responsible user.
    pub user_id: UserId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Budget period.
    pub period: DateRange,
}

/// Input for creating or replacing a budget line.
#[derive(Debug, Clone)]
pub struct BudgetLineInput {
    /// Analytic account.
    pub analytic_account_id: Option<AnalyticAccountId>,
    /// Budget post.
    pub budget_post_id: Option<BudgetPostId>,
    /// Line period.
    pub period: DateRange,
    /// Payment date.
    pub paid_date: Option<NaiveDate>,
    /// Planned amount.
    pub planned_amount: Decimal,
}

impl From<&BudgetLine> for BudgetLineInput {
    fn from(line: &BudgetLine) -> Self {
        Self {
            analytic_account_id: line.analytic_account_id,
            budget_post_id: line.budget_post_id,
            period: line.period,
            paid_date: line.paid_date,
            planned_amount: line.planned_amount,
        }
    }
}
