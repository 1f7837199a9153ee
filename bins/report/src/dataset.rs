//! JSON dataset the report is computed from.

use std::collections::HashMap;
use std::path::Path;

use budgetline_core::budget::{
    AnalyticAccount, Budget, BudgetLineInput, BudgetPost, BudgetService,
};
use budgetline_core::ledger::InMemoryLedger;
use budgetline_core::reports::{FinancialReportTree, NewReportNode};
use budgetline_shared::types::{AnalyticAccountId, BudgetPostId, CompanyId, DateRange};
use budgetline_shared::{AppError, AppResult};
use serde::Deserialize;
use tracing::info;

/// Everything the report binary reads: one company's ledger, budgets and
/// financial report definitions.
#[derive(Debug, Deserialize)]
pub struct Dataset {
    /// Company all figures are read for.
    pub company_id: CompanyId,
    /// Chart of accounts, journal items and analytic items.
    #[serde(flatten)]
    pub ledger: InMemoryLedger,
    /// Analytic accounts.
    #[serde(default)]
    pub analytic_accounts: Vec<AnalyticAccount>,
    /// Budget posts.
    #[serde(default)]
    pub budget_posts: Vec<BudgetPost>,
    /// Budgets with their lines.
    #[serde(default)]
    pub budgets: Vec<Budget>,
    /// Financial report nodes, in any order.
    #[serde(default)]
    pub report_nodes: Vec<NewReportNode>,
    /// Period the financial reports cover.
    #[serde(default)]
    pub report_period: Option<DateRange>,
}

impl Dataset {
    /// Reads and decodes a dataset file.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Dataset` if the file cannot be read or decoded.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| AppError::Dataset(format!("{}: {err}", path.display())))?;
        let dataset: Self = serde_json::from_str(&raw)?;
        info!(
            path = %path.display(),
            budgets = dataset.budgets.len(),
            move_lines = dataset.ledger.move_lines.len(),
            analytic_lines = dataset.ledger.analytic_lines.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Re-checks the invariants stored records must satisfy.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` for the first invalid post or line.
    pub fn validate(&self) -> AppResult<()> {
        for post in &self.budget_posts {
            BudgetService::validate_post(post)?;
        }
        for budget in &self.budgets {
            for line in &budget.lines {
                BudgetService::validate_line(&budget.period, &BudgetLineInput::from(line))?;
            }
        }
        Ok(())
    }

    /// Budget posts indexed by ID.
    #[must_use]
    pub fn posts_by_id(&self) -> HashMap<BudgetPostId, BudgetPost> {
        self.budget_posts
            .iter()
            .map(|post| (post.id, post.clone()))
            .collect()
    }

    /// Analytic accounts indexed by ID.
    #[must_use]
    pub fn analytic_by_id(&self) -> HashMap<AnalyticAccountId, &AnalyticAccount> {
        self.analytic_accounts
            .iter()
            .map(|account| (account.id, account))
            .collect()
    }

    /// Builds the financial report tree.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Validation` if node parents cannot be resolved.
    pub fn report_tree(&self) -> AppResult<FinancialReportTree> {
        Ok(FinancialReportTree::from_nodes(self.report_nodes.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetline_core::budget::BudgetState;

    const SAMPLE: &str = r#"{
        "company_id": "0190f5d2-7c1a-7000-8000-000000000001",
        "accounts": [],
        "move_lines": [],
        "budget_posts": [{
            "id": "0190f5d2-7c1a-7000-8000-000000000010",
            "name": "Travel",
            "account_ids": [],
            "company_id": "0190f5d2-7c1a-7000-8000-000000000001"
        }],
        "budgets": [{
            "id": "0190f5d2-7c1a-7000-8000-000000000020",
            "name": "FY24",
            "user_id": "0190f5d2-7c1a-7000-8000-000000000030",
            "company_id": "0190f5d2-7c1a-7000-8000-000000000001",
            "period": {"date_from": "2024-01-01", "date_to": "2024-12-31"},
            "state": "confirm"
        }]
    }"#;

    #[test]
    fn test_decode_defaults_missing_sections() {
        let dataset: Dataset = serde_json::from_str(SAMPLE).unwrap();
        assert!(dataset.ledger.analytic_lines.is_empty());
        assert!(dataset.report_nodes.is_empty());
        assert_eq!(dataset.budgets[0].state, BudgetState::Confirm);
        assert!(dataset.budgets[0].lines.is_empty());
    }

    #[test]
    fn test_validate_rejects_post_without_accounts() {
        let dataset: Dataset = serde_json::from_str(SAMPLE).unwrap();
        let err = dataset.validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Dataset::load("/nonexistent/budgetline.json").unwrap_err();
        assert_eq!(err.error_code(), "DATASET_ERROR");
    }
}
