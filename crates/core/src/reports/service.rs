//! Report balance computation and rendering.

use std::collections::{HashMap, HashSet};

use budgetline_shared::types::ReportNodeId;
use rust_decimal::Decimal;

use super::error::ReportError;
use super::tree::FinancialReportTree;
use super::types::{DisplayDetail, ReportLine, ReportNodeKind};
use crate::ledger::AccountBalance;

/// Service for evaluating financial report trees.
pub struct ReportService;

impl ReportService {
    /// Computes the unsigned balance of `root` and of every node it depends
    /// on.
    ///
    /// Aggregate nodes sum their children, each child contributing its
    /// balance multiplied by its own sign.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::NodeNotFound` for unknown nodes (including
    /// dangling report references), `ReportError::CyclicReference` if
    /// report references loop, or `ReportError::AmountOverflow` if a sum
    /// overflows.
    pub fn compute_balances(
        tree: &FinancialReportTree,
        root: ReportNodeId,
        accounts: &[AccountBalance],
    ) -> Result<HashMap<ReportNodeId, Decimal>, ReportError> {
        let mut ctx = BalanceContext {
            tree,
            accounts,
            memo: HashMap::new(),
            visiting: HashSet::new(),
        };
        for node in tree.collect_ordered_descendants(root)? {
            ctx.balance(node.id)?;
        }
        Ok(ctx.memo)
    }

    /// Renders the report rooted at `root` as ordered lines.
    ///
    /// Every node yields one line carrying its signed balance. Accounts and
    /// account-type nodes with detail enabled are followed by one line per
    /// account with activity, ordered by account code.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::compute_balances`].
    pub fn build_lines(
        tree: &FinancialReportTree,
        root: ReportNodeId,
        accounts: &[AccountBalance],
    ) -> Result<Vec<ReportLine>, ReportError> {
        let balances = Self::compute_balances(tree, root, accounts)?;
        let mut sorted: Vec<&AccountBalance> = accounts.iter().collect();
        sorted.sort_by(|a, b| a.code.cmp(&b.code));

        let mut lines = Vec::new();
        for node in tree.collect_ordered_descendants(root)? {
            let factor = node.sign.factor();
            let balance = balances.get(&node.id).copied().unwrap_or(Decimal::ZERO);
            lines.push(ReportLine {
                node_id: node.id,
                account_id: None,
                name: node.name.clone(),
                level: node.level,
                balance: balance * factor,
                style: node.style.resolve(node.level),
            });

            let detail_level = match node.display_detail {
                DisplayDetail::None => continue,
                DisplayDetail::Flat => node.level,
                DisplayDetail::Hierarchical => node.level + 1,
            };
            for account in sorted
                .iter()
                .filter(|account| node.kind.covers(account) && !account.is_empty())
            {
                lines.push(ReportLine {
                    node_id: node.id,
                    account_id: Some(account.account_id),
                    name: format!("{} {}", account.code, account.name),
                    level: detail_level,
                    balance: account.balance * factor,
                    style: node.style.resolve(detail_level),
                });
            }
        }
        Ok(lines)
    }
}

struct BalanceContext<'a> {
    tree: &'a FinancialReportTree,
    accounts: &'a [AccountBalance],
    memo: HashMap<ReportNodeId, Decimal>,
    visiting: HashSet<ReportNodeId>,
}

impl BalanceContext<'_> {
    fn balance(&mut self, id: ReportNodeId) -> Result<Decimal, ReportError> {
        if let Some(balance) = self.memo.get(&id) {
            return Ok(*balance);
        }
        if !self.visiting.insert(id) {
            return Err(ReportError::CyclicReference(id));
        }

        let tree = self.tree;
        let node = tree.get(id).ok_or(ReportError::NodeNotFound(id))?;
        let balance = match &node.kind {
            ReportNodeKind::Accounts { .. } | ReportNodeKind::AccountType { .. } => self
                .accounts
                .iter()
                .filter(|account| node.kind.covers(account))
                .try_fold(Decimal::ZERO, |total, account| total.checked_add(account.balance))
                .ok_or(ReportError::AmountOverflow(id))?,
            ReportNodeKind::NestedReport { report_id } => self.balance(*report_id)?,
            ReportNodeKind::Aggregate => {
                let mut total = Decimal::ZERO;
                for child in tree.children(id) {
                    let contribution = self.balance(child.id)? * child.sign.factor();
                    total = total
                        .checked_add(contribution)
                        .ok_or(ReportError::AmountOverflow(id))?;
                }
                total
            }
        };

        self.visiting.remove(&id);
        self.memo.insert(id, balance);
        Ok(balance)
    }
}
