//! Tests for report balance roll-up and rendering.

use std::collections::BTreeSet;

use budgetline_shared::types::{AccountId, AccountTypeId, ReportNodeId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::error::ReportError;
use super::service::ReportService;
use super::tree::FinancialReportTree;
use super::types::{DisplayDetail, NewReportNode, ReportNodeKind, ReportSign, ReportStyle};
use crate::ledger::AccountBalance;

fn balance(code: &str, account_type_id: AccountTypeId, debit: Decimal, credit: Decimal) -> AccountBalance {
    AccountBalance {
        account_id: AccountId::new(),
        code: code.to_string(),
        name: format!("Account {code}"),
        account_type_id,
        debit,
        credit,
        balance: debit - credit,
    }
}

struct ProfitAndLoss {
    tree: FinancialReportTree,
    root: ReportNodeId,
    income: ReportNodeId,
    expenses: ReportNodeId,
    accounts: Vec<AccountBalance>,
}

/// Profit = Income (reversed) + Expenses (reversed), with income read by
/// account type and expenses by explicit accounts.
fn profit_and_loss(detail: DisplayDetail) -> ProfitAndLoss {
    let income_type = AccountTypeId::new();
    let expense_type = AccountTypeId::new();
    let accounts = vec![
        balance("4000", income_type, dec!(0), dec!(5000)),
        balance("4100", income_type, dec!(100), dec!(600)),
        balance("6100", expense_type, dec!(1200), dec!(0)),
        balance("6200", expense_type, dec!(800), dec!(0)),
        balance("6300", expense_type, dec!(0), dec!(0)),
    ];

    let mut tree = FinancialReportTree::new();
    let root = tree
        .insert(NewReportNode::new("Profit", ReportNodeKind::Aggregate))
        .unwrap();

    let mut income = NewReportNode::new(
        "Income",
        ReportNodeKind::AccountType {
            account_type_ids: BTreeSet::from([income_type]),
        },
    )
    .under(root, 1);
    income.sign = ReportSign::Reverse;
    income.display_detail = detail;
    let income = tree.insert(income).unwrap();

    let mut expenses = NewReportNode::new(
        "Expenses",
        ReportNodeKind::Accounts {
            account_ids: accounts[2..].iter().map(|a| a.account_id).collect(),
        },
    )
    .under(root, 2);
    expenses.sign = ReportSign::Reverse;
    expenses.display_detail = detail;
    let expenses = tree.insert(expenses).unwrap();

    ProfitAndLoss {
        tree,
        root,
        income,
        expenses,
        accounts,
    }
}

#[test]
fn test_balances_roll_up_with_child_signs() {
    let report = profit_and_loss(DisplayDetail::None);

    let balances = ReportService::compute_balances(&report.tree, report.root, &report.accounts).unwrap();

    assert_eq!(balances[&report.income], dec!(-5500));
    assert_eq!(balances[&report.expenses], dec!(2000));
    assert_eq!(balances[&report.root], dec!(3500));
}

#[test]
fn test_lines_without_detail() {
    let report = profit_and_loss(DisplayDetail::None);

    let lines = ReportService::build_lines(&report.tree, report.root, &report.accounts).unwrap();

    let summary: Vec<(&str, u32, Decimal)> = lines
        .iter()
        .map(|line| (line.name.as_str(), line.level, line.balance))
        .collect();
    assert_eq!(
        summary,
        [
            ("Profit", 0, dec!(3500)),
            ("Income", 1, dec!(5500)),
            ("Expenses", 1, dec!(-2000)),
        ]
    );
    assert_eq!(lines[0].style, ReportStyle::MainTitle);
    assert_eq!(lines[1].style, ReportStyle::Title);
}

#[test]
fn test_flat_detail_lists_active_accounts_at_node_level() {
    let report = profit_and_loss(DisplayDetail::Flat);

    let lines = ReportService::build_lines(&report.tree, report.root, &report.accounts).unwrap();

    let names: Vec<&str> = lines.iter().map(|line| line.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "Profit",
            "Income",
            "4000 Account 4000",
            "4100 Account 4100",
            "Expenses",
            "6100 Account 6100",
            "6200 Account 6200",
        ]
    );
    assert_eq!(lines[2].level, 1);
    assert_eq!(lines[2].balance, dec!(5000));
    assert_eq!(lines[5].balance, dec!(-1200));
    assert!(lines[5].account_id.is_some());
}

#[test]
fn test_hierarchical_detail_nests_accounts() {
    let report = profit_and_loss(DisplayDetail::Hierarchical);

    let lines = ReportService::build_lines(&report.tree, report.root, &report.accounts).unwrap();

    assert_eq!(lines[2].level, 2);
    assert_eq!(lines[2].style, ReportStyle::Subtitle);
}

#[test]
fn test_nested_report_reuses_referenced_balance() {
    let mut report = profit_and_loss(DisplayDetail::None);
    let summary = report
        .tree
        .insert(NewReportNode::new(
            "Net result",
            ReportNodeKind::NestedReport {
                report_id: report.root,
            },
        ))
        .unwrap();

    let balances = ReportService::compute_balances(&report.tree, summary, &report.accounts).unwrap();

    assert_eq!(balances[&summary], dec!(3500));
}

#[test]
fn test_nested_report_loop_is_rejected() {
    let mut report = profit_and_loss(DisplayDetail::None);
    report
        .tree
        .insert(
            NewReportNode::new(
                "Loop",
                ReportNodeKind::NestedReport {
                    report_id: report.root,
                },
            )
            .under(report.root, 3),
        )
        .unwrap();

    let result = ReportService::compute_balances(&report.tree, report.root, &report.accounts);

    assert!(matches!(result, Err(ReportError::CyclicReference(_))));
}

#[test]
fn test_dangling_reference_is_not_found() {
    let mut tree = FinancialReportTree::new();
    let root = tree
        .insert(NewReportNode::new(
            "Dangling",
            ReportNodeKind::NestedReport {
                report_id: ReportNodeId::new(),
            },
        ))
        .unwrap();

    let result = ReportService::compute_balances(&tree, root, &[]);

    assert!(matches!(result, Err(ReportError::NodeNotFound(_))));
}

#[test]
fn test_overflowing_balance_is_an_error() {
    let asset_type = AccountTypeId::new();
    let accounts = vec![
        balance("1000", asset_type, Decimal::MAX, dec!(0)),
        balance("1100", asset_type, Decimal::MAX, dec!(0)),
    ];
    let mut tree = FinancialReportTree::new();
    let root = tree
        .insert(NewReportNode::new(
            "Assets",
            ReportNodeKind::AccountType {
                account_type_ids: BTreeSet::from([asset_type]),
            },
        ))
        .unwrap();

    let result = ReportService::build_lines(&tree, root, &accounts);

    assert!(matches!(result, Err(ReportError::AmountOverflow(id)) if id == root));
}

proptest! {
    /// An aggregate of preserved-sign account nodes equals the sum of all
    /// account balances, whatever the split.
    #[test]
    fn test_aggregate_equals_sum_of_parts(
        amounts in prop::collection::vec((0i64..1_000_000, 0i64..1_000_000), 1..12),
        split in 0usize..12,
    ) {
        let account_type = AccountTypeId::new();
        let accounts: Vec<AccountBalance> = amounts
            .iter()
            .enumerate()
            .map(|(i, &(debit, credit))| {
                balance(&format!("{:04}", i), account_type, Decimal::from(debit), Decimal::from(credit))
            })
            .collect();
        let split = split.min(accounts.len());

        let mut tree = FinancialReportTree::new();
        let root = tree.insert(NewReportNode::new("Total", ReportNodeKind::Aggregate)).unwrap();
        for (sequence, part) in [&accounts[..split], &accounts[split..]].into_iter().enumerate() {
            let kind = ReportNodeKind::Accounts {
                account_ids: part.iter().map(|a| a.account_id).collect(),
            };
            tree.insert(NewReportNode::new("Part", kind).under(root, sequence as i32)).unwrap();
        }

        let balances = ReportService::compute_balances(&tree, root, &accounts).unwrap();
        let expected: Decimal = accounts.iter().map(|a| a.balance).sum();

        prop_assert_eq!(balances[&root], expected);
    }
}
