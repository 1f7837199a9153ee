//! Plain-text rendering of budget progress and report lines.

use std::collections::HashMap;
use std::fmt::Write as _;

use budgetline_core::budget::{
    AnalyticAccount, Budget, BudgetLineProgress, BudgetPost, GroupProgress,
};
use budgetline_core::reports::ReportLine;
use budgetline_shared::types::{AnalyticAccountId, BudgetPostId};
use rust_decimal::Decimal;

/// Formats a ratio as a percentage rounded to `scale` places.
///
/// Ratios too large to scale are shown as `n/a`.
#[must_use]
pub fn format_percentage(ratio: Decimal, scale: u32) -> String {
    match ratio.checked_mul(Decimal::ONE_HUNDRED) {
        Some(mut value) => {
            value.rescale(scale);
            format!("{value}%")
        }
        None => "n/a".to_string(),
    }
}

/// Renders one budget: a row per line followed by a row per post group.
#[must_use]
pub fn budget_table(
    budget: &Budget,
    progress: &[BudgetLineProgress],
    groups: &[(Option<BudgetPostId>, GroupProgress)],
    posts: &HashMap<BudgetPostId, BudgetPost>,
    analytic: &HashMap<AnalyticAccountId, &AnalyticAccount>,
    scale: u32,
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} [{}] {} ({})",
        budget.name, budget.state, budget.period, budget.company_id
    );

    for (line, row) in budget.lines.iter().zip(progress) {
        let post = line.budget_post_id.and_then(|id| posts.get(&id));
        let account = line.analytic_account_id.and_then(|id| analytic.get(&id).copied());
        let flag = if row.is_above_budget { " !" } else { "" };
        let _ = writeln!(
            out,
            "  {:<40} planned {:>12} practical {:>12} theoretical {:>12} {:>9}{flag}",
            line.display_name(budget, post, account),
            line.planned_amount,
            row.practical_amount,
            row.theoretical_amount.round_dp(2),
            format_percentage(row.percentage, scale),
        );
    }

    for (post_id, group) in groups {
        let label = post_id
            .and_then(|id| posts.get(&id))
            .map_or("(no post)", |post| post.name.as_str());
        let _ = writeln!(
            out,
            "  = {:<38} lines {:>3} practical {:>12} theoretical {:>12} {:>9}",
            label,
            group.line_count,
            group.practical_amount,
            group.theoretical_amount.round_dp(2),
            format_percentage(group.percentage, scale),
        );
    }
    out
}

/// Renders report lines indented by level.
#[must_use]
pub fn report_table(lines: &[ReportLine]) -> String {
    let mut out = String::new();
    for line in lines {
        let indent = "  ".repeat(usize::try_from(line.level).unwrap_or(0));
        let label = format!("{indent}{}", line.name);
        let _ = writeln!(out, "{label:<48} {:>14}", line.balance);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use budgetline_core::reports::ReportStyle;
    use budgetline_shared::types::ReportNodeId;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(dec!(0.5), 2), "50.00%");
        assert_eq!(format_percentage(dec!(0.12345), 1), "12.3%");
        assert_eq!(format_percentage(Decimal::ZERO, 0), "0%");
    }

    #[test]
    fn test_format_percentage_overflow() {
        assert_eq!(format_percentage(Decimal::MAX, 2), "n/a");
        assert_eq!(format_percentage(Decimal::MIN, 2), "n/a");
    }

    #[test]
    fn test_report_table_indents_by_level() {
        let lines = vec![
            ReportLine {
                node_id: ReportNodeId::new(),
                account_id: None,
                name: "Profit".to_string(),
                level: 0,
                balance: dec!(100),
                style: ReportStyle::MainTitle,
            },
            ReportLine {
                node_id: ReportNodeId::new(),
                account_id: None,
                name: "Income".to_string(),
                level: 1,
                balance: dec!(300),
                style: ReportStyle::Title,
            },
        ];
        let rendered = report_table(&lines);
        let rows: Vec<&str> = rendered.lines().collect();
        assert!(rows[0].starts_with("Profit"));
        assert!(rows[1].starts_with("  Income"));
        assert!(rows[1].trim_end().ends_with("300"));
    }
}
