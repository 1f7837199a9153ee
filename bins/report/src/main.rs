//! Budgetline report printer
//!
//! Loads a ledger dataset and prints the progress of every budget and every
//! financial report defined in it.

mod dataset;
mod render;

use anyhow::Context;
use budgetline_core::budget::{BudgetProgressCalculator, group_by_post};
use budgetline_core::clock::{Clock, FixedClock, SystemClock};
use budgetline_core::reports::ReportService;
use budgetline_shared::AppConfig;
use budgetline_shared::types::DateRange;
use chrono::Datelike;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::dataset::Dataset;

fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let dataset = Dataset::load(&config.dataset.path)?;
    dataset.validate()?;

    let today = config.report.today.unwrap_or_else(|| SystemClock.today());
    let clock = FixedClock(today);
    info!(%today, "computing budget progress");

    let posts = dataset.posts_by_id();
    let analytic = dataset.analytic_by_id();
    let calculator = BudgetProgressCalculator::new(&dataset.ledger);
    let scale = config.report.percentage_scale;

    for budget in &dataset.budgets {
        if budget.company_id != dataset.company_id {
            warn!(budget_id = %budget.id, "skipping budget of another company");
            continue;
        }
        let progress = calculator.compute_budget(budget, &posts, &clock)?;
        let groups: Vec<_> = group_by_post(&progress)?.into_iter().collect();
        print!(
            "{}",
            render::budget_table(budget, &progress, &groups, &posts, &analytic, scale)
        );
        println!();
    }

    let tree = dataset.report_tree()?;
    if tree.is_empty() {
        return Ok(());
    }
    let period = dataset
        .report_period
        .unwrap_or_else(|| DateRange::new(today.with_ordinal(1).unwrap_or(today), today));
    let balances = dataset.ledger.account_balances(dataset.company_id, period)?;
    info!(%period, accounts = balances.len(), "rendering financial reports");

    for root in tree.roots() {
        let lines = ReportService::build_lines(&tree, root.id, &balances)?;
        println!("{} ({period})", root.name);
        print!("{}", render::report_table(&lines));
        println!();
    }

    Ok(())
}
