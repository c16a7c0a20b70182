//! KPI aggregation and what-if scenario tests over the profit table.

use chrono::NaiveDate;
use sales_analytics_core::{
    compute_kpis, financials::profit_table, simulate_scenario, MonthlyFinancialRecord,
    ProfitRow, ScenarioInput,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn table(rows: &[(u32, f64, f64, f64, f64)]) -> Vec<ProfitRow> {
    let records: Vec<MonthlyFinancialRecord> = rows
        .iter()
        .map(|&(m, revenue, cogs, salary, other)| {
            let date = NaiveDate::from_ymd_opt(2024, m, 1).unwrap();
            MonthlyFinancialRecord::new(0, date, revenue, cogs, salary, other).unwrap()
        })
        .collect();
    profit_table(&records)
}

fn two_month_table() -> Vec<ProfitRow> {
    table(&[(1, 1000.0, 400.0, 200.0, 100.0), (2, 1200.0, 450.0, 200.0, 120.0)])
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ── KPIs ─────────────────────────────────────────────────────────────────────

#[test]
fn kpis_over_two_months() {
    let k = compute_kpis(&two_month_table());

    assert!(close(k.total_revenue, 2200.0));
    assert!(close(k.total_profit, 730.0));
    assert!((k.avg_profit_margin - 0.3318).abs() < 1e-4, "margin {}", k.avg_profit_margin);
    assert!(close(k.avg_salary_expense, 200.0));
}

#[test]
fn kpis_with_zero_revenue_have_zero_margin() {
    let k = compute_kpis(&table(&[(1, 0.0, 0.0, 50.0, 10.0)]));

    assert_eq!(k.total_revenue, 0.0);
    assert!(close(k.total_profit, -60.0));
    assert_eq!(k.avg_profit_margin, 0.0);
}

#[test]
fn kpis_of_empty_table_are_zero() {
    let k = compute_kpis(&[]);

    assert_eq!(k.total_revenue, 0.0);
    assert_eq!(k.avg_profit_margin, 0.0);
    assert_eq!(k.avg_salary_expense, 0.0);
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn zero_change_at_baseline_rate_matches_current_exactly() {
    let outcome = simulate_scenario(&two_month_table(), ScenarioInput::default());

    assert_eq!(outcome.adjusted, outcome.current);
    assert_eq!(outcome.delta.profit_after_tax, 0.0);
    assert_eq!(outcome.delta.tax, 0.0);
    assert_eq!(outcome.periods.len(), 2);
}

#[test]
fn current_side_always_taxed_at_twenty_percent() {
    let input = ScenarioInput {
        tax_rate_pct: 35.0,
        ..ScenarioInput::default()
    };

    let outcome = simulate_scenario(&two_month_table(), input);

    assert!(close(outcome.current.tax, 730.0 * 0.20));
    assert!(close(outcome.adjusted.tax, 730.0 * 0.35));
    assert!(close(outcome.delta.profit_after_tax, -730.0 * 0.15));
}

#[test]
fn salary_and_expense_levers_are_percentages() {
    let input = ScenarioInput {
        salary_pct: 10.0,
        other_expense_pct: -50.0,
        tax_rate_pct: 20.0,
    };

    let outcome = simulate_scenario(&two_month_table(), input);

    // Salary +40, other expense -110: profit before tax +70.
    assert!(close(outcome.adjusted.salary_expense, 440.0));
    assert!(close(outcome.adjusted.other_expense, 110.0));
    assert!(close(outcome.delta.profit_before_tax, 70.0));
    assert!(close(outcome.delta.profit_after_tax, 56.0));
}

#[test]
fn losses_are_not_taxed() {
    let loss_month = table(&[(3, 500.0, 400.0, 200.0, 100.0)]);

    let outcome = simulate_scenario(&loss_month, ScenarioInput::default());

    assert_eq!(outcome.current.tax, 0.0);
    assert!(close(outcome.current.profit_before_tax, -200.0));
    assert!(close(outcome.current.profit_after_tax, -200.0));
}

#[test]
fn tax_floor_applies_per_period() {
    // One profitable month and one loss month: the loss does not offset tax.
    let rows = table(&[(1, 1000.0, 400.0, 200.0, 100.0), (2, 300.0, 400.0, 200.0, 100.0)]);

    let outcome = simulate_scenario(&rows, ScenarioInput::default());

    assert!(close(outcome.current.tax, 60.0));
    assert!(close(outcome.periods[1].current.tax, 0.0));
}
