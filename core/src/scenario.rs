//! Salary / expense / tax what-if simulation over the profit table.
//!
//! The "current" side is always taxed at BASELINE_TAX_RATE; only the
//! "adjusted" side uses the caller's rate. Losses are never taxed.

use crate::{financials::ProfitRow, types::BASELINE_TAX_RATE};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Scenario levers, in percent (5.0 means +5%, -10.0 means -10%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    pub salary_pct: f64,
    pub other_expense_pct: f64,
    pub tax_rate_pct: f64,
}

impl Default for ScenarioInput {
    fn default() -> Self {
        Self {
            salary_pct: 0.0,
            other_expense_pct: 0.0,
            tax_rate_pct: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScenarioTotals {
    pub salary_expense: f64,
    pub other_expense: f64,
    pub profit_before_tax: f64,
    pub tax: f64,
    pub profit_after_tax: f64,
}

impl ScenarioTotals {
    fn add(&mut self, p: &ScenarioTotals) {
        self.salary_expense += p.salary_expense;
        self.other_expense += p.other_expense;
        self.profit_before_tax += p.profit_before_tax;
        self.tax += p.tax;
        self.profit_after_tax += p.profit_after_tax;
    }

    fn minus(&self, other: &ScenarioTotals) -> ScenarioTotals {
        ScenarioTotals {
            salary_expense: self.salary_expense - other.salary_expense,
            other_expense: self.other_expense - other.other_expense,
            profit_before_tax: self.profit_before_tax - other.profit_before_tax,
            tax: self.tax - other.tax,
            profit_after_tax: self.profit_after_tax - other.profit_after_tax,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioPeriod {
    pub date: NaiveDate,
    pub current: ScenarioTotals,
    pub adjusted: ScenarioTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub current: ScenarioTotals,
    pub adjusted: ScenarioTotals,
    /// adjusted − current, field by field.
    pub delta: ScenarioTotals,
    pub periods: Vec<ScenarioPeriod>,
}

pub fn simulate_scenario(table: &[ProfitRow], input: ScenarioInput) -> ScenarioOutcome {
    let salary_factor = 1.0 + input.salary_pct / 100.0;
    let other_factor = 1.0 + input.other_expense_pct / 100.0;
    let tax_rate = input.tax_rate_pct / 100.0;

    let mut current = ScenarioTotals::default();
    let mut adjusted = ScenarioTotals::default();
    let periods: Vec<ScenarioPeriod> = table
        .iter()
        .map(|r| {
            let period = ScenarioPeriod {
                date: r.date,
                current: period_totals(r, r.salary_expense, r.other_expense, BASELINE_TAX_RATE),
                adjusted: period_totals(
                    r,
                    r.salary_expense * salary_factor,
                    r.other_expense * other_factor,
                    tax_rate,
                ),
            };
            current.add(&period.current);
            adjusted.add(&period.adjusted);
            period
        })
        .collect();

    ScenarioOutcome {
        delta: adjusted.minus(&current),
        current,
        adjusted,
        periods,
    }
}

fn period_totals(r: &ProfitRow, salary: f64, other: f64, tax_rate: f64) -> ScenarioTotals {
    let profit_before_tax = r.revenue - r.cogs - salary - other;
    let tax = profit_before_tax.max(0.0) * tax_rate;
    ScenarioTotals {
        salary_expense: salary,
        other_expense: other,
        profit_before_tax,
        tax,
        profit_after_tax: profit_before_tax - tax,
    }
}
