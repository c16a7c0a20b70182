//! Period KPIs over the profit table.

use crate::financials::ProfitRow;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_revenue: f64,
    pub total_profit: f64,
    /// Aggregate margin, total_profit / total_revenue. Not the mean of
    /// per-month margins.
    pub avg_profit_margin: f64,
    pub avg_salary_expense: f64,
}

pub fn compute_kpis(table: &[ProfitRow]) -> Kpis {
    let total_revenue: f64 = table.iter().map(|r| r.revenue).sum();
    let total_profit: f64 = table.iter().map(|r| r.profit).sum();
    let total_salary: f64 = table.iter().map(|r| r.salary_expense).sum();

    Kpis {
        total_revenue,
        total_profit,
        avg_profit_margin: if total_revenue != 0.0 {
            total_profit / total_revenue
        } else {
            0.0
        },
        avg_salary_expense: if table.is_empty() {
            0.0
        } else {
            total_salary / table.len() as f64
        },
    }
}
