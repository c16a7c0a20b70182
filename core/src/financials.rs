//! Monthly financial records and the derived profit table row.

use crate::error::{AnalyticsError, AnalyticsResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFinancialRecord {
    /// Identity: one record per calendar month, always the first of that month.
    pub date: NaiveDate,
    pub revenue: f64,
    pub cogs: f64,
    pub salary_expense: f64,
    pub other_expense: f64,
}

impl MonthlyFinancialRecord {
    /// Build a validated record. Any day of a month is stored as the first of it.
    pub fn new(
        row: usize,
        date: NaiveDate,
        revenue: f64,
        cogs: f64,
        salary_expense: f64,
        other_expense: f64,
    ) -> AnalyticsResult<Self> {
        for (field, value) in [
            ("revenue", revenue),
            ("cogs", cogs),
            ("salary_expense", salary_expense),
            ("other_expense", other_expense),
        ] {
            if !value.is_finite() {
                return Err(AnalyticsError::data_format(row, field, "must be a finite number"));
            }
        }
        Ok(Self {
            date: month_start(date),
            revenue,
            cogs,
            salary_expense,
            other_expense,
        })
    }

    pub fn profit(&self) -> f64 {
        self.revenue - self.cogs - self.salary_expense - self.other_expense
    }

    /// Profit over revenue; 0 when there is no revenue.
    pub fn profit_margin(&self) -> f64 {
        if self.revenue != 0.0 {
            self.profit() / self.revenue
        } else {
            0.0
        }
    }

    /// (year, month) pair the uniqueness invariant is keyed on.
    pub fn month_key(&self) -> (i32, u32) {
        (self.date.year(), self.date.month())
    }
}

/// First day of the calendar month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// One row of the profit table: raw fields plus derived profit and margin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitRow {
    pub date: NaiveDate,
    pub revenue: f64,
    pub cogs: f64,
    pub salary_expense: f64,
    pub other_expense: f64,
    pub profit: f64,
    pub profit_margin: f64,
}

impl From<&MonthlyFinancialRecord> for ProfitRow {
    fn from(r: &MonthlyFinancialRecord) -> Self {
        Self {
            date: r.date,
            revenue: r.revenue,
            cogs: r.cogs,
            salary_expense: r.salary_expense,
            other_expense: r.other_expense,
            profit: r.profit(),
            profit_margin: r.profit_margin(),
        }
    }
}

/// Build the date-sorted profit table. The sort is stable, so equal dates
/// keep their input order.
pub fn profit_table<'a>(
    records: impl IntoIterator<Item = &'a MonthlyFinancialRecord>,
) -> Vec<ProfitRow> {
    let mut rows: Vec<ProfitRow> = records.into_iter().map(ProfitRow::from).collect();
    rows.sort_by_key(|r| r.date);
    rows
}
