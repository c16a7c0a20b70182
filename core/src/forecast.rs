//! Linear revenue model trained on calendar and expense features.
//!
//! Features, in this order: month, year, salary_expense, other_expense.
//! The profit table is split chronologically: the leading rows train the
//! model, the trailing HOLDOUT_FRACTION (rounded up) only evaluate it.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    financials::ProfitRow,
    regression::LinearModel,
    types::HOLDOUT_FRACTION,
};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const FEATURE_NAMES: [&str; 4] = ["month", "year", "salary_expense", "other_expense"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub month: u32,
    pub year: i32,
    pub salary_expense: f64,
    pub other_expense: f64,
}

impl FeatureRow {
    pub fn from_profit_row(r: &ProfitRow) -> Self {
        Self {
            month: r.date.month(),
            year: r.date.year(),
            salary_expense: r.salary_expense,
            other_expense: r.other_expense,
        }
    }

    pub fn values(&self) -> Vec<f64> {
        vec![
            f64::from(self.month),
            f64::from(self.year),
            self.salary_expense,
            self.other_expense,
        ]
    }
}

/// A feature row as supplied by a caller, before completeness is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialFeatureRow {
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub salary_expense: Option<f64>,
    pub other_expense: Option<f64>,
}

impl PartialFeatureRow {
    /// Require every feature; `row` is 1-based and named in the error.
    pub fn complete(&self, row: usize) -> AnalyticsResult<FeatureRow> {
        let missing = |field: &str| AnalyticsError::data_format(row, field, "missing feature value");
        Ok(FeatureRow {
            month: self.month.ok_or_else(|| missing("month"))?,
            year: self.year.ok_or_else(|| missing("year"))?,
            salary_expense: self.salary_expense.ok_or_else(|| missing("salary_expense"))?,
            other_expense: self.other_expense.ok_or_else(|| missing("other_expense"))?,
        })
    }
}

impl From<FeatureRow> for PartialFeatureRow {
    fn from(f: FeatureRow) -> Self {
        Self {
            month: Some(f.month),
            year: Some(f.year),
            salary_expense: Some(f.salary_expense),
            other_expense: Some(f.other_expense),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldoutPrediction {
    pub date: NaiveDate,
    pub features: FeatureRow,
    pub actual: f64,
    pub predicted: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub model: LinearModel,
    /// Mean absolute error over the held-out rows.
    pub mae: f64,
    pub train_size: usize,
    pub holdout: Vec<HoldoutPrediction>,
}

/// Split point for a chronological train/hold-out split of `n` rows:
/// hold-out size is ceil(n × HOLDOUT_FRACTION), the rest trains.
pub fn chronological_split_point(n: usize) -> usize {
    let test = (n as f64 * HOLDOUT_FRACTION).ceil() as usize;
    n - test.min(n)
}

pub fn train_revenue_model(table: &[ProfitRow]) -> AnalyticsResult<TrainedModel> {
    let distinct: HashSet<NaiveDate> = table.iter().map(|r| r.date).collect();
    if distinct.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            available: distinct.len(),
        });
    }

    let mut rows = table.to_vec();
    rows.sort_by_key(|r| r.date);

    let split = chronological_split_point(rows.len());
    let (train, test) = rows.split_at(split);

    let x: Vec<Vec<f64>> = train
        .iter()
        .map(|r| FeatureRow::from_profit_row(r).values())
        .collect();
    let y: Vec<f64> = train.iter().map(|r| r.revenue).collect();
    let model = LinearModel::fit(&x, &y)?;

    let holdout: Vec<HoldoutPrediction> = test
        .iter()
        .map(|r| {
            let features = FeatureRow::from_profit_row(r);
            HoldoutPrediction {
                date: r.date,
                features,
                actual: r.revenue,
                predicted: model.predict(&features.values()),
            }
        })
        .collect();
    let mae = holdout
        .iter()
        .map(|h| (h.actual - h.predicted).abs())
        .sum::<f64>()
        / holdout.len() as f64;

    log::info!(
        "Trained revenue model on {} rows, held out {}: MAE {mae:.2}",
        train.len(),
        holdout.len()
    );
    Ok(TrainedModel {
        model,
        mae,
        train_size: train.len(),
        holdout,
    })
}

/// Predicted revenue for each row, in input order.
pub fn predict_revenue(
    model: &LinearModel,
    rows: &[PartialFeatureRow],
) -> AnalyticsResult<Vec<f64>> {
    if model.coefficients.len() != FEATURE_NAMES.len() {
        return Err(AnalyticsError::Config(format!(
            "model has {} coefficients, expected {}",
            model.coefficients.len(),
            FEATURE_NAMES.len()
        )));
    }
    rows.iter()
        .enumerate()
        .map(|(i, row)| row.complete(i + 1).map(|f| model.predict(&f.values())))
        .collect()
}

/// Feature rows for the `months` calendar months after `last_date`,
/// holding both expense lines flat.
pub fn future_feature_rows(
    last_date: NaiveDate,
    months: u32,
    salary_expense: f64,
    other_expense: f64,
) -> Vec<FeatureRow> {
    (1..=months)
        .filter_map(|m| last_date.checked_add_months(Months::new(m)))
        .map(|d| FeatureRow {
            month: d.month(),
            year: d.year(),
            salary_expense,
            other_expense,
        })
        .collect()
}
