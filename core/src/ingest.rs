//! Typed row decoders for the two tabular inputs.
//!
//! Each column is validated and converted exactly once, here. Rows are
//! numbered from 1 (the first data row after the header); header problems
//! are reported as row 0.

use crate::{
    employee::Employee,
    error::{AnalyticsError, AnalyticsResult},
    financials::MonthlyFinancialRecord,
    types::EmployeeId,
};
use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{fs::File, io::Read, path::Path};

pub const EMPLOYEE_REQUIRED_COLUMNS: [&str; 4] = ["employee_id", "name", "department", "base_salary"];

pub const FINANCIAL_REQUIRED_COLUMNS: [&str; 5] =
    ["date", "revenue", "cogs", "salary_expense", "other_expense"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRow {
    pub employee_id: EmployeeId,
    pub name: String,
    pub department: String,
    pub base_salary: f64,
    #[serde(default)]
    pub bonus_rate: Option<f64>,
    #[serde(default)]
    pub overtime_hours: Option<f64>,
    #[serde(default)]
    pub overtime_rate: Option<f64>,
}

impl EmployeeRow {
    /// Convert into a validated entity; absent optional columns default to 0.
    pub fn into_employee(self, row: usize) -> AnalyticsResult<Employee> {
        Employee::new(
            row,
            self.employee_id,
            self.name,
            self.department,
            self.base_salary,
            self.bonus_rate.unwrap_or(0.0),
            self.overtime_hours.unwrap_or(0.0),
            self.overtime_rate.unwrap_or(0.0),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRow {
    pub date: String,
    pub revenue: f64,
    pub cogs: f64,
    pub salary_expense: f64,
    pub other_expense: f64,
    /// Accepted for compatibility with exports that carry it; always recomputed.
    #[serde(default)]
    pub profit: Option<f64>,
}

impl FinancialRow {
    pub fn into_record(self, row: usize) -> AnalyticsResult<MonthlyFinancialRecord> {
        let date = parse_date(row, &self.date)?;
        MonthlyFinancialRecord::new(
            row,
            date,
            self.revenue,
            self.cogs,
            self.salary_expense,
            self.other_expense,
        )
    }
}

/// Parse a calendar date in any of the accepted input layouts.
pub fn parse_date(row: usize, raw: &str) -> AnalyticsResult<NaiveDate> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Ok(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt.date());
        }
    }
    // Bare year-month means the first of that month.
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d") {
        return Ok(d);
    }
    Err(AnalyticsError::data_format(
        row,
        "date",
        format!("'{raw}' is not a recognised calendar date"),
    ))
}

pub fn decode_employees<R: Read>(reader: R) -> AnalyticsResult<Vec<EmployeeRow>> {
    decode_rows(reader, &EMPLOYEE_REQUIRED_COLUMNS)
}

pub fn decode_financials<R: Read>(reader: R) -> AnalyticsResult<Vec<FinancialRow>> {
    decode_rows(reader, &FINANCIAL_REQUIRED_COLUMNS)
}

pub fn read_employees_csv(path: impl AsRef<Path>) -> AnalyticsResult<Vec<EmployeeRow>> {
    let path = path.as_ref();
    let rows = decode_employees(File::open(path)?)?;
    log::debug!("Decoded {} employee rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn read_financials_csv(path: impl AsRef<Path>) -> AnalyticsResult<Vec<FinancialRow>> {
    let path = path.as_ref();
    let rows = decode_financials(File::open(path)?)?;
    log::debug!("Decoded {} financial rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn decode_rows<R: Read, T: DeserializeOwned>(
    reader: R,
    required: &[&str],
) -> AnalyticsResult<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|e| csv_error(0, None, e))?.clone();
    if let Some(missing) = required.iter().find(|c| !headers.iter().any(|h| h == **c)) {
        return Err(AnalyticsError::data_format(0, missing, "missing required column"));
    }

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<T>().enumerate() {
        let row = i + 1;
        rows.push(result.map_err(|e| csv_error(row, Some(&headers), e))?);
    }
    Ok(rows)
}

fn csv_error(row: usize, headers: Option<&csv::StringRecord>, err: csv::Error) -> AnalyticsError {
    let field = match err.kind() {
        csv::ErrorKind::Deserialize { err: de, .. } => de
            .field()
            .and_then(|idx| headers.and_then(|h| h.get(idx as usize)))
            .unwrap_or("<record>")
            .to_string(),
        _ => "<record>".to_string(),
    };
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => AnalyticsError::Io(io),
        _ => AnalyticsError::DataFormat {
            row,
            field,
            message,
        },
    }
}
