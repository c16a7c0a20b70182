//! Shared primitive types used across the analytics core.

/// Natural key of an employee, both in memory and in the `employees` table.
pub type EmployeeId = i64;

/// Department label as ingested. Compared byte-wise when ordering.
pub type Department = String;

/// Tax rate applied to the "current" side of every scenario.
pub const BASELINE_TAX_RATE: f64 = 0.20;

/// Fraction of the profit table held out for model evaluation.
pub const HOLDOUT_FRACTION: f64 = 0.20;

/// ISO format used for `financials.date` in the store.
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d";
