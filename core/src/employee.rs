//! Employee value type and its derived monthly pay figures.

use crate::{
    error::{AnalyticsError, AnalyticsResult},
    types::{Department, EmployeeId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub employee_id: EmployeeId,
    pub name: String,
    pub department: Department,
    /// Monthly base salary.
    pub base_salary: f64,
    /// Fraction of base paid as bonus, e.g. 0.10 for 10%.
    pub bonus_rate: f64,
    pub overtime_hours: f64,
    /// Pay per overtime hour.
    pub overtime_rate: f64,
}

impl Employee {
    /// Build a validated employee. `row` is reported in errors (0 when the
    /// value does not come from a tabular source).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        row: usize,
        employee_id: EmployeeId,
        name: impl Into<String>,
        department: impl Into<String>,
        base_salary: f64,
        bonus_rate: f64,
        overtime_hours: f64,
        overtime_rate: f64,
    ) -> AnalyticsResult<Self> {
        let employee = Self {
            employee_id,
            name: name.into(),
            department: department.into(),
            base_salary,
            bonus_rate,
            overtime_hours,
            overtime_rate,
        };
        employee.validate(row)?;
        Ok(employee)
    }

    pub fn validate(&self, row: usize) -> AnalyticsResult<()> {
        if self.employee_id <= 0 {
            return Err(AnalyticsError::data_format(
                row,
                "employee_id",
                format!("must be positive, got {}", self.employee_id),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(AnalyticsError::data_format(row, "name", "must not be empty"));
        }
        if self.department.trim().is_empty() {
            return Err(AnalyticsError::data_format(row, "department", "must not be empty"));
        }
        for (field, value) in [
            ("base_salary", self.base_salary),
            ("bonus_rate", self.bonus_rate),
            ("overtime_hours", self.overtime_hours),
            ("overtime_rate", self.overtime_rate),
        ] {
            if !value.is_finite() {
                return Err(AnalyticsError::data_format(row, field, "must be a finite number"));
            }
        }
        for (field, value) in [
            ("base_salary", self.base_salary),
            ("overtime_hours", self.overtime_hours),
            ("overtime_rate", self.overtime_rate),
        ] {
            if value < 0.0 {
                return Err(AnalyticsError::data_format(
                    row,
                    field,
                    format!("must be non-negative, got {value}"),
                ));
            }
        }
        Ok(())
    }

    pub fn monthly_bonus(&self) -> f64 {
        self.base_salary * self.bonus_rate
    }

    pub fn monthly_overtime_pay(&self) -> f64 {
        self.overtime_hours * self.overtime_rate
    }

    pub fn total_monthly_compensation(&self) -> f64 {
        self.base_salary + self.monthly_bonus() + self.monthly_overtime_pay()
    }

    /// Replacement value with a new base salary; identity and every other field kept.
    pub fn with_base_salary(&self, base_salary: f64) -> Self {
        Self {
            base_salary,
            ..self.clone()
        }
    }
}
