use super::CompanyStore;
use crate::{employee::Employee, error::AnalyticsResult, types::EmployeeId};
use rusqlite::{params, OptionalExtension, Row};

const EMPLOYEE_COLUMNS: &str = "employee_id, name, department, base_salary,
                                bonus_rate, overtime_hours, overtime_rate";

impl CompanyStore {
    // ── Employees ─────────────────────────────────────────────────

    pub fn upsert_employee(&self, e: &Employee) -> AnalyticsResult<()> {
        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO employees (
                    employee_id, name, department, base_salary,
                    bonus_rate, overtime_hours, overtime_rate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(employee_id) DO UPDATE SET
                    name           = excluded.name,
                    department     = excluded.department,
                    base_salary    = excluded.base_salary,
                    bonus_rate     = excluded.bonus_rate,
                    overtime_hours = excluded.overtime_hours,
                    overtime_rate  = excluded.overtime_rate",
                params![
                    e.employee_id,
                    &e.name,
                    &e.department,
                    e.base_salary,
                    e.bonus_rate,
                    e.overtime_hours,
                    e.overtime_rate,
                ],
            )
        })?;
        Ok(())
    }

    /// Returns whether a row was removed. A missing id is not an error.
    pub fn delete_employee(&self, employee_id: EmployeeId) -> AnalyticsResult<bool> {
        let removed = self.with_transaction(|tx| {
            tx.execute(
                "DELETE FROM employees WHERE employee_id = ?1",
                params![employee_id],
            )
        })?;
        Ok(removed > 0)
    }

    pub fn get_employee(&self, employee_id: EmployeeId) -> AnalyticsResult<Option<Employee>> {
        let employee = self.with_transaction(|tx| {
            tx.query_row(
                &format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = ?1"),
                params![employee_id],
                employee_from_row,
            )
            .optional()
        })?;
        Ok(employee)
    }

    /// All employees ordered by `employee_id` ascending.
    pub fn list_employees(&self) -> AnalyticsResult<Vec<Employee>> {
        let employees = self.with_transaction(|tx| {
            let mut stmt = tx.prepare(&format!(
                "SELECT {EMPLOYEE_COLUMNS} FROM employees ORDER BY employee_id ASC"
            ))?;
            let rows = stmt.query_map([], employee_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })?;
        Ok(employees)
    }

    pub fn employee_count(&self) -> AnalyticsResult<i64> {
        let count = self.with_transaction(|tx| {
            tx.query_row("SELECT COUNT(*) FROM employees", [], |row| row.get(0))
        })?;
        Ok(count)
    }
}

fn employee_from_row(row: &Row<'_>) -> rusqlite::Result<Employee> {
    Ok(Employee {
        employee_id: row.get(0)?,
        name: row.get(1)?,
        department: row.get(2)?,
        base_salary: row.get(3)?,
        bonus_rate: row.get(4)?,
        overtime_hours: row.get(5)?,
        overtime_rate: row.get(6)?,
    })
}
