//! Company aggregate root.
//!
//! The company owns its in-memory employees and financial records and a
//! handle to the relational store. The two copies are independent:
//!   - Nothing is reconciled automatically.
//!   - `sync_*_to_store` pushes every in-memory entity (upsert, in order).
//!   - `load_*_from_store` replaces the whole in-memory collection.
//!
//! All mutation goes through `&mut self`; callers that share one company
//! across sessions must serialise access themselves.

use crate::{
    config::AnalyticsConfig,
    employee::Employee,
    error::{AnalyticsError, AnalyticsResult},
    financials::{profit_table, MonthlyFinancialRecord, ProfitRow},
    ingest::{self, EmployeeRow, FinancialRow},
    store::CompanyStore,
    types::{Department, EmployeeId},
};
use serde::Serialize;
use std::{
    collections::{HashMap, HashSet},
    fmt,
    path::Path,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSalary {
    pub department: Department,
    pub total_monthly_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanySummary {
    pub name: String,
    pub employee_count: usize,
    pub total_revenue: f64,
    pub total_profit: f64,
    /// Aggregate margin over the whole profit table.
    pub profit_margin: f64,
}

impl fmt::Display for CompanySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Company: {}", self.name)?;
        writeln!(f, "Employees: {}", self.employee_count)?;
        writeln!(f, "Total Revenue (all periods): {}", format_amount(self.total_revenue))?;
        writeln!(f, "Total Profit (all periods): {}", format_amount(self.total_profit))?;
        write!(f, "Average Profit Margin: {:.2}%", self.profit_margin * 100.0)
    }
}

#[derive(Debug)]
pub struct Company {
    pub name: String,
    employees: Vec<Employee>,
    financials: Vec<MonthlyFinancialRecord>,
    store: CompanyStore,
}

impl Company {
    pub fn new(name: impl Into<String>, store: CompanyStore) -> Self {
        Self {
            name: name.into(),
            employees: Vec::new(),
            financials: Vec::new(),
            store,
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn financials(&self) -> &[MonthlyFinancialRecord] {
        &self.financials
    }

    pub fn store(&self) -> &CompanyStore {
        &self.store
    }

    // ── Ingestion ─────────────────────────────────────────────────

    /// Validate every row, then append all of them. A bad row appends nothing.
    pub fn load_employees(&mut self, rows: Vec<EmployeeRow>) -> AnalyticsResult<usize> {
        let employees = rows
            .into_iter()
            .enumerate()
            .map(|(i, row)| row.into_employee(i + 1))
            .collect::<AnalyticsResult<Vec<_>>>()?;
        let loaded = employees.len();
        self.employees.extend(employees);
        log::debug!("Loaded {loaded} employees into {}", self.name);
        Ok(loaded)
    }

    /// Validate every row, then append all of them. A second record for a
    /// calendar month already present (in the batch or in memory) is rejected.
    pub fn load_financial_records(&mut self, rows: Vec<FinancialRow>) -> AnalyticsResult<usize> {
        let mut months: HashSet<(i32, u32)> =
            self.financials.iter().map(|r| r.month_key()).collect();
        let mut records = Vec::with_capacity(rows.len());
        for (i, row) in rows.into_iter().enumerate() {
            let record = row.into_record(i + 1)?;
            if !months.insert(record.month_key()) {
                return Err(AnalyticsError::data_format(
                    i + 1,
                    "date",
                    format!("duplicate record for month {}", record.date.format("%Y-%m")),
                ));
            }
            records.push(record);
        }
        let loaded = records.len();
        self.financials.extend(records);
        log::debug!("Loaded {loaded} financial records into {}", self.name);
        Ok(loaded)
    }

    /// Append one employee to memory only.
    pub fn add_employee(&mut self, employee: Employee) {
        self.employees.push(employee);
    }

    // ── Store transfer ────────────────────────────────────────────

    pub fn sync_employees_to_store(&self) -> AnalyticsResult<usize> {
        let mut committed = Vec::with_capacity(self.employees.len());
        for e in &self.employees {
            if let Err(err) = self.store.upsert_employee(e) {
                return Err(sync_failure("employees", committed, e.employee_id.to_string(), err));
            }
            committed.push(e.employee_id.to_string());
        }
        log::info!("Synced {} employees to store", committed.len());
        Ok(committed.len())
    }

    pub fn sync_financials_to_store(&self) -> AnalyticsResult<usize> {
        let mut committed = Vec::with_capacity(self.financials.len());
        for r in &self.financials {
            let key = r.date.to_string();
            if let Err(err) = self.store.upsert_financial_record(r) {
                return Err(sync_failure("financials", committed, key, err));
            }
            committed.push(key);
        }
        log::info!("Synced {} financial records to store", committed.len());
        Ok(committed.len())
    }

    /// Replace the in-memory employees with the store's contents.
    pub fn load_employees_from_store(&mut self) -> AnalyticsResult<usize> {
        self.employees = self.store.list_employees()?;
        log::debug!("Reloaded {} employees from store", self.employees.len());
        Ok(self.employees.len())
    }

    /// Replace the in-memory financial records with the store's contents.
    pub fn load_financials_from_store(&mut self) -> AnalyticsResult<usize> {
        self.financials = self.store.list_financial_records()?;
        log::debug!("Reloaded {} financial records from store", self.financials.len());
        Ok(self.financials.len())
    }

    // ── Employee management ───────────────────────────────────────

    /// Upsert one employee, then reload memory from the store.
    pub fn save_employee(&mut self, employee: &Employee) -> AnalyticsResult<()> {
        employee.validate(0)?;
        self.store.upsert_employee(employee)?;
        self.load_employees_from_store()?;
        Ok(())
    }

    /// Replace the stored employee's base salary, keeping every other field.
    /// Returns `None` (and writes nothing) when the id is unknown to the store.
    pub fn update_employee_salary(
        &mut self,
        employee_id: EmployeeId,
        new_base_salary: f64,
    ) -> AnalyticsResult<Option<Employee>> {
        let Some(existing) = self.store.get_employee(employee_id)? else {
            log::warn!("No employee {employee_id} in store; salary not updated");
            return Ok(None);
        };
        let updated = existing.with_base_salary(new_base_salary);
        updated.validate(0)?;
        self.store.upsert_employee(&updated)?;
        self.load_employees_from_store()?;
        Ok(Some(updated))
    }

    /// Remove an employee from both the store and memory.
    pub fn delete_employee(&mut self, employee_id: EmployeeId) -> AnalyticsResult<bool> {
        let removed_from_store = self.store.delete_employee(employee_id)?;
        let before = self.employees.len();
        self.employees.retain(|e| e.employee_id != employee_id);
        Ok(removed_from_store || self.employees.len() != before)
    }

    // ── Derived views ─────────────────────────────────────────────

    pub fn total_monthly_salary(&self) -> f64 {
        self.employees.iter().map(Employee::total_monthly_compensation).sum()
    }

    /// Total compensation per department, largest first; ties by name.
    pub fn department_salary_breakdown(&self) -> Vec<DepartmentSalary> {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for e in &self.employees {
            *totals.entry(e.department.as_str()).or_insert(0.0) += e.total_monthly_compensation();
        }
        let mut rows: Vec<DepartmentSalary> = totals
            .into_iter()
            .map(|(department, total)| DepartmentSalary {
                department: department.to_string(),
                total_monthly_salary: total,
            })
            .collect();
        rows.sort_by(|a, b| {
            b.total_monthly_salary
                .total_cmp(&a.total_monthly_salary)
                .then_with(|| a.department.cmp(&b.department))
        });
        rows
    }

    /// Change in monthly payroll if every base salary is scaled by `1 + pct`.
    /// Bonus follows the new base; overtime pay is unchanged.
    pub fn simulate_salary_increase(&self, pct: f64) -> f64 {
        let current = self.total_monthly_salary();
        let projected: f64 = self
            .employees
            .iter()
            .map(|e| e.with_base_salary(e.base_salary * (1.0 + pct)).total_monthly_compensation())
            .sum();
        projected - current
    }

    pub fn monthly_profit_table(&self) -> Vec<ProfitRow> {
        profit_table(&self.financials)
    }

    pub fn summary(&self) -> CompanySummary {
        let table = self.monthly_profit_table();
        let total_revenue: f64 = table.iter().map(|r| r.revenue).sum();
        let total_profit: f64 = table.iter().map(|r| r.profit).sum();
        CompanySummary {
            name: self.name.clone(),
            employee_count: self.employees.len(),
            total_revenue,
            total_profit,
            profit_margin: if total_revenue != 0.0 {
                total_profit / total_revenue
            } else {
                0.0
            },
        }
    }
}

/// Load both CSV inputs, initialise the store, push everything into it and
/// read the store back, so memory also picks up rows saved by earlier sessions.
pub fn build_company(
    config: &AnalyticsConfig,
    financial_path: impl AsRef<Path>,
    employees_path: impl AsRef<Path>,
) -> AnalyticsResult<Company> {
    config.validate().map_err(|e| AnalyticsError::Config(e.to_string()))?;

    let financial_rows = ingest::read_financials_csv(financial_path)?;
    let employee_rows = ingest::read_employees_csv(employees_path)?;

    let store = CompanyStore::open(&config.store)?;
    let mut company = Company::new(config.company_name.clone(), store);
    company.load_employees(employee_rows)?;
    company.load_financial_records(financial_rows)?;

    log::info!("Initializing store schema");
    company.store.init_schema()?;
    company.sync_employees_to_store()?;
    company.sync_financials_to_store()?;
    company.load_employees_from_store()?;
    company.load_financials_from_store()?;
    log::info!(
        "Built {}: {} employees, {} financial records",
        company.name,
        company.employees.len(),
        company.financials.len()
    );
    Ok(company)
}

fn sync_failure(
    entity: &'static str,
    committed: Vec<String>,
    failed: String,
    source: AnalyticsError,
) -> AnalyticsError {
    log::warn!(
        "Sync of {entity} failed at {failed} after {} upserts: {source}",
        committed.len()
    );
    AnalyticsError::SyncIncomplete {
        entity,
        committed,
        failed,
        source: Box::new(source),
    }
}

/// Two decimals with thousands separators, e.g. `1,234,567.89`.
fn format_amount(value: f64) -> String {
    let rendered = format!("{:.2}", value.abs());
    let (int_part, frac_part) = rendered.split_once('.').unwrap_or((&rendered, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && rendered.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        "-"
    } else {
        ""
    };
    format!("{sign}{grouped}.{frac_part}")
}
