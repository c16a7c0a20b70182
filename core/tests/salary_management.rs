//! Payroll views, salary simulation and the store-backed employee management flows.

use sales_analytics_core::{Company, CompanyStore, Employee};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn employee(id: i64, dept: &str, base: f64, bonus: f64, ot_hours: f64, ot_rate: f64) -> Employee {
    Employee::new(0, id, format!("Employee {id}"), dept, base, bonus, ot_hours, ot_rate).unwrap()
}

fn company_with(employees: Vec<Employee>) -> Company {
    let mut c = Company::new("Payroll Co", CompanyStore::in_memory().unwrap());
    for e in employees {
        c.add_employee(e);
    }
    c
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn total_monthly_salary_sums_compensation() {
    let c = company_with(vec![
        employee(1, "Sales", 1000.0, 0.1, 0.0, 0.0),
        employee(2, "Ops", 2000.0, 0.0, 10.0, 15.0),
    ]);

    assert!((c.total_monthly_salary() - (1100.0 + 2150.0)).abs() < 1e-9);
}

#[test]
fn department_breakdown_sorted_by_total_then_name() {
    let c = company_with(vec![
        employee(1, "Sales", 1000.0, 0.0, 0.0, 0.0),
        employee(2, "Engineering", 3000.0, 0.0, 0.0, 0.0),
        employee(3, "Admin", 500.0, 0.0, 0.0, 0.0),
        employee(4, "Admin", 500.0, 0.0, 0.0, 0.0),
    ]);

    let rows = c.department_salary_breakdown();
    let order: Vec<&str> = rows.iter().map(|r| r.department.as_str()).collect();

    // Admin and Sales both total 1000: name breaks the tie.
    assert_eq!(order, vec!["Engineering", "Admin", "Sales"]);
    assert_eq!(rows[1].total_monthly_salary, 1000.0);
}

#[test]
fn salary_increase_scales_bonus_but_not_overtime() {
    let c = company_with(vec![employee(1, "Sales", 1000.0, 0.1, 0.0, 0.0)]);

    let delta = c.simulate_salary_increase(0.10);

    // 1100 base + 110 bonus = 1210 against 1100 today.
    assert!((delta - 110.0).abs() < 1e-9, "delta was {delta}");
}

#[test]
fn salary_increase_leaves_overtime_untouched() {
    let c = company_with(vec![employee(1, "Ops", 2000.0, 0.0, 10.0, 30.0)]);

    let delta = c.simulate_salary_increase(0.05);

    assert!((delta - 100.0).abs() < 1e-9, "delta was {delta}");
}

#[test]
fn zero_increase_has_zero_delta() {
    let c = company_with(vec![
        employee(1, "Sales", 1234.5, 0.07, 3.0, 12.0),
        employee(2, "Ops", 987.0, 0.2, 0.0, 0.0),
    ]);

    assert_eq!(c.simulate_salary_increase(0.0), 0.0);
}

#[test]
fn update_salary_rewrites_store_and_reloads_memory() {
    let mut c = company_with(vec![employee(4, "Finance", 3000.0, 0.05, 1.0, 40.0)]);
    c.sync_employees_to_store().unwrap();

    let updated = c.update_employee_salary(4, 3600.0).unwrap().expect("employee exists");

    assert_eq!(updated.base_salary, 3600.0);
    assert_eq!(updated.bonus_rate, 0.05);
    assert_eq!(updated.overtime_hours, 1.0);
    assert_eq!(c.store().get_employee(4).unwrap(), Some(updated.clone()));
    assert_eq!(c.employees(), &[updated]);
}

#[test]
fn update_salary_of_unknown_employee_is_absent() {
    let mut c = company_with(vec![]);

    assert_eq!(c.update_employee_salary(77, 1000.0).unwrap(), None);
    assert_eq!(c.store().employee_count().unwrap(), 0);
}

#[test]
fn save_employee_upserts_and_reloads() {
    let mut c = company_with(vec![]);

    c.save_employee(&employee(10, "Legal", 4000.0, 0.0, 0.0, 0.0)).unwrap();
    c.save_employee(&employee(10, "Compliance", 4200.0, 0.0, 0.0, 0.0)).unwrap();

    assert_eq!(c.employees().len(), 1);
    assert_eq!(c.employees()[0].department, "Compliance");
}

#[test]
fn delete_removes_from_memory_and_store() {
    let mut c = company_with(vec![
        employee(1, "Sales", 1000.0, 0.0, 0.0, 0.0),
        employee(2, "Ops", 1000.0, 0.0, 0.0, 0.0),
    ]);
    c.sync_employees_to_store().unwrap();

    assert!(c.delete_employee(1).unwrap());

    assert_eq!(c.store().get_employee(1).unwrap(), None);
    assert!(c.employees().iter().all(|e| e.employee_id != 1));
    assert!(!c.delete_employee(1).unwrap());
}
