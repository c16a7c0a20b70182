//! Sales, salary and profit analytics for a single company.
//!
//! Layers, leaves first:
//!   - `employee`, `financials`: pure value types with derived fields.
//!   - `store`: SQLite copy of both collections (per-call transactions).
//!   - `company`: the aggregate root that owns the in-memory copy.
//!   - `kpi`, `scenario`, `forecast`: pure functions over the profit table.

pub mod cache;
pub mod company;
pub mod config;
pub mod employee;
pub mod error;
pub mod financials;
pub mod forecast;
pub mod ingest;
pub mod kpi;
pub mod regression;
pub mod scenario;
pub mod store;
pub mod types;

pub use company::{build_company, Company, CompanySummary, DepartmentSalary};
pub use config::{AnalyticsConfig, StoreConfig, StoreLocation};
pub use employee::Employee;
pub use error::{AnalyticsError, AnalyticsResult};
pub use financials::{MonthlyFinancialRecord, ProfitRow};
pub use forecast::{predict_revenue, train_revenue_model, FeatureRow, PartialFeatureRow, TrainedModel};
pub use kpi::{compute_kpis, Kpis};
pub use scenario::{simulate_scenario, ScenarioInput, ScenarioOutcome};
pub use store::CompanyStore;
