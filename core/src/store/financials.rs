use super::CompanyStore;
use crate::{
    error::AnalyticsResult,
    financials::{month_start, MonthlyFinancialRecord},
    types::STORE_DATE_FORMAT,
};
use chrono::NaiveDate;
use rusqlite::{params, types::Type, OptionalExtension, Row};

impl CompanyStore {
    // ── Financials ────────────────────────────────────────────────

    /// Insert or replace the record for the month of `r.date`; the surrogate
    /// id is kept on update.
    pub fn upsert_financial_record(&self, r: &MonthlyFinancialRecord) -> AnalyticsResult<()> {
        self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO financials (
                    date, revenue, cogs, salary_expense, other_expense
                ) VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(date) DO UPDATE SET
                    revenue        = excluded.revenue,
                    cogs           = excluded.cogs,
                    salary_expense = excluded.salary_expense,
                    other_expense  = excluded.other_expense",
                params![
                    date_key(r.date),
                    r.revenue,
                    r.cogs,
                    r.salary_expense,
                    r.other_expense
                ],
            )
        })?;
        Ok(())
    }

    pub fn delete_financial_record(&self, date: NaiveDate) -> AnalyticsResult<bool> {
        let removed = self.with_transaction(|tx| {
            tx.execute("DELETE FROM financials WHERE date = ?1", params![date_key(date)])
        })?;
        Ok(removed > 0)
    }

    pub fn get_financial_record(
        &self,
        date: NaiveDate,
    ) -> AnalyticsResult<Option<MonthlyFinancialRecord>> {
        let record = self.with_transaction(|tx| {
            tx.query_row(
                "SELECT date, revenue, cogs, salary_expense, other_expense
                 FROM financials WHERE date = ?1",
                params![date_key(date)],
                record_from_row,
            )
            .optional()
        })?;
        Ok(record)
    }

    /// All records ordered by date ascending (ISO strings sort chronologically).
    pub fn list_financial_records(&self) -> AnalyticsResult<Vec<MonthlyFinancialRecord>> {
        let records = self.with_transaction(|tx| {
            let mut stmt = tx.prepare(
                "SELECT date, revenue, cogs, salary_expense, other_expense
                 FROM financials ORDER BY date ASC",
            )?;
            let rows = stmt.query_map([], record_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })?;
        Ok(records)
    }

    pub fn financial_record_count(&self) -> AnalyticsResult<i64> {
        let count = self.with_transaction(|tx| {
            tx.query_row("SELECT COUNT(*) FROM financials", [], |row| row.get(0))
        })?;
        Ok(count)
    }
}

/// Stored key for the month containing `date`.
fn date_key(date: NaiveDate) -> String {
    month_start(date).format(STORE_DATE_FORMAT).to_string()
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<MonthlyFinancialRecord> {
    let raw: String = row.get(0)?;
    let date = NaiveDate::parse_from_str(&raw, STORE_DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;
    Ok(MonthlyFinancialRecord {
        date: month_start(date),
        revenue: row.get(1)?,
        cogs: row.get(2)?,
        salary_expense: row.get(3)?,
        other_expense: row.get(4)?,
    })
}
