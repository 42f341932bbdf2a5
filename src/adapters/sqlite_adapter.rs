//! SQLite calculation store.
//!
//! Tables:
//! - `calculations`: one row per saved projection, every raw input as text
//!   plus the projection settings and final balance.
//! - `calculation_periods`: the projected periods of each calculation.
//! - `scenarios`: saved balance-impact estimates.

use crate::domain::error::BudgetError;
use crate::domain::impact::{EventEffect, OneTimeEvent};
use crate::domain::inputs::{FinancialInputs, INPUT_FIELDS};
use crate::domain::projection::{PeriodRecord, ProjectionConfig};
use crate::domain::record::{
    CalculationSnapshot, SavedScenario, ScenarioDraft, StoredCalculation,
};
use crate::domain::term::Term;
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::CalculationStore;
use chrono::NaiveDateTime;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::{ToSql, Type};
use rusqlite::{Connection, OptionalExtension, Row, params};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Columns of `calculations` ahead of the input columns, in select order.
const CALCULATION_COLUMNS: &str = "id, user_id, created_at, apply_tax, tax_rate, \
     apply_inflation, inflation_rate, projected_balance";
const FIRST_INPUT_COLUMN: usize = 8;

const PERIOD_COLUMNS: &str = "position, semester, term, year, label, is_summer, tuition, \
     costs, work_income, aid, starting_savings, total_income, available_funds, balance, \
     is_surplus, deficit, work_hours_per_week";

const SCENARIO_COLUMNS: &str = "id, user_id, created_at, name, monthly_income_change, \
     monthly_expense_change, event_name, event_amount, event_effect, event_period, \
     projected_balance";

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

fn pool_err(e: r2d2::Error) -> BudgetError {
    BudgetError::Database {
        reason: e.to_string(),
    }
}

fn query_err(e: rusqlite::Error) -> BudgetError {
    BudgetError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn conversion_err(idx: usize, ty: Type, reason: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, reason.into())
}

/// Input column names, quoted: `grant` and friends are not safe bare.
fn input_columns() -> String {
    INPUT_FIELDS
        .iter()
        .map(|f| format!("\"{f}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BudgetError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| BudgetError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4).clamp(1, 64) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(pool_err)?;

        log::info!("opened sqlite store at {db_path} (pool size {pool_size})");
        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, BudgetError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(pool_err)?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, BudgetError> {
        self.pool.get().map_err(pool_err)
    }

    pub fn initialize_schema(&self) -> Result<(), BudgetError> {
        let conn = self.conn()?;

        let inputs = INPUT_FIELDS
            .iter()
            .map(|f| format!("\"{f}\" TEXT NOT NULL DEFAULT ''"))
            .collect::<Vec<_>>()
            .join(",\n                ");

        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS calculations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                apply_tax INTEGER NOT NULL,
                tax_rate REAL NOT NULL,
                apply_inflation INTEGER NOT NULL,
                inflation_rate REAL NOT NULL,
                projected_balance REAL NOT NULL,
                {inputs}
            );
            CREATE INDEX IF NOT EXISTS idx_calculations_user ON calculations(user_id, created_at);
            CREATE TABLE IF NOT EXISTS calculation_periods (
                calculation_id INTEGER NOT NULL REFERENCES calculations(id),
                position INTEGER NOT NULL,
                semester INTEGER NOT NULL,
                term TEXT NOT NULL,
                year INTEGER NOT NULL,
                label TEXT NOT NULL,
                is_summer INTEGER NOT NULL,
                tuition REAL NOT NULL,
                costs REAL NOT NULL,
                work_income REAL NOT NULL,
                aid REAL NOT NULL,
                starting_savings REAL NOT NULL,
                total_income REAL NOT NULL,
                available_funds REAL NOT NULL,
                balance REAL NOT NULL,
                is_surplus INTEGER NOT NULL,
                deficit REAL NOT NULL,
                work_hours_per_week INTEGER NOT NULL,
                PRIMARY KEY (calculation_id, position)
            );
            CREATE TABLE IF NOT EXISTS scenarios (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                name TEXT NOT NULL,
                monthly_income_change REAL NOT NULL,
                monthly_expense_change REAL NOT NULL,
                event_name TEXT,
                event_amount REAL,
                event_effect TEXT,
                event_period TEXT,
                projected_balance REAL NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_scenarios_user ON scenarios(user_id, created_at);"
        ))
        .map_err(query_err)?;

        Ok(())
    }
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|e| conversion_err(idx, Type::Text, format!("bad timestamp '{raw}': {e}")))
}

fn calculation_from_row(row: &Row<'_>) -> rusqlite::Result<StoredCalculation> {
    let created_raw: String = row.get(2)?;
    let mut inputs = FinancialInputs::default();
    for (offset, name) in INPUT_FIELDS.iter().enumerate() {
        if let Some(slot) = inputs.field_mut(name) {
            *slot = row.get(FIRST_INPUT_COLUMN + offset)?;
        }
    }

    Ok(StoredCalculation {
        id: row.get(0)?,
        created_at: parse_timestamp(2, &created_raw)?,
        snapshot: CalculationSnapshot {
            user_id: row.get(1)?,
            inputs,
            config: ProjectionConfig {
                apply_tax: row.get(3)?,
                tax_rate: row.get(4)?,
                apply_inflation: row.get(5)?,
                inflation_rate: row.get(6)?,
            },
            periods: Vec::new(),
            projected_balance: row.get(7)?,
        },
    })
}

fn period_from_row(row: &Row<'_>) -> rusqlite::Result<PeriodRecord> {
    let position: i64 = row.get(0)?;
    let term_name: String = row.get(2)?;
    let term = Term::parse(&term_name)
        .ok_or_else(|| conversion_err(2, Type::Text, format!("unknown term '{term_name}'")))?;

    Ok(PeriodRecord {
        position: usize::try_from(position)
            .map_err(|e| conversion_err(0, Type::Integer, e.to_string()))?,
        semester: row.get(1)?,
        term,
        year: row.get(3)?,
        label: row.get(4)?,
        is_summer: row.get(5)?,
        tuition: row.get(6)?,
        costs: row.get(7)?,
        work_income: row.get(8)?,
        aid: row.get(9)?,
        starting_savings: row.get(10)?,
        total_income: row.get(11)?,
        available_funds: row.get(12)?,
        balance: row.get(13)?,
        is_surplus: row.get(14)?,
        deficit: row.get(15)?,
        work_hours_per_week: row.get(16)?,
    })
}

fn scenario_from_row(row: &Row<'_>) -> rusqlite::Result<SavedScenario> {
    let created_raw: String = row.get(2)?;
    let event_name: Option<String> = row.get(6)?;
    let event = match event_name {
        None => None,
        Some(name) => {
            let effect_raw: String = row.get(8)?;
            let effect = effect_raw
                .parse::<EventEffect>()
                .map_err(|e| conversion_err(8, Type::Text, e.to_string()))?;
            Some(OneTimeEvent {
                name,
                amount: row.get::<_, Option<f64>>(7)?.unwrap_or(0.0),
                effect,
                period: row.get::<_, Option<String>>(9)?.unwrap_or_default(),
            })
        }
    };

    Ok(SavedScenario {
        id: row.get(0)?,
        created_at: parse_timestamp(2, &created_raw)?,
        draft: ScenarioDraft {
            user_id: row.get(1)?,
            name: row.get(3)?,
            monthly_income_change: row.get(4)?,
            monthly_expense_change: row.get(5)?,
            event,
            projected_balance: row.get(10)?,
        },
    })
}

fn load_periods(conn: &Connection, calculation_id: i64) -> Result<Vec<PeriodRecord>, BudgetError> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PERIOD_COLUMNS} FROM calculation_periods
             WHERE calculation_id = ?1 ORDER BY position ASC"
        ))
        .map_err(query_err)?;

    let rows = stmt
        .query_map(params![calculation_id], period_from_row)
        .map_err(query_err)?;

    let mut periods = Vec::new();
    for row in rows {
        periods.push(row.map_err(query_err)?);
    }
    Ok(periods)
}

/// Event columns as nullable values.
fn event_columns(
    event: Option<&OneTimeEvent>,
) -> (Option<&str>, Option<f64>, Option<&'static str>, Option<&str>) {
    match event {
        Some(e) => (
            Some(e.name.as_str()),
            Some(e.amount),
            Some(e.effect.as_str()),
            Some(e.period.as_str()),
        ),
        None => (None, None, None, None),
    }
}

impl CalculationStore for SqliteAdapter {
    fn save_calculation(
        &self,
        snapshot: &CalculationSnapshot,
        created_at: NaiveDateTime,
    ) -> Result<i64, BudgetError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        let created = created_at.format(TIMESTAMP_FORMAT).to_string();
        let placeholders = (1..=FIRST_INPUT_COLUMN - 1 + INPUT_FIELDS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO calculations (user_id, created_at, apply_tax, tax_rate, apply_inflation,
                 inflation_rate, projected_balance, {})
             VALUES ({placeholders})",
            input_columns()
        );

        let config = &snapshot.config;
        let input_values: Vec<&str> = INPUT_FIELDS
            .iter()
            .map(|name| snapshot.inputs.field(name).unwrap_or(""))
            .collect();
        let mut values: Vec<&dyn ToSql> = vec![
            &snapshot.user_id,
            &created,
            &config.apply_tax,
            &config.tax_rate,
            &config.apply_inflation,
            &config.inflation_rate,
            &snapshot.projected_balance,
        ];
        for value in &input_values {
            values.push(value);
        }
        tx.execute(&sql, values.as_slice()).map_err(query_err)?;
        let id = tx.last_insert_rowid();

        for p in &snapshot.periods {
            let position = i64::try_from(p.position).unwrap_or(i64::MAX);
            tx.execute(
                &format!(
                    "INSERT INTO calculation_periods (calculation_id, {PERIOD_COLUMNS})
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)"
                ),
                params![
                    id,
                    position,
                    p.semester,
                    p.term.name(),
                    p.year,
                    p.label,
                    p.is_summer,
                    p.tuition,
                    p.costs,
                    p.work_income,
                    p.aid,
                    p.starting_savings,
                    p.total_income,
                    p.available_funds,
                    p.balance,
                    p.is_surplus,
                    p.deficit,
                    p.work_hours_per_week
                ],
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        log::debug!(
            "saved calculation {id} for {} ({} periods)",
            snapshot.user_id,
            snapshot.periods.len()
        );
        Ok(id)
    }

    fn user_calculations(&self, user_id: &str) -> Result<Vec<StoredCalculation>, BudgetError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {CALCULATION_COLUMNS}, {} FROM calculations
                 WHERE user_id = ?1 ORDER BY created_at DESC, id DESC",
                input_columns()
            ))
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id], calculation_from_row)
            .map_err(query_err)?;

        let mut calculations = Vec::new();
        for row in rows {
            calculations.push(row.map_err(query_err)?);
        }

        for calc in &mut calculations {
            calc.snapshot.periods = load_periods(&conn, calc.id)?;
        }

        Ok(calculations)
    }

    fn latest_calculation(&self, user_id: &str) -> Result<Option<StoredCalculation>, BudgetError> {
        let conn = self.conn()?;

        let latest = conn
            .query_row(
                &format!(
                    "SELECT {CALCULATION_COLUMNS}, {} FROM calculations
                     WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 1",
                    input_columns()
                ),
                params![user_id],
                calculation_from_row,
            )
            .optional()
            .map_err(query_err)?;

        match latest {
            Some(mut calc) => {
                calc.snapshot.periods = load_periods(&conn, calc.id)?;
                Ok(Some(calc))
            }
            None => Ok(None),
        }
    }

    fn delete_calculation(&self, id: i64) -> Result<bool, BudgetError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(query_err)?;

        tx.execute(
            "DELETE FROM calculation_periods WHERE calculation_id = ?1",
            params![id],
        )
        .map_err(query_err)?;
        let removed = tx
            .execute("DELETE FROM calculations WHERE id = ?1", params![id])
            .map_err(query_err)?;

        tx.commit().map_err(query_err)?;
        log::debug!("delete calculation {id}: {removed} row(s)");
        Ok(removed > 0)
    }

    fn save_scenario(
        &self,
        draft: &ScenarioDraft,
        created_at: NaiveDateTime,
    ) -> Result<i64, BudgetError> {
        let conn = self.conn()?;
        let (event_name, event_amount, event_effect, event_period) =
            event_columns(draft.event.as_ref());

        conn.execute(
            "INSERT INTO scenarios (user_id, created_at, name, monthly_income_change,
                 monthly_expense_change, event_name, event_amount, event_effect, event_period,
                 projected_balance)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                draft.user_id,
                created_at.format(TIMESTAMP_FORMAT).to_string(),
                draft.name,
                draft.monthly_income_change,
                draft.monthly_expense_change,
                event_name,
                event_amount,
                event_effect,
                event_period,
                draft.projected_balance
            ],
        )
        .map_err(query_err)?;

        let id = conn.last_insert_rowid();
        log::debug!("saved scenario {id} '{}' for {}", draft.name, draft.user_id);
        Ok(id)
    }

    fn user_scenarios(&self, user_id: &str) -> Result<Vec<SavedScenario>, BudgetError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {SCENARIO_COLUMNS} FROM scenarios
                 WHERE user_id = ?1 ORDER BY created_at DESC, id DESC"
            ))
            .map_err(query_err)?;

        let rows = stmt
            .query_map(params![user_id], scenario_from_row)
            .map_err(query_err)?;

        let mut scenarios = Vec::new();
        for row in rows {
            scenarios.push(row.map_err(query_err)?);
        }
        Ok(scenarios)
    }

    fn update_scenario(&self, id: i64, draft: &ScenarioDraft) -> Result<bool, BudgetError> {
        let conn = self.conn()?;
        let (event_name, event_amount, event_effect, event_period) =
            event_columns(draft.event.as_ref());

        let changed = conn
            .execute(
                "UPDATE scenarios SET name = ?2, monthly_income_change = ?3,
                     monthly_expense_change = ?4, event_name = ?5, event_amount = ?6,
                     event_effect = ?7, event_period = ?8, projected_balance = ?9
                 WHERE id = ?1",
                params![
                    id,
                    draft.name,
                    draft.monthly_income_change,
                    draft.monthly_expense_change,
                    event_name,
                    event_amount,
                    event_effect,
                    event_period,
                    draft.projected_balance
                ],
            )
            .map_err(query_err)?;

        Ok(changed > 0)
    }

    fn delete_scenario(&self, id: i64) -> Result<bool, BudgetError> {
        let conn = self.conn()?;
        let removed = conn
            .execute("DELETE FROM scenarios WHERE id = ?1", params![id])
            .map_err(query_err)?;
        log::debug!("delete scenario {id}: {removed} row(s)");
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::projection::compute_sequence;
    use chrono::NaiveDate;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
        fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
            default
        }
        fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
            default
        }
    }

    fn store() -> SqliteAdapter {
        let adapter = SqliteAdapter::in_memory().unwrap();
        adapter.initialize_schema().unwrap();
        adapter
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn snapshot(user: &str, tuition: &str) -> CalculationSnapshot {
        let inputs = FinancialInputs {
            remaining_semesters: "3".into(),
            tuition: tuition.into(),
            rent: "650".into(),
            has_job: "yes".into(),
            hours_per_week_school: "8".into(),
            hours_per_week_summer: "30".into(),
            hourly_rate: "16".into(),
            grant: "400".into(),
            savings: "2500".into(),
            ..Default::default()
        };
        let config = ProjectionConfig {
            apply_tax: true,
            ..Default::default()
        };
        let today = NaiveDate::from_ymd_opt(2027, 1, 20).unwrap();
        let periods = compute_sequence(&inputs, &config, today);
        CalculationSnapshot::new(user, inputs, config, periods)
    }

    #[test]
    fn from_config_missing_path() {
        let result = SqliteAdapter::from_config(&EmptyConfig);
        match result {
            Err(BudgetError::ConfigMissing { section, key }) => {
                assert_eq!(section, "sqlite");
                assert_eq!(key, "path");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    #[test]
    fn schema_initialization_is_idempotent() {
        let adapter = store();
        adapter.initialize_schema().unwrap();
    }

    #[test]
    fn calculation_round_trip() {
        let adapter = store();
        let snap = snapshot("alice", "9000");
        let id = adapter.save_calculation(&snap, at(1, 9)).unwrap();

        let stored = adapter.user_calculations("alice").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].created_at, at(1, 9));
        assert_eq!(stored[0].snapshot, snap);
    }

    #[test]
    fn calculations_newest_first_and_per_user() {
        let adapter = store();
        let older = adapter.save_calculation(&snapshot("alice", "8000"), at(1, 9)).unwrap();
        let newer = adapter.save_calculation(&snapshot("alice", "9000"), at(3, 9)).unwrap();
        adapter.save_calculation(&snapshot("bob", "7000"), at(2, 9)).unwrap();

        let ids: Vec<i64> = adapter
            .user_calculations("alice")
            .unwrap()
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![newer, older]);

        let latest = adapter.latest_calculation("alice").unwrap().unwrap();
        assert_eq!(latest.id, newer);
        assert_eq!(latest.snapshot.inputs.tuition, "9000");
        assert!(!latest.snapshot.periods.is_empty());

        assert!(adapter.latest_calculation("carol").unwrap().is_none());
    }

    #[test]
    fn delete_calculation_removes_periods() {
        let adapter = store();
        let id = adapter.save_calculation(&snapshot("alice", "9000"), at(1, 9)).unwrap();

        assert!(adapter.delete_calculation(id).unwrap());
        assert!(!adapter.delete_calculation(id).unwrap());
        assert!(adapter.user_calculations("alice").unwrap().is_empty());

        let conn = adapter.conn().unwrap();
        let remaining: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM calculation_periods WHERE calculation_id = ?1",
                params![id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(remaining, 0);
    }

    fn draft(name: &str, with_event: bool) -> ScenarioDraft {
        ScenarioDraft {
            user_id: "alice".into(),
            name: name.into(),
            monthly_income_change: 150.0,
            monthly_expense_change: 40.0,
            event: with_event.then(|| OneTimeEvent {
                name: "laptop".into(),
                amount: 1200.0,
                effect: EventEffect::Expense,
                period: "Fall 2027".into(),
            }),
            projected_balance: -850.0,
        }
    }

    #[test]
    fn scenario_round_trip_with_and_without_event() {
        let adapter = store();
        let first = adapter.save_scenario(&draft("plain", false), at(1, 8)).unwrap();
        let second = adapter.save_scenario(&draft("laptop", true), at(2, 8)).unwrap();

        let saved = adapter.user_scenarios("alice").unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].id, second);
        assert_eq!(saved[0].draft, draft("laptop", true));
        assert_eq!(saved[1].id, first);
        assert_eq!(saved[1].draft.event, None);
    }

    #[test]
    fn update_and_delete_scenario() {
        let adapter = store();
        let id = adapter.save_scenario(&draft("plain", false), at(1, 8)).unwrap();

        let mut changed = draft("renamed", true);
        changed.projected_balance = 300.0;
        assert!(adapter.update_scenario(id, &changed).unwrap());
        assert!(!adapter.update_scenario(id + 100, &changed).unwrap());

        let saved = adapter.user_scenarios("alice").unwrap();
        assert_eq!(saved[0].draft.name, "renamed");
        assert_eq!(saved[0].draft.projected_balance, 300.0);
        assert_eq!(saved[0].created_at, at(1, 8));

        assert!(adapter.delete_scenario(id).unwrap());
        assert!(!adapter.delete_scenario(id).unwrap());
        assert!(adapter.user_scenarios("alice").unwrap().is_empty());
    }
}
