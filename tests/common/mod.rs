#![allow(dead_code)]

use budgetly::domain::error::BudgetError;
use budgetly::domain::inputs::FinancialInputs;
use budgetly::domain::record::{
    CalculationSnapshot, SavedScenario, ScenarioDraft, StoredCalculation,
};
use budgetly::ports::store_port::CalculationStore;
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Mutex;

/// In-memory store. Newest-first ordering by timestamp then id, like SQLite.
pub struct MockStore {
    calculations: Mutex<Vec<StoredCalculation>>,
    scenarios: Mutex<Vec<SavedScenario>>,
    next_id: Mutex<i64>,
    pub fail_with: Option<String>,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            calculations: Mutex::new(Vec::new()),
            scenarios: Mutex::new(Vec::new()),
            next_id: Mutex::new(1),
            fail_with: None,
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            fail_with: Some(reason.to_string()),
            ..Self::new()
        }
    }

    fn check(&self) -> Result<(), BudgetError> {
        match &self.fail_with {
            Some(reason) => Err(BudgetError::DatabaseQuery {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }

    fn allocate_id(&self) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        let id = *next;
        *next += 1;
        id
    }

    pub fn calculation_count(&self) -> usize {
        self.calculations.lock().unwrap().len()
    }
}

impl CalculationStore for MockStore {
    fn save_calculation(
        &self,
        snapshot: &CalculationSnapshot,
        created_at: NaiveDateTime,
    ) -> Result<i64, BudgetError> {
        self.check()?;
        let id = self.allocate_id();
        self.calculations.lock().unwrap().push(StoredCalculation {
            id,
            created_at,
            snapshot: snapshot.clone(),
        });
        Ok(id)
    }

    fn user_calculations(&self, user_id: &str) -> Result<Vec<StoredCalculation>, BudgetError> {
        self.check()?;
        let mut found: Vec<StoredCalculation> = self
            .calculations
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.snapshot.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    fn delete_calculation(&self, id: i64) -> Result<bool, BudgetError> {
        self.check()?;
        let mut calcs = self.calculations.lock().unwrap();
        let before = calcs.len();
        calcs.retain(|c| c.id != id);
        Ok(calcs.len() < before)
    }

    fn save_scenario(
        &self,
        draft: &ScenarioDraft,
        created_at: NaiveDateTime,
    ) -> Result<i64, BudgetError> {
        self.check()?;
        let id = self.allocate_id();
        self.scenarios.lock().unwrap().push(SavedScenario {
            id,
            created_at,
            draft: draft.clone(),
        });
        Ok(id)
    }

    fn user_scenarios(&self, user_id: &str) -> Result<Vec<SavedScenario>, BudgetError> {
        self.check()?;
        let mut found: Vec<SavedScenario> = self
            .scenarios
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.draft.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    fn update_scenario(&self, id: i64, draft: &ScenarioDraft) -> Result<bool, BudgetError> {
        self.check()?;
        let mut scenarios = self.scenarios.lock().unwrap();
        match scenarios.iter_mut().find(|s| s.id == id) {
            Some(saved) => {
                saved.draft = draft.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_scenario(&self, id: i64) -> Result<bool, BudgetError> {
        self.check()?;
        let mut scenarios = self.scenarios.lock().unwrap();
        let before = scenarios.len();
        scenarios.retain(|s| s.id != id);
        Ok(scenarios.len() < before)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn timestamp(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

/// A date in the Fall term.
pub fn fall_day() -> NaiveDate {
    date(2026, 10, 16)
}

/// Two semesters at 10000/year tuition, everything else blank.
pub fn tuition_only_inputs() -> FinancialInputs {
    FinancialInputs {
        remaining_semesters: "2".into(),
        tuition: "10000".into(),
        has_job: "no".into(),
        ..Default::default()
    }
}

/// Tuition plus a 10 h/week job at 15/h and a 1000 scholarship.
pub fn working_student_inputs() -> FinancialInputs {
    FinancialInputs {
        has_job: "yes".into(),
        hours_per_week_school: "10".into(),
        hourly_rate: "15".into(),
        scholarship: "1000".into(),
        ..tuition_only_inputs()
    }
}

/// A fully populated, valid input set.
pub fn full_inputs() -> FinancialInputs {
    FinancialInputs {
        remaining_semesters: "4".into(),
        tuition: "12000".into(),
        books: "400".into(),
        supplies: "100".into(),
        rent: "850".into(),
        utilities: "75".into(),
        groceries: "320".into(),
        cell_phone: "45".into(),
        transportation: "90".into(),
        memberships: "20".into(),
        has_job: "yes".into(),
        hours_per_week_school: "12".into(),
        hours_per_week_summer: "35".into(),
        hourly_rate: "17.25".into(),
        scholarship: "1500".into(),
        bursary: "500".into(),
        grant: "750".into(),
        savings: "4000".into(),
    }
}

pub const FULL_INPUTS_INI: &str = r#"
[inputs]
remaining_semesters = 4
tuition = 12000
books = 400
supplies = 100
rent = 850
utilities = 75
groceries = 320
cell_phone = 45
transportation = 90
memberships = 20
has_job = yes
hours_per_week_school = 12
hours_per_week_summer = 35
hourly_rate = 17.25
scholarship = 1500
bursary = 500
grant = 750
savings = 4000

[projection]
apply_tax = false
tax_rate = 0.15
apply_inflation = false
inflation_rate = 0.03
"#;
