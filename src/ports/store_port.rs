//! Persistence port for saved calculations and scenarios.
//!
//! The projection engine never reads from here. Callers load a stored input
//! set, run the engine, and save the new snapshot.

use chrono::NaiveDateTime;

use crate::domain::error::BudgetError;
use crate::domain::record::{CalculationSnapshot, SavedScenario, ScenarioDraft, StoredCalculation};

pub trait CalculationStore {
    /// Store a snapshot and return its assigned id.
    fn save_calculation(
        &self,
        snapshot: &CalculationSnapshot,
        created_at: NaiveDateTime,
    ) -> Result<i64, BudgetError>;

    /// All calculations for `user_id`, newest first.
    fn user_calculations(&self, user_id: &str) -> Result<Vec<StoredCalculation>, BudgetError>;

    fn latest_calculation(&self, user_id: &str) -> Result<Option<StoredCalculation>, BudgetError> {
        Ok(self.user_calculations(user_id)?.into_iter().next())
    }

    /// Returns false when no calculation had that id.
    fn delete_calculation(&self, id: i64) -> Result<bool, BudgetError>;

    fn save_scenario(
        &self,
        draft: &ScenarioDraft,
        created_at: NaiveDateTime,
    ) -> Result<i64, BudgetError>;

    /// All saved scenarios for `user_id`, newest first.
    fn user_scenarios(&self, user_id: &str) -> Result<Vec<SavedScenario>, BudgetError>;

    fn update_scenario(&self, id: i64, draft: &ScenarioDraft) -> Result<bool, BudgetError>;

    fn delete_scenario(&self, id: i64) -> Result<bool, BudgetError>;
}
