//! Records persisted through the calculation store.

use chrono::NaiveDateTime;

use super::impact::{BalanceImpact, OneTimeEvent};
use super::inputs::FinancialInputs;
use super::projection::{PeriodRecord, ProjectionConfig};

/// A computed projection ready to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationSnapshot {
    pub user_id: String,
    pub inputs: FinancialInputs,
    pub config: ProjectionConfig,
    pub periods: Vec<PeriodRecord>,
    pub projected_balance: f64,
}

impl CalculationSnapshot {
    /// Snapshot a projection; the projected balance is the last period's.
    pub fn new(
        user_id: &str,
        inputs: FinancialInputs,
        config: ProjectionConfig,
        periods: Vec<PeriodRecord>,
    ) -> Self {
        let projected_balance = periods.last().map_or(0.0, |p| p.balance);
        Self {
            user_id: user_id.to_string(),
            inputs,
            config,
            periods,
            projected_balance,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredCalculation {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub snapshot: CalculationSnapshot,
}

/// A balance-impact estimate a user chose to keep.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDraft {
    pub user_id: String,
    pub name: String,
    pub monthly_income_change: f64,
    pub monthly_expense_change: f64,
    pub event: Option<OneTimeEvent>,
    pub projected_balance: f64,
}

impl ScenarioDraft {
    pub fn from_impact(user_id: &str, name: &str, impact: &BalanceImpact, projected: f64) -> Self {
        Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            monthly_income_change: impact.monthly_income_change,
            monthly_expense_change: impact.monthly_expense_change,
            event: impact.event.clone(),
            projected_balance: projected,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SavedScenario {
    pub id: i64,
    pub created_at: NaiveDateTime,
    pub draft: ScenarioDraft,
}
