//! Aggregate figures over a projected period sequence.

use super::projection::PeriodRecord;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    /// Academic terms only; summer breaks are not counted.
    pub total_semesters: usize,
    pub total_periods: usize,
    /// Summed over every period, summers included.
    pub total_costs: f64,
    pub total_income: f64,
    pub final_balance: f64,
    pub average_cost_per_period: f64,
    pub average_income_per_period: f64,
}

impl Summary {
    pub fn compute(periods: &[PeriodRecord]) -> Self {
        let Some(last) = periods.last() else {
            return Summary::default();
        };

        let total_costs: f64 = periods.iter().map(|p| p.costs).sum();
        let total_income: f64 = periods.iter().map(|p| p.total_income).sum();
        let total_semesters = periods.iter().filter(|p| !p.is_summer).count();
        let count = periods.len() as f64;

        Summary {
            total_semesters,
            total_periods: periods.len(),
            total_costs,
            total_income,
            final_balance: last.balance,
            average_cost_per_period: total_costs / count,
            average_income_per_period: total_income / count,
        }
    }

    pub fn is_shortfall(&self) -> bool {
        self.final_balance < 0.0
    }
}
