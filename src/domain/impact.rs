//! Rough balance-impact estimate for hypothetical monthly changes and a
//! single one-time event, applied on top of a projected final balance.

use std::fmt;
use std::str::FromStr;

use super::error::BudgetError;
use super::projection::PeriodRecord;
use super::term::MONTHS_PER_TERM;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventEffect {
    Income,
    Expense,
}

impl EventEffect {
    pub fn as_str(self) -> &'static str {
        match self {
            EventEffect::Income => "income",
            EventEffect::Expense => "expense",
        }
    }
}

impl FromStr for EventEffect {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EventEffect::Income),
            "expense" => Ok(EventEffect::Expense),
            other => Err(BudgetError::input(
                "event_effect",
                &format!("expected 'income' or 'expense', got '{other}'"),
            )),
        }
    }
}

impl fmt::Display for EventEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OneTimeEvent {
    pub name: String,
    pub amount: f64,
    pub effect: EventEffect,
    /// Label of the period the event falls in, e.g. "Summer 2027". Informational.
    pub period: String,
}

impl OneTimeEvent {
    /// Signed contribution to the balance. Non-positive amounts contribute nothing.
    pub fn signed_amount(&self) -> f64 {
        if self.amount.is_nan() || self.amount <= 0.0 {
            return 0.0;
        }
        match self.effect {
            EventEffect::Income => self.amount,
            EventEffect::Expense => -self.amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BalanceImpact {
    pub monthly_income_change: f64,
    pub monthly_expense_change: f64,
    pub event: Option<OneTimeEvent>,
}

impl BalanceImpact {
    pub fn monthly_net_change(&self) -> f64 {
        self.monthly_income_change - self.monthly_expense_change
    }

    pub fn projected_balance(&self, base_balance: f64, horizon_months: u32) -> f64 {
        let one_time = self.event.as_ref().map_or(0.0, OneTimeEvent::signed_amount);
        base_balance + self.monthly_net_change() * f64::from(horizon_months) + one_time
    }

    /// Apply the impact to a projection's final balance over its own horizon.
    pub fn estimate(&self, periods: &[PeriodRecord]) -> ImpactEstimate {
        let base_balance = periods.last().map_or(0.0, |p| p.balance);
        let horizon = horizon_months(periods);
        let projected_balance = self.projected_balance(base_balance, horizon);
        ImpactEstimate {
            base_balance,
            horizon_months: horizon,
            projected_balance,
            status: ScenarioStatus::classify(projected_balance),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactEstimate {
    pub base_balance: f64,
    pub horizon_months: u32,
    pub projected_balance: f64,
    pub status: ScenarioStatus,
}

/// Months covered by a projection: four per emitted period.
pub fn horizon_months(periods: &[PeriodRecord]) -> u32 {
    u32::try_from(periods.len())
        .unwrap_or(u32::MAX)
        .saturating_mul(MONTHS_PER_TERM)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStatus {
    Great,
    Good,
    Short,
    AtRisk,
}

impl ScenarioStatus {
    pub fn classify(balance: f64) -> Self {
        if balance >= 1000.0 {
            ScenarioStatus::Great
        } else if balance >= 0.0 {
            ScenarioStatus::Good
        } else if balance >= -2000.0 {
            ScenarioStatus::Short
        } else {
            ScenarioStatus::AtRisk
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScenarioStatus::Great => "Great! You'll have extra money",
            ScenarioStatus::Good => "Good! You'll break even",
            ScenarioStatus::Short => "You'll be a little short",
            ScenarioStatus::AtRisk => "Warning: significant shortfall",
        }
    }
}

impl fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
