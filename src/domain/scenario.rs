//! What-if scenarios: one typed modification of the baseline inputs,
//! evaluated by re-running the projection on a modified copy.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

use super::coerce::parse_amount;
use super::error::BudgetError;
use super::inputs::FinancialInputs;
use super::projection::{PeriodRecord, ProjectionConfig, compute_sequence};
use super::summary::Summary;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scenario {
    /// Annual tuition raised by a percentage.
    TuitionIncrease { percent: f64 },
    /// Summer weekly work hours replaced outright.
    SummerHours { hours_per_week: u32 },
    /// Monthly rent raised by a percentage.
    RentIncrease { percent: f64 },
    /// Fixed amount added to the per-term scholarship.
    AdditionalScholarship { amount: f64 },
}

/// Tag of a scenario without its parameter. Parsed from the form/CLI strings
/// `tuition-increase`, `more-summer-hours`, `higher-rent`, `more-scholarship`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScenarioKind {
    TuitionIncrease,
    SummerHours,
    RentIncrease,
    AdditionalScholarship,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::TuitionIncrease,
        ScenarioKind::SummerHours,
        ScenarioKind::RentIncrease,
        ScenarioKind::AdditionalScholarship,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ScenarioKind::TuitionIncrease => "tuition-increase",
            ScenarioKind::SummerHours => "more-summer-hours",
            ScenarioKind::RentIncrease => "higher-rent",
            ScenarioKind::AdditionalScholarship => "more-scholarship",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ScenarioKind::TuitionIncrease => "Tuition Increase (%)",
            ScenarioKind::SummerHours => "Summer Work Hours",
            ScenarioKind::RentIncrease => "Rent Increase (%)",
            ScenarioKind::AdditionalScholarship => "Additional Scholarship ($)",
        }
    }

    /// Attach a parameter. Hours are truncated to whole non-negative hours.
    pub fn with_value(self, value: f64) -> Scenario {
        let value = if value.is_finite() { value } else { 0.0 };
        match self {
            ScenarioKind::TuitionIncrease => Scenario::TuitionIncrease { percent: value },
            ScenarioKind::SummerHours => Scenario::SummerHours {
                hours_per_week: value.max(0.0).min(f64::from(u32::MAX)) as u32,
            },
            ScenarioKind::RentIncrease => Scenario::RentIncrease { percent: value },
            ScenarioKind::AdditionalScholarship => {
                Scenario::AdditionalScholarship { amount: value }
            }
        }
    }
}

impl FromStr for ScenarioKind {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        ScenarioKind::ALL
            .into_iter()
            .find(|k| k.tag() == tag)
            .ok_or_else(|| BudgetError::UnknownScenario {
                kind: tag.to_string(),
            })
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Projection of a scenario's modified inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub inputs: FinancialInputs,
    pub periods: Vec<PeriodRecord>,
    pub summary: Summary,
}

impl Scenario {
    pub fn kind(&self) -> ScenarioKind {
        match self {
            Scenario::TuitionIncrease { .. } => ScenarioKind::TuitionIncrease,
            Scenario::SummerHours { .. } => ScenarioKind::SummerHours,
            Scenario::RentIncrease { .. } => ScenarioKind::RentIncrease,
            Scenario::AdditionalScholarship { .. } => ScenarioKind::AdditionalScholarship,
        }
    }

    /// Modified copy of `base`; `base` itself is untouched.
    pub fn apply(&self, base: &FinancialInputs) -> FinancialInputs {
        let mut modified = base.clone();
        match *self {
            Scenario::TuitionIncrease { percent } => {
                modified.tuition = scaled(&base.tuition, percent);
            }
            Scenario::SummerHours { hours_per_week } => {
                modified.hours_per_week_summer = hours_per_week.to_string();
            }
            Scenario::RentIncrease { percent } => {
                modified.rent = scaled(&base.rent, percent);
            }
            Scenario::AdditionalScholarship { amount } => {
                modified.scholarship = (parse_amount(&base.scholarship) + amount).to_string();
            }
        }
        log::debug!("applied scenario {}", self);
        modified
    }

    pub fn evaluate(
        &self,
        base: &FinancialInputs,
        config: &ProjectionConfig,
        today: NaiveDate,
    ) -> ScenarioOutcome {
        let inputs = self.apply(base);
        let periods = compute_sequence(&inputs, config, today);
        let summary = Summary::compute(&periods);
        ScenarioOutcome {
            scenario: *self,
            inputs,
            periods,
            summary,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::TuitionIncrease { percent } => write!(f, "tuition +{percent}%"),
            Scenario::SummerHours { hours_per_week } => {
                write!(f, "summer hours {hours_per_week}/week")
            }
            Scenario::RentIncrease { percent } => write!(f, "rent +{percent}%"),
            Scenario::AdditionalScholarship { amount } => {
                write!(f, "scholarship +${amount:.2}")
            }
        }
    }
}

fn scaled(raw: &str, percent: f64) -> String {
    (parse_amount(raw) * (1.0 + percent / 100.0)).to_string()
}

/// Baseline and scenario summaries side by side.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioComparison {
    pub baseline: Summary,
    pub outcome: ScenarioOutcome,
}

impl ScenarioComparison {
    pub fn between(
        base: &FinancialInputs,
        scenario: &Scenario,
        config: &ProjectionConfig,
        today: NaiveDate,
    ) -> Self {
        let baseline = Summary::compute(&compute_sequence(base, config, today));
        let outcome = scenario.evaluate(base, config, today);
        Self { baseline, outcome }
    }

    /// Scenario final balance minus baseline final balance.
    pub fn balance_change(&self) -> f64 {
        self.outcome.summary.final_balance - self.baseline.final_balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fall() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn baseline() -> FinancialInputs {
        FinancialInputs {
            remaining_semesters: "2".into(),
            tuition: "10000".into(),
            rent: "800".into(),
            has_job: "yes".into(),
            hours_per_week_school: "10".into(),
            hours_per_week_summer: "20".into(),
            hourly_rate: "15".into(),
            scholarship: "1000".into(),
            ..Default::default()
        }
    }

    #[test]
    fn apply_leaves_baseline_untouched() {
        let base = baseline();
        let snapshot = base.clone();
        let _ = Scenario::TuitionIncrease { percent: 10.0 }.apply(&base);
        let _ = Scenario::RentIncrease { percent: 25.0 }.apply(&base);
        assert_eq!(base, snapshot);
    }

    #[test]
    fn tuition_increase_scales_tuition() {
        let modified = Scenario::TuitionIncrease { percent: 10.0 }.apply(&baseline());
        assert_relative_eq!(parse_amount(&modified.tuition), 11000.0);
    }

    #[test]
    fn rent_increase_scales_rent() {
        let modified = Scenario::RentIncrease { percent: 50.0 }.apply(&baseline());
        assert_eq!(parse_amount(&modified.rent), 1200.0);
    }

    #[test]
    fn summer_hours_replace() {
        let modified = Scenario::SummerHours { hours_per_week: 35 }.apply(&baseline());
        assert_eq!(modified.hours_per_week_summer, "35");
    }

    #[test]
    fn scholarship_is_added() {
        let modified = Scenario::AdditionalScholarship { amount: 750.0 }.apply(&baseline());
        assert_eq!(parse_amount(&modified.scholarship), 1750.0);
    }

    #[test]
    fn scaling_blank_field_stays_zero() {
        let base = FinancialInputs::default();
        let modified = Scenario::RentIncrease { percent: 20.0 }.apply(&base);
        assert_eq!(parse_amount(&modified.rent), 0.0);
    }

    #[test]
    fn evaluate_runs_projection_on_copy() {
        let outcome = Scenario::TuitionIncrease { percent: 10.0 }.evaluate(
            &baseline(),
            &ProjectionConfig::default(),
            fall(),
        );
        assert_eq!(outcome.periods.len(), 2);
        // Each academic term carries half of the extra 1000.
        assert_relative_eq!(outcome.periods[0].tuition, 5500.0);
        assert_eq!(outcome.summary.final_balance, outcome.periods[1].balance);
    }

    #[test]
    fn comparison_reports_balance_change() {
        let cmp = ScenarioComparison::between(
            &baseline(),
            &Scenario::AdditionalScholarship { amount: 500.0 },
            &ProjectionConfig::default(),
            fall(),
        );
        assert_relative_eq!(cmp.balance_change(), 1000.0);
    }

    #[test]
    fn kind_tags_parse() {
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.tag().parse::<ScenarioKind>().unwrap(), kind);
        }
        let err = "lottery-win".parse::<ScenarioKind>().unwrap_err();
        assert!(matches!(err, BudgetError::UnknownScenario { kind } if kind == "lottery-win"));
    }

    #[test]
    fn with_value_builds_matching_variant() {
        assert_eq!(
            ScenarioKind::SummerHours.with_value(32.7),
            Scenario::SummerHours { hours_per_week: 32 }
        );
        assert_eq!(
            ScenarioKind::SummerHours.with_value(-4.0),
            Scenario::SummerHours { hours_per_week: 0 }
        );
        assert_eq!(
            ScenarioKind::RentIncrease.with_value(f64::NAN),
            Scenario::RentIncrease { percent: 0.0 }
        );
        for kind in ScenarioKind::ALL {
            assert_eq!(kind.with_value(1.0).kind(), kind);
        }
    }
}
