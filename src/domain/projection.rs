//! Semester cash-flow projection.
//!
//! Walks the term calendar from the term containing `today`, emitting one
//! period per term until the requested number of academic terms is reached.
//! Each period's ending balance becomes the next period's starting savings.
//! The whole sequence is regenerated on every call; nothing is cached.

use chrono::NaiveDate;

use super::coerce::MAX_AMOUNT;
use super::inputs::{FinancialInputs, ParsedInputs};
use super::term::{MONTHS_PER_TERM, Term, TermOfYear, terms_from};

pub const WEEKS_PER_MONTH: u32 = 4;

/// Paid weeks in one four-month term (4 weeks x 4 months).
pub const WORK_WEEKS_PER_TERM: u32 = WEEKS_PER_MONTH * MONTHS_PER_TERM;

pub const DEFAULT_TAX_RATE: f64 = 0.15;
pub const DEFAULT_INFLATION_RATE: f64 = 0.03;

/// Upper bound on academic terms walked in one projection. Requests above it
/// are truncated so a runaway count cannot exhaust memory.
pub const MAX_PROJECTED_SEMESTERS: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionConfig {
    pub apply_tax: bool,
    pub tax_rate: f64,
    pub apply_inflation: bool,
    pub inflation_rate: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            apply_tax: false,
            tax_rate: DEFAULT_TAX_RATE,
            apply_inflation: false,
            inflation_rate: DEFAULT_INFLATION_RATE,
        }
    }
}

/// One projected term.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodRecord {
    /// 1-based position over all emitted periods.
    pub position: usize,
    /// 1-based academic term number; 0 for summer breaks.
    pub semester: u32,
    pub term: Term,
    pub year: i32,
    pub label: String,
    pub is_summer: bool,
    /// Tuition portion of `costs` (0 in summer).
    pub tuition: f64,
    pub costs: f64,
    pub work_income: f64,
    pub aid: f64,
    pub starting_savings: f64,
    pub total_income: f64,
    pub available_funds: f64,
    pub balance: f64,
    pub is_surplus: bool,
    pub deficit: f64,
    pub work_hours_per_week: u32,
}

/// Flat income tax owed on `income`. Zero for non-positive income or rate;
/// the rate is capped at 100%.
pub fn flat_tax(income: f64, rate: f64) -> f64 {
    if income <= 0.0 || !rate.is_finite() || rate <= 0.0 {
        return 0.0;
    }
    income * rate.min(1.0)
}

/// Tuition grown by `rate` per year for `years` years, saturating at
/// [`MAX_AMOUNT`].
pub fn inflated_tuition(base: f64, years: u32, rate: f64) -> f64 {
    if !rate.is_finite() || rate <= 0.0 {
        return base;
    }
    let years = i32::try_from(years).unwrap_or(i32::MAX);
    let grown = base * (1.0 + rate).powi(years);
    if grown.is_finite() {
        grown.min(MAX_AMOUNT)
    } else {
        MAX_AMOUNT
    }
}

/// Project the raw input set. Returns an empty sequence when fewer than one
/// semester remains.
pub fn compute_sequence(
    inputs: &FinancialInputs,
    config: &ProjectionConfig,
    today: NaiveDate,
) -> Vec<PeriodRecord> {
    project(&inputs.parse(), config, today)
}

/// Project already-coerced inputs.
pub fn project(inputs: &ParsedInputs, config: &ProjectionConfig, today: NaiveDate) -> Vec<PeriodRecord> {
    if inputs.remaining_semesters < 1 {
        log::debug!("no remaining semesters requested; projection is empty");
        return Vec::new();
    }
    let wanted = inputs.remaining_semesters.min(MAX_PROJECTED_SEMESTERS);
    if wanted < inputs.remaining_semesters {
        log::debug!(
            "remaining semesters {} truncated to {}",
            inputs.remaining_semesters,
            wanted
        );
    }

    let living_per_term = inputs.monthly_living_costs() * f64::from(MONTHS_PER_TERM);
    let first = TermOfYear::containing(today);

    let mut periods = Vec::with_capacity((wanted + wanted / 2 + 1) as usize);
    let mut savings = inputs.savings;
    let mut academic_count = 0u32;

    for slot in terms_from(today) {
        if academic_count >= wanted {
            break;
        }

        let academic = slot.term.is_academic();
        let (semester, tuition, costs, hours, aid) = if academic {
            academic_count += 1;
            let years_elapsed = u32::try_from(slot.year - first.year).unwrap_or(0);
            let tuition = term_tuition(inputs.tuition_per_year, years_elapsed, config);
            let costs = tuition
                + living_per_term
                + inputs.books_per_term
                + inputs.supplies_per_term;
            (
                academic_count,
                tuition,
                costs,
                inputs.hours_school,
                inputs.aid_per_term(),
            )
        } else {
            (0, 0.0, living_per_term, inputs.hours_summer, 0.0)
        };

        let work_income = term_wages(inputs, hours, config);
        let total_income = work_income + aid;
        let available_funds = savings + total_income;
        let balance = available_funds - costs;

        periods.push(PeriodRecord {
            position: periods.len() + 1,
            semester,
            term: slot.term,
            year: slot.year,
            label: slot.label(),
            is_summer: !academic,
            tuition,
            costs,
            work_income,
            aid,
            starting_savings: savings,
            total_income,
            available_funds,
            balance,
            is_surplus: balance >= 0.0,
            deficit: if balance < 0.0 { -balance } else { 0.0 },
            work_hours_per_week: hours,
        });

        savings = balance;
    }

    periods
}

fn term_tuition(tuition_per_year: f64, years_elapsed: u32, config: &ProjectionConfig) -> f64 {
    let half = tuition_per_year / 2.0;
    if config.apply_inflation {
        inflated_tuition(half, years_elapsed, config.inflation_rate)
    } else {
        half
    }
}

fn term_wages(inputs: &ParsedInputs, hours_per_week: u32, config: &ProjectionConfig) -> f64 {
    if !inputs.earns_wages() {
        return 0.0;
    }
    let gross = f64::from(WORK_WEEKS_PER_TERM) * f64::from(hours_per_week) * inputs.hourly_rate;
    if config.apply_tax {
        gross - flat_tax(gross, config.tax_rate)
    } else {
        gross
    }
}
