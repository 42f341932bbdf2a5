//! Form and config validation.
//!
//! Runs before projection at the CLI and HTTP boundaries. The engine itself
//! accepts anything and coerces softly; this layer rejects out-of-range or
//! malformed values with the name of the first offending field.

use crate::domain::error::BudgetError;
use crate::domain::inputs::FinancialInputs;
use crate::ports::config_port::ConfigPort;

#[derive(Debug, Clone, Copy)]
enum Kind {
    Amount,
    Whole,
}

struct Rule {
    field: &'static str,
    required: bool,
    kind: Kind,
    max: f64,
    min: f64,
}

const fn amount(field: &'static str, max: f64) -> Rule {
    Rule {
        field,
        required: false,
        kind: Kind::Amount,
        min: 0.0,
        max,
    }
}

const fn whole(field: &'static str, max: f64) -> Rule {
    Rule {
        field,
        required: false,
        kind: Kind::Whole,
        min: 0.0,
        max,
    }
}

const RULES: [Rule; 17] = [
    Rule {
        field: "remaining_semesters",
        required: true,
        kind: Kind::Whole,
        min: 1.0,
        max: 8.0,
    },
    Rule {
        required: true,
        ..amount("tuition", 200_000.0)
    },
    amount("books", 10_000.0),
    amount("supplies", 10_000.0),
    amount("rent", 10_000.0),
    amount("utilities", 1_000.0),
    amount("groceries", 2_000.0),
    amount("cell_phone", 500.0),
    amount("transportation", 1_000.0),
    amount("memberships", 500.0),
    whole("hours_per_week_school", 40.0),
    whole("hours_per_week_summer", 80.0),
    amount("hourly_rate", 100.0),
    amount("scholarship", 50_000.0),
    amount("bursary", 50_000.0),
    amount("grant", 50_000.0),
    amount("savings", 1_000_000.0),
];

/// Check every input field against its allowed range. Returns the first failure.
pub fn validate_inputs(inputs: &FinancialInputs) -> Result<(), BudgetError> {
    for rule in &RULES {
        let raw = inputs.field(rule.field).unwrap_or_default();
        check(rule, raw)?;
    }
    validate_job_flag(&inputs.has_job)
}

fn check(rule: &Rule, raw: &str) -> Result<(), BudgetError> {
    let text = raw.trim();
    if text.is_empty() {
        if rule.required {
            return Err(BudgetError::input(rule.field, "is required"));
        }
        return Ok(());
    }

    let value: f64 = text
        .parse()
        .map_err(|_| BudgetError::input(rule.field, format!("'{text}' is not a number")))?;
    if !value.is_finite() {
        return Err(BudgetError::input(rule.field, "must be a finite number"));
    }
    if matches!(rule.kind, Kind::Whole) && value.fract() != 0.0 {
        return Err(BudgetError::input(rule.field, "must be a whole number"));
    }
    if value < rule.min || value > rule.max {
        return Err(BudgetError::input(
            rule.field,
            format!("must be between {} and {}", rule.min, rule.max),
        ));
    }
    Ok(())
}

fn validate_job_flag(raw: &str) -> Result<(), BudgetError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "yes" | "no" => Ok(()),
        _ => Err(BudgetError::input("has_job", "must be 'yes' or 'no'")),
    }
}

/// Check the `[projection]` section: rates, when present, lie in [0, 1).
pub fn validate_projection_config(config: &dyn ConfigPort) -> Result<(), BudgetError> {
    validate_rate(config, "tax_rate")?;
    validate_rate(config, "inflation_rate")?;
    Ok(())
}

fn validate_rate(config: &dyn ConfigPort, key: &str) -> Result<(), BudgetError> {
    let Some(raw) = config.get_string("projection", key) else {
        return Ok(());
    };
    let invalid = |reason: String| BudgetError::ConfigInvalid {
        section: "projection".to_string(),
        key: key.to_string(),
        reason,
    };
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{raw}' is not a number")))?;
    if !(0.0..1.0).contains(&value) {
        return Err(invalid(format!("{key} must be between 0 and 1")));
    }
    Ok(())
}
