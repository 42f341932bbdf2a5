//! Property tests for the projection engine.
//!
//! Tests cover:
//! - Each period starts with the previous period's ending balance
//! - Final balance equals savings plus income minus costs
//! - Coerced amounts never go negative; "-500" behaves as "0" for every
//!   currency and hour field
//! - Turning on tax never raises any period's work income or the final balance
//! - Academic term count matches the request

use budgetly::domain::coerce::parse_amount;
use budgetly::domain::inputs::{FinancialInputs, INPUT_FIELDS};
use budgetly::domain::projection::{ProjectionConfig, compute_sequence};
use budgetly::domain::summary::Summary;
use chrono::NaiveDate;
use proptest::prelude::*;

fn amount() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..20_000).prop_map(|v| v.to_string()),
        (0.0f64..5_000.0).prop_map(|v| format!("{v:.2}")),
        Just(String::new()),
        Just("-250".to_string()),
        Just("abc".to_string()),
    ]
}

fn inputs() -> impl Strategy<Value = FinancialInputs> {
    (
        (1u32..=8, amount(), amount(), amount(), amount(), amount()),
        (
            prop_oneof![Just("yes"), Just("no"), Just("")],
            0u32..=40,
            0u32..=80,
            amount(),
        ),
        (amount(), amount(), amount(), amount()),
    )
        .prop_map(
            |(
                (semesters, tuition, books, rent, groceries, utilities),
                (job, school, summer, rate),
                (scholarship, bursary, grant, savings),
            )| FinancialInputs {
                remaining_semesters: semesters.to_string(),
                tuition,
                books,
                rent,
                groceries,
                utilities,
                has_job: job.to_string(),
                hours_per_week_school: school.to_string(),
                hours_per_week_summer: summer.to_string(),
                hourly_rate: rate,
                scholarship,
                bursary,
                grant,
                savings,
                ..Default::default()
            },
        )
}

fn start_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2035, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

proptest! {
    #[test]
    fn balance_carries_forward(inputs in inputs(), today in start_date()) {
        let periods = compute_sequence(&inputs, &ProjectionConfig::default(), today);
        for pair in periods.windows(2) {
            prop_assert_eq!(pair[1].starting_savings, pair[0].balance);
        }
        if let Some(first) = periods.first() {
            prop_assert_eq!(first.starting_savings, parse_amount(&inputs.savings));
        }
    }

    #[test]
    fn final_balance_identity(inputs in inputs(), today in start_date(), tax in any::<bool>()) {
        let config = ProjectionConfig { apply_tax: tax, ..Default::default() };
        let periods = compute_sequence(&inputs, &config, today);
        let summary = Summary::compute(&periods);
        let expected = parse_amount(&inputs.savings) + summary.total_income - summary.total_costs;
        prop_assert!((summary.final_balance - expected).abs() < 1e-6 * (1.0 + expected.abs()));
    }

    #[test]
    fn components_are_non_negative(inputs in inputs(), today in start_date()) {
        let periods = compute_sequence(&inputs, &ProjectionConfig::default(), today);
        for p in &periods {
            prop_assert!(p.costs >= 0.0);
            prop_assert!(p.work_income >= 0.0);
            prop_assert!(p.aid >= 0.0);
            prop_assert!(p.deficit >= 0.0);
            prop_assert_eq!(p.is_surplus, p.balance >= 0.0);
        }
    }

    #[test]
    fn tax_never_raises_balance(inputs in inputs(), today in start_date(), rate in 0.0f64..0.99) {
        let untaxed = ProjectionConfig { apply_tax: false, tax_rate: rate, ..Default::default() };
        let taxed = ProjectionConfig { apply_tax: true, tax_rate: rate, ..Default::default() };
        let a = Summary::compute(&compute_sequence(&inputs, &untaxed, today));
        let b = Summary::compute(&compute_sequence(&inputs, &taxed, today));
        prop_assert!(b.final_balance <= a.final_balance + 1e-9);
    }

    #[test]
    fn tax_never_raises_work_income(inputs in inputs(), today in start_date(), rate in 0.0f64..=1.0) {
        let untaxed = ProjectionConfig { apply_tax: false, tax_rate: rate, ..Default::default() };
        let taxed = ProjectionConfig { apply_tax: true, tax_rate: rate, ..Default::default() };
        let plain = compute_sequence(&inputs, &untaxed, today);
        let net = compute_sequence(&inputs, &taxed, today);
        prop_assert_eq!(plain.len(), net.len());
        for (before, after) in plain.iter().zip(&net) {
            prop_assert!(after.work_income <= before.work_income);
            prop_assert!(after.work_income >= 0.0);
        }
    }

    #[test]
    fn academic_terms_match_request(inputs in inputs(), today in start_date()) {
        let periods = compute_sequence(&inputs, &ProjectionConfig::default(), today);
        let academic = periods.iter().filter(|p| !p.is_summer).count();
        prop_assert_eq!(academic.to_string(), inputs.remaining_semesters.clone());
        prop_assert!(!periods.last().unwrap().is_summer);
    }
}

/// Every numeric field except the semester count: currencies and hours.
fn currency_and_hour_fields() -> impl Iterator<Item = &'static str> {
    INPUT_FIELDS
        .into_iter()
        .filter(|f| !matches!(*f, "remaining_semesters" | "has_job"))
}

fn populated_inputs() -> FinancialInputs {
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

#[test]
fn negative_field_behaves_as_zero() {
    let today = NaiveDate::from_ymd_opt(2027, 2, 1).unwrap();
    let config = ProjectionConfig {
        apply_tax: true,
        ..Default::default()
    };
    let mut checked = 0;
    for field in currency_and_hour_fields() {
        let mut negative = populated_inputs();
        *negative.field_mut(field).unwrap() = "-500".into();
        let mut zero = populated_inputs();
        *zero.field_mut(field).unwrap() = "0".into();

        assert_eq!(
            compute_sequence(&negative, &config, today),
            compute_sequence(&zero, &config, today),
            "field {field}"
        );
        checked += 1;
    }
    assert_eq!(checked, 16);
}
