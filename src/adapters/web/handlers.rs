//! HTTP request handlers for web adapter.

use askama::Template;
use axum::{
    Form,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use chrono::Local;
use std::sync::Arc;

use crate::adapters::chart_svg::balance_chart_svg;
use crate::adapters::csv_report_adapter::render_csv;
use crate::domain::error::BudgetError;
use crate::domain::inputs::FinancialInputs;
use crate::domain::projection::{PeriodRecord, compute_sequence};
use crate::domain::record::CalculationSnapshot;
use crate::domain::scenario::{ScenarioComparison, ScenarioKind};
use crate::domain::summary::Summary;
use crate::domain::validation::validate_inputs;

use super::templates::{
    CalculationsTemplate, CalculatorTemplate, ReportTemplate, ScenarioTemplate, form_fields,
    kind_options,
};
use super::{AppState, WebError, is_htmx_request};

/// Full page unless the request came from HTMX.
fn respond<T: Template>(headers: &HeaderMap, template: &T, fragment: String) -> Response {
    if is_htmx_request(headers) {
        return Html(fragment).into_response();
    }
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => WebError::internal(format!("template error: {e}")).into_response(),
    }
}

fn project_form(
    state: &AppState,
    inputs: &FinancialInputs,
) -> Result<(Vec<PeriodRecord>, Summary), BudgetError> {
    validate_inputs(inputs)?;
    let periods = compute_sequence(inputs, &state.config, (state.today)());
    let summary = Summary::compute(&periods);
    Ok((periods, summary))
}

pub async fn calculator_form(headers: HeaderMap) -> Response {
    let inputs = FinancialInputs::default();
    let template = CalculatorTemplate {
        fields: form_fields(&inputs),
        kinds: kind_options(),
    };
    let fragment = template.fragment();
    respond(&headers, &template, fragment)
}

pub async fn project(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(inputs): Form<FinancialInputs>,
) -> Result<Response, WebError> {
    let (periods, summary) = project_form(&state, &inputs)?;
    let chart_svg = balance_chart_svg(&periods);

    let template = ReportTemplate {
        periods: &periods,
        summary: &summary,
        chart_svg: &chart_svg,
    };
    let fragment = template.fragment();
    Ok(respond(&headers, &template, fragment))
}

pub async fn project_csv(
    State(state): State<Arc<AppState>>,
    Form(inputs): Form<FinancialInputs>,
) -> Result<Response, WebError> {
    let (periods, summary) = project_form(&state, &inputs)?;
    let body = render_csv(&periods, &summary)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"budget-projection.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

#[derive(Debug, serde::Deserialize)]
pub struct ScenarioForm {
    #[serde(flatten)]
    pub inputs: FinancialInputs,
    pub scenario_kind: String,
    #[serde(default)]
    pub scenario_value: String,
}

pub async fn scenario(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ScenarioForm>,
) -> Result<Response, WebError> {
    let kind: ScenarioKind = form.scenario_kind.parse()?;
    let value: f64 = form
        .scenario_value
        .trim()
        .parse()
        .map_err(|_| WebError::bad_request("Invalid scenario value"))?;
    let scenario = kind.with_value(value);

    validate_inputs(&form.inputs)?;
    let comparison =
        ScenarioComparison::between(&form.inputs, &scenario, &state.config, (state.today)());

    let template = ScenarioTemplate {
        comparison: &comparison,
        description: scenario.to_string(),
    };
    let fragment = template.fragment();
    Ok(respond(&headers, &template, fragment))
}

pub async fn list_calculations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let calculations = state.store.user_calculations(&user_id)?;
    let template = CalculationsTemplate {
        user_id: &user_id,
        calculations: &calculations,
    };
    let fragment = template.fragment();
    Ok(respond(&headers, &template, fragment))
}

pub async fn save_calculation(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    headers: HeaderMap,
    Form(inputs): Form<FinancialInputs>,
) -> Result<Response, WebError> {
    let (periods, _) = project_form(&state, &inputs)?;
    let snapshot = CalculationSnapshot::new(&user_id, inputs, state.config, periods);
    let id = state
        .store
        .save_calculation(&snapshot, Local::now().naive_local())?;
    log::info!("saved calculation {id} for {user_id}");

    let calculations = state.store.user_calculations(&user_id)?;
    let template = CalculationsTemplate {
        user_id: &user_id,
        calculations: &calculations,
    };
    let fragment = template.fragment();
    Ok((StatusCode::CREATED, respond(&headers, &template, fragment)).into_response())
}

pub async fn delete_calculation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Response, WebError> {
    if !state.store.delete_calculation(id)? {
        return Err(WebError::not_found(format!("calculation #{id} not found")));
    }
    Ok((StatusCode::OK, Html(String::new())).into_response())
}

pub async fn not_found() -> WebError {
    WebError::not_found("Page not found")
}
