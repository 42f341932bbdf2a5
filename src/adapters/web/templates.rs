//! HTML templates using Askama.
//!
//! Full pages render through the template files; HTMX requests get the
//! `fragment()` markup only.

use askama::Template;

use crate::domain::inputs::FinancialInputs;
use crate::domain::projection::PeriodRecord;
use crate::domain::record::StoredCalculation;
use crate::domain::scenario::{ScenarioComparison, ScenarioKind};
use crate::domain::summary::Summary;

/// Form labels, in form order.
pub const FIELD_LABELS: [(&str, &str); 18] = [
    ("remaining_semesters", "Semesters remaining"),
    ("tuition", "Tuition per year"),
    ("books", "Books per semester"),
    ("supplies", "Supplies per semester"),
    ("rent", "Rent per month"),
    ("utilities", "Utilities per month"),
    ("groceries", "Groceries per month"),
    ("cell_phone", "Cell phone per month"),
    ("transportation", "Transportation per month"),
    ("memberships", "Memberships per month"),
    ("has_job", "Working? (yes/no)"),
    ("hours_per_week_school", "Work hours per week (school)"),
    ("hours_per_week_summer", "Work hours per week (summer)"),
    ("hourly_rate", "Hourly rate"),
    ("scholarship", "Scholarship per semester"),
    ("bursary", "Bursary per semester"),
    ("grant", "Grant per semester"),
    ("savings", "Current savings"),
];

/// HTML-escape text for the hand-built fragments, using askama's escaper.
pub(crate) fn escape_html(raw: &str) -> String {
    askama::filters::escape(askama::Html, raw)
        .map(|markup| markup.to_string())
        .unwrap_or_default()
}

fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

pub struct FormField<'a> {
    pub name: &'static str,
    pub label: &'static str,
    pub value: &'a str,
}

pub struct KindOption {
    pub tag: &'static str,
    pub description: &'static str,
}

pub fn form_fields(inputs: &FinancialInputs) -> Vec<FormField<'_>> {
    FIELD_LABELS
        .iter()
        .map(|&(name, label)| FormField {
            name,
            label,
            value: inputs.field(name).unwrap_or_default(),
        })
        .collect()
}

pub fn kind_options() -> Vec<KindOption> {
    ScenarioKind::ALL
        .iter()
        .map(|k| KindOption {
            tag: k.tag(),
            description: k.description(),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "calculator.html")]
pub struct CalculatorTemplate<'a> {
    pub fields: Vec<FormField<'a>>,
    pub kinds: Vec<KindOption>,
}

impl<'a> CalculatorTemplate<'a> {
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"content\"><h1>Budget Calculator</h1>");
        html.push_str("<form hx-post=\"/projection\" hx-target=\"#result\">");
        for f in &self.fields {
            html.push_str(&format!(
                "<label>{}: <input name=\"{}\" value=\"{}\"></label><br>",
                f.label,
                f.name,
                escape_html(f.value)
            ));
        }
        html.push_str("<button type=\"submit\">Project</button>");
        html.push_str("<select name=\"scenario_kind\">");
        for k in &self.kinds {
            html.push_str(&format!(
                "<option value=\"{}\">{}</option>",
                k.tag, k.description
            ));
        }
        html.push_str("</select>");
        html.push_str("<input name=\"scenario_value\" value=\"10\">");
        html.push_str(
            "<button hx-post=\"/scenario\" hx-target=\"#result\">Compare scenario</button>",
        );
        html.push_str("</form><div id=\"result\"></div></div>");
        html
    }
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportTemplate<'a> {
    pub periods: &'a [PeriodRecord],
    pub summary: &'a Summary,
    pub chart_svg: &'a str,
}

impl<'a> ReportTemplate<'a> {
    pub fn fragment(&self) -> String {
        let mut html = String::from("<div id=\"report-content\"><h1>Projection</h1>");
        html.push_str(&format!("<div class=\"chart\">{}</div>", self.chart_svg));
        html.push_str(
            "<table><tr><th>Period</th><th>Costs</th><th>Work Income</th><th>Aid</th>\
             <th>Savings</th><th>Total Income</th><th>Balance</th></tr>",
        );
        for p in self.periods {
            let class = if p.is_surplus { "surplus" } else { "deficit" };
            html.push_str(&format!(
                "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                class,
                escape_html(&p.label),
                money(p.costs),
                money(p.work_income),
                money(p.aid),
                money(p.starting_savings),
                money(p.total_income),
                money(p.balance)
            ));
        }
        html.push_str("</table>");
        html.push_str(&summary_table(self.summary));
        html.push_str("</div>");
        html
    }
}

fn summary_table(summary: &Summary) -> String {
    format!(
        "<h2>Summary</h2><table class=\"summary\">\
         <tr><td>Semesters</td><td>{}</td></tr>\
         <tr><td>Total Costs</td><td>{}</td></tr>\
         <tr><td>Total Income</td><td>{}</td></tr>\
         <tr><td>Average Cost per Period</td><td>{}</td></tr>\
         <tr><td>Average Income per Period</td><td>{}</td></tr>\
         <tr><td>Final Balance</td><td>{}</td></tr></table>",
        summary.total_semesters,
        money(summary.total_costs),
        money(summary.total_income),
        money(summary.average_cost_per_period),
        money(summary.average_income_per_period),
        money(summary.final_balance)
    )
}

#[derive(Template)]
#[template(path = "scenario.html")]
pub struct ScenarioTemplate<'a> {
    pub comparison: &'a ScenarioComparison,
    pub description: String,
}

impl<'a> ScenarioTemplate<'a> {
    pub fn fragment(&self) -> String {
        let base = &self.comparison.baseline;
        let alt = &self.comparison.outcome.summary;
        format!(
            "<div id=\"scenario-content\"><h1>Scenario: {}</h1><table>\
             <tr><th></th><th>Baseline</th><th>Scenario</th></tr>\
             <tr><td>Total Costs</td><td>{}</td><td>{}</td></tr>\
             <tr><td>Total Income</td><td>{}</td><td>{}</td></tr>\
             <tr><td>Final Balance</td><td>{}</td><td>{}</td></tr></table>\
             <p class=\"change\">Change in final balance: {}</p></div>",
            escape_html(&self.description),
            money(base.total_costs),
            money(alt.total_costs),
            money(base.total_income),
            money(alt.total_income),
            money(base.final_balance),
            money(alt.final_balance),
            money(self.comparison.balance_change())
        )
    }
}

#[derive(Template)]
#[template(path = "calculations.html")]
pub struct CalculationsTemplate<'a> {
    pub user_id: &'a str,
    pub calculations: &'a [StoredCalculation],
}

impl<'a> CalculationsTemplate<'a> {
    pub fn fragment(&self) -> String {
        let mut html = format!(
            "<div id=\"calculations\"><h1>Saved calculations for {}</h1>",
            escape_html(self.user_id)
        );
        if self.calculations.is_empty() {
            html.push_str("<p>No saved calculations</p>");
        } else {
            html.push_str("<ul>");
            for c in self.calculations {
                html.push_str(&format!(
                    "<li id=\"calc-{id}\">#{id} {} - {} semester(s), final balance {} \
                     <button hx-delete=\"/calculations/{id}\" hx-target=\"#calc-{id}\" \
                     hx-swap=\"outerHTML\">Delete</button></li>",
                    c.created_at.format("%Y-%m-%d %H:%M"),
                    escape_html(&c.snapshot.inputs.remaining_semesters),
                    money(c.snapshot.projected_balance),
                    id = c.id,
                ));
            }
            html.push_str("</ul>");
        }
        html.push_str("</div>");
        html
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub message: &'a str,
    pub status: u16,
}

impl<'a> ErrorTemplate<'a> {
    pub fn fragment(&self) -> String {
        format!(
            "<div id=\"error\" class=\"error\"><h1>Error {}</h1><p>{}</p></div>",
            self.status,
            escape_html(self.message)
        )
    }
}
