//! CSV export of a projection.
//!
//! One row per period followed by a `Summary` section of label/value rows.
//! Amounts are written with two decimals and no currency symbol.

use std::fs;
use std::path::Path;

use crate::domain::error::BudgetError;
use crate::domain::projection::PeriodRecord;
use crate::domain::summary::Summary;
use crate::ports::report_port::ReportPort;

pub const CSV_HEADER: [&str; 7] = [
    "Period",
    "Costs",
    "Work Income",
    "Financial Aid",
    "Savings",
    "Total Income",
    "Running Balance",
];

pub struct CsvReportAdapter;

fn money(amount: f64) -> String {
    format!("{amount:.2}")
}

/// Render the export into memory.
pub fn render_csv(periods: &[PeriodRecord], summary: &Summary) -> Result<String, BudgetError> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    wtr.write_record(CSV_HEADER)?;
    for p in periods {
        wtr.write_record([
            p.label.clone(),
            money(p.costs),
            money(p.work_income),
            money(p.aid),
            money(p.starting_savings),
            money(p.total_income),
            money(p.balance),
        ])?;
    }

    wtr.write_record(["Summary"])?;
    wtr.write_record(["Total Semesters".to_string(), summary.total_semesters.to_string()])?;
    wtr.write_record(["Total Costs".to_string(), money(summary.total_costs)])?;
    wtr.write_record(["Total Income".to_string(), money(summary.total_income)])?;
    wtr.write_record(["Final Balance".to_string(), money(summary.final_balance)])?;

    let bytes = wtr.into_inner().map_err(|e| BudgetError::Report {
        reason: e.to_string(),
    })?;
    String::from_utf8(bytes).map_err(|e| BudgetError::Report {
        reason: e.to_string(),
    })
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        periods: &[PeriodRecord],
        summary: &Summary,
        output_path: &Path,
    ) -> Result<(), BudgetError> {
        let content = render_csv(periods, summary)?;
        fs::write(output_path, content)?;
        log::info!(
            "wrote {} period(s) to {}",
            periods.len(),
            output_path.display()
        );
        Ok(())
    }
}
