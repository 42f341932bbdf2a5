//! Report generation port.

use std::path::Path;

use crate::domain::error::BudgetError;
use crate::domain::projection::PeriodRecord;
use crate::domain::summary::Summary;

/// Port for exporting a projection.
pub trait ReportPort {
    fn write(
        &self,
        periods: &[PeriodRecord],
        summary: &Summary,
        output_path: &Path,
    ) -> Result<(), BudgetError>;
}
