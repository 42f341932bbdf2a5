//! Concrete adapter implementations for ports.

#[cfg(feature = "web")]
pub mod chart_svg;
pub mod csv_report_adapter;
pub mod file_config_adapter;
#[cfg(feature = "sqlite")]
pub mod sqlite_adapter;
#[cfg(feature = "web")]
pub mod web;
