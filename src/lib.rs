//! budgetly: semester-by-semester cash-flow projection for students.
//!
//! Hexagonal architecture: the projection engine and its surrounding rules in
//! [`domain`], port traits in [`ports`], concrete implementations (INI config,
//! SQLite store, CSV export, web server) in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
