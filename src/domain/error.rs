//! Domain error types.
//!
//! The projection engine itself never fails; these cover the layers around
//! it (config, validation, storage, reporting).

/// Top-level error type for budgetly.
#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid input {field}: {reason}")]
    InputInvalid { field: String, reason: String },

    #[error("unknown scenario kind: {kind}")]
    UnknownScenario { kind: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BudgetError {
    pub fn input(field: &str, reason: impl Into<String>) -> Self {
        BudgetError::InputInvalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        BudgetError::Report {
            reason: err.to_string(),
        }
    }
}

impl BudgetError {
    /// Process exit status reported by the CLI for this error.
    pub fn exit_status(&self) -> u8 {
        match self {
            BudgetError::Io(_) | BudgetError::Report { .. } => 1,
            BudgetError::ConfigParse { .. }
            | BudgetError::ConfigMissing { .. }
            | BudgetError::ConfigInvalid { .. } => 2,
            BudgetError::Database { .. } | BudgetError::DatabaseQuery { .. } => 3,
            BudgetError::InputInvalid { .. } | BudgetError::UnknownScenario { .. } => 4,
            BudgetError::NotFound { .. } => 5,
        }
    }
}

impl From<&BudgetError> for std::process::ExitCode {
    fn from(err: &BudgetError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
