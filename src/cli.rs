//! CLI definition and dispatch.

use chrono::{Local, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::BudgetError;
use crate::domain::impact::{BalanceImpact, ImpactEstimate, OneTimeEvent};
use crate::domain::inputs::{FinancialInputs, INPUT_FIELDS};
use crate::domain::projection::{
    DEFAULT_INFLATION_RATE, DEFAULT_TAX_RATE, PeriodRecord, ProjectionConfig, compute_sequence,
};
use crate::domain::record::{CalculationSnapshot, ScenarioDraft};
use crate::domain::scenario::{ScenarioComparison, ScenarioKind};
use crate::domain::summary::Summary;
use crate::domain::validation::{validate_inputs, validate_projection_config};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;
use crate::ports::store_port::CalculationStore;

#[derive(Parser, Debug)]
#[command(name = "budgetly", about = "Semester cash-flow projection for students")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Project semester cash flow from the [inputs] section
    Project {
        #[arg(short, long)]
        config: PathBuf,
        /// Date the projection starts from (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Apply the flat income tax regardless of [projection] apply_tax
        #[arg(long)]
        tax: bool,
        /// Write the projection as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate inputs and projection settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Compare the baseline against one what-if scenario
    Scenario {
        #[arg(short, long)]
        config: PathBuf,
        /// tuition-increase, more-summer-hours, higher-rent or more-scholarship
        #[arg(long)]
        kind: String,
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Estimate the balance impact of monthly changes and a one-time event
    Impact {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        income_change: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        expense_change: f64,
        #[arg(long)]
        event_amount: Option<f64>,
        /// income or expense
        #[arg(long, default_value = "expense")]
        event_effect: String,
        #[arg(long)]
        event_name: Option<String>,
        /// Period label the event falls in, e.g. "Summer 2027"
        #[arg(long)]
        event_period: Option<String>,
        #[arg(long)]
        as_of: Option<NaiveDate>,
        /// Store the estimate as a saved scenario
        #[arg(long, requires_all = ["user", "name"])]
        save: bool,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Project and store the result for a user
    Save {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        user: String,
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// List stored calculations and scenarios for a user
    History {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        user: String,
    },
    /// Delete a stored calculation (or scenario with --scenario)
    Delete {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        id: i64,
        #[arg(long)]
        scenario: bool,
    },
    /// Start the web server
    Serve {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Project {
            config,
            as_of,
            tax,
            output,
        } => run_project(&config, as_of, tax, output.as_ref()),
        Command::Validate { config } => run_validate(&config),
        Command::Scenario {
            config,
            kind,
            value,
            as_of,
        } => run_scenario(&config, &kind, value, as_of),
        Command::Impact {
            config,
            income_change,
            expense_change,
            event_amount,
            event_effect,
            event_name,
            event_period,
            as_of,
            save,
            user,
            name,
        } => {
            let request = ImpactRequest {
                income_change,
                expense_change,
                event_amount,
                event_effect,
                event_name,
                event_period,
            };
            let save_as = match (save, user, name) {
                (true, Some(user), Some(name)) => Some((user, name)),
                _ => None,
            };
            run_impact(&config, &request, as_of, save_as)
        }
        Command::Save {
            config,
            user,
            as_of,
        } => run_save(&config, &user, as_of),
        Command::History { config, user } => run_history(&config, &user),
        Command::Delete {
            config,
            id,
            scenario,
        } => run_delete(&config, id, scenario),
        Command::Serve { config } => run_serve(&config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, BudgetError> {
    eprintln!("Loading config from {}", path.display());
    FileConfigAdapter::from_file(path)
}

/// Read the `[inputs]` section. Missing keys stay blank.
pub fn build_inputs(config: &dyn ConfigPort) -> FinancialInputs {
    let mut inputs = FinancialInputs::default();
    for name in INPUT_FIELDS {
        if let (Some(value), Some(slot)) = (config.get_string("inputs", name), inputs.field_mut(name))
        {
            *slot = value;
        }
    }
    inputs
}

/// Read the `[projection]` section, falling back to the engine defaults.
pub fn build_projection_config(config: &dyn ConfigPort) -> ProjectionConfig {
    ProjectionConfig {
        apply_tax: config.get_bool("projection", "apply_tax", false),
        tax_rate: config.get_double("projection", "tax_rate", DEFAULT_TAX_RATE),
        apply_inflation: config.get_bool("projection", "apply_inflation", false),
        inflation_rate: config.get_double("projection", "inflation_rate", DEFAULT_INFLATION_RATE),
    }
}

/// The projection start date: `--as-of` when given, otherwise the local date.
pub fn resolve_today(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Local::now().date_naive())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Validate, then project. Returns the periods and their summary.
pub fn run_projection_pipeline(
    inputs: &FinancialInputs,
    config: &ProjectionConfig,
    today: NaiveDate,
) -> Result<(Vec<PeriodRecord>, Summary), BudgetError> {
    validate_inputs(inputs)?;
    let periods = compute_sequence(inputs, config, today);
    let summary = Summary::compute(&periods);
    Ok((periods, summary))
}

/// Raw impact arguments as given on the command line or a form.
#[derive(Debug, Clone, Default)]
pub struct ImpactRequest {
    pub income_change: f64,
    pub expense_change: f64,
    pub event_amount: Option<f64>,
    pub event_effect: String,
    pub event_name: Option<String>,
    pub event_period: Option<String>,
}

pub fn build_impact(request: &ImpactRequest) -> Result<BalanceImpact, BudgetError> {
    if !request.income_change.is_finite() {
        return Err(BudgetError::input("income_change", "must be a finite number"));
    }
    if !request.expense_change.is_finite() {
        return Err(BudgetError::input("expense_change", "must be a finite number"));
    }

    let event = match request.event_amount {
        Some(amount) => Some(OneTimeEvent {
            name: request
                .event_name
                .clone()
                .unwrap_or_else(|| "One-time event".to_string()),
            amount,
            effect: request.event_effect.parse()?,
            period: request.event_period.clone().unwrap_or_default(),
        }),
        None => None,
    };

    Ok(BalanceImpact {
        monthly_income_change: request.income_change,
        monthly_expense_change: request.expense_change,
        event,
    })
}

/// Project and store a snapshot for `user_id`. Returns the stored id.
pub fn save_projection(
    store: &dyn CalculationStore,
    user_id: &str,
    inputs: &FinancialInputs,
    config: &ProjectionConfig,
    today: NaiveDate,
    created_at: NaiveDateTime,
) -> Result<i64, BudgetError> {
    if user_id.trim().is_empty() {
        return Err(BudgetError::input("user", "must not be empty"));
    }
    let (periods, _) = run_projection_pipeline(inputs, config, today)?;
    let snapshot = CalculationSnapshot::new(user_id, inputs.clone(), *config, periods);
    store.save_calculation(&snapshot, created_at)
}

/// Fixed-width text table of the projection followed by the summary.
pub fn format_projection(periods: &[PeriodRecord], summary: &Summary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11}\n",
        "Period", "Costs", "Work", "Aid", "Savings", "Income", "Balance"
    ));
    for p in periods {
        out.push_str(&format!(
            "{:<12} {:>11.2} {:>11.2} {:>11.2} {:>11.2} {:>11.2} {:>11.2}{}\n",
            p.label,
            p.costs,
            p.work_income,
            p.aid,
            p.starting_savings,
            p.total_income,
            p.balance,
            if p.is_surplus { "" } else { "  deficit" }
        ));
    }
    out.push('\n');
    out.push_str(&format!("Semesters:          {}\n", summary.total_semesters));
    out.push_str(&format!("Periods:            {}\n", summary.total_periods));
    out.push_str(&format!("Total costs:        {:.2}\n", summary.total_costs));
    out.push_str(&format!("Total income:       {:.2}\n", summary.total_income));
    out.push_str(&format!("Avg cost/period:    {:.2}\n", summary.average_cost_per_period));
    out.push_str(&format!("Avg income/period:  {:.2}\n", summary.average_income_per_period));
    out.push_str(&format!("Final balance:      {:.2}\n", summary.final_balance));
    out
}

/// Validated inputs and settings from a config file.
fn load_projection(
    path: &PathBuf,
) -> Result<(FileConfigAdapter, FinancialInputs, ProjectionConfig), BudgetError> {
    let adapter = load_config(path)?;
    validate_projection_config(&adapter)?;
    let inputs = build_inputs(&adapter);
    let config = build_projection_config(&adapter);
    Ok((adapter, inputs, config))
}

fn run_project(
    config_path: &PathBuf,
    as_of: Option<NaiveDate>,
    tax: bool,
    output: Option<&PathBuf>,
) -> Result<ExitCode, BudgetError> {
    let (_, inputs, mut config) = load_projection(config_path)?;
    if tax {
        config.apply_tax = true;
    }
    let today = resolve_today(as_of);
    let (periods, summary) = run_projection_pipeline(&inputs, &config, today)?;

    print!("{}", format_projection(&periods, &summary));

    if let Some(path) = output {
        CsvReportAdapter.write(&periods, &summary, path)?;
        eprintln!("CSV written to {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_validate(config_path: &PathBuf) -> Result<ExitCode, BudgetError> {
    let (_, inputs, _) = load_projection(config_path)?;
    validate_inputs(&inputs)?;
    eprintln!("Inputs and projection settings are valid.");
    Ok(ExitCode::SUCCESS)
}

fn run_scenario(
    config_path: &PathBuf,
    kind: &str,
    value: f64,
    as_of: Option<NaiveDate>,
) -> Result<ExitCode, BudgetError> {
    let scenario = kind.parse::<ScenarioKind>()?.with_value(value);
    let (_, inputs, config) = load_projection(config_path)?;
    validate_inputs(&inputs)?;

    let cmp = ScenarioComparison::between(&inputs, &scenario, &config, resolve_today(as_of));

    println!("Scenario: {scenario}");
    println!("{:<16} {:>12} {:>12}", "", "Baseline", "Scenario");
    println!(
        "{:<16} {:>12.2} {:>12.2}",
        "Total costs", cmp.baseline.total_costs, cmp.outcome.summary.total_costs
    );
    println!(
        "{:<16} {:>12.2} {:>12.2}",
        "Total income", cmp.baseline.total_income, cmp.outcome.summary.total_income
    );
    println!(
        "{:<16} {:>12.2} {:>12.2}",
        "Final balance", cmp.baseline.final_balance, cmp.outcome.summary.final_balance
    );
    println!("Change in final balance: {:+.2}", cmp.balance_change());
    Ok(ExitCode::SUCCESS)
}

fn print_estimate(estimate: &ImpactEstimate) {
    println!("Current projected balance: {:.2}", estimate.base_balance);
    println!("Horizon:                   {} months", estimate.horizon_months);
    println!("Projected balance:         {:.2}", estimate.projected_balance);
    println!("{}", estimate.status);
}

fn run_impact(
    config_path: &PathBuf,
    request: &ImpactRequest,
    as_of: Option<NaiveDate>,
    save_as: Option<(String, String)>,
) -> Result<ExitCode, BudgetError> {
    let impact = build_impact(request)?;
    let (adapter, inputs, config) = load_projection(config_path)?;
    let (periods, _) = run_projection_pipeline(&inputs, &config, resolve_today(as_of))?;

    let estimate = impact.estimate(&periods);
    print_estimate(&estimate);

    if let Some((user, name)) = save_as {
        let store = open_store(&adapter)?;
        let draft = ScenarioDraft::from_impact(&user, &name, &impact, estimate.projected_balance);
        let id = store.save_scenario(&draft, now())?;
        eprintln!("Saved scenario '{name}' as #{id}");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_save(
    config_path: &PathBuf,
    user: &str,
    as_of: Option<NaiveDate>,
) -> Result<ExitCode, BudgetError> {
    let (adapter, inputs, config) = load_projection(config_path)?;
    let store = open_store(&adapter)?;
    let id = save_projection(&*store, user, &inputs, &config, resolve_today(as_of), now())?;
    eprintln!("Saved calculation #{id} for {user}");
    Ok(ExitCode::SUCCESS)
}

fn run_history(config_path: &PathBuf, user: &str) -> Result<ExitCode, BudgetError> {
    let adapter = load_config(config_path)?;
    let store = open_store(&adapter)?;

    let calculations = store.user_calculations(user)?;
    println!("Calculations for {user}: {}", calculations.len());
    for calc in &calculations {
        println!(
            "  #{:<5} {}  {} semester(s)  final balance {:.2}",
            calc.id,
            calc.created_at.format("%Y-%m-%d %H:%M"),
            calc.snapshot.inputs.remaining_semesters,
            calc.snapshot.projected_balance
        );
    }

    let scenarios = store.user_scenarios(user)?;
    println!("Scenarios for {user}: {}", scenarios.len());
    for saved in &scenarios {
        println!(
            "  #{:<5} {}  {}  projected {:.2}",
            saved.id,
            saved.created_at.format("%Y-%m-%d %H:%M"),
            saved.draft.name,
            saved.draft.projected_balance
        );
    }
    Ok(ExitCode::SUCCESS)
}

fn run_delete(config_path: &PathBuf, id: i64, scenario: bool) -> Result<ExitCode, BudgetError> {
    let adapter = load_config(config_path)?;
    let store = open_store(&adapter)?;

    let (removed, what) = if scenario {
        (store.delete_scenario(id)?, "scenario")
    } else {
        (store.delete_calculation(id)?, "calculation")
    };
    if !removed {
        return Err(BudgetError::NotFound {
            what: format!("{what} #{id}"),
        });
    }
    eprintln!("Deleted {what} #{id}");
    Ok(ExitCode::SUCCESS)
}

/// Open the configured store and make sure its tables exist.
#[cfg(feature = "sqlite")]
pub fn open_store(
    config: &dyn ConfigPort,
) -> Result<Box<dyn CalculationStore + Send + Sync>, BudgetError> {
    use crate::adapters::sqlite_adapter::SqliteAdapter;

    let store = SqliteAdapter::from_config(config)?;
    store.initialize_schema()?;
    Ok(Box::new(store))
}

#[cfg(not(feature = "sqlite"))]
pub fn open_store(
    _config: &dyn ConfigPort,
) -> Result<Box<dyn CalculationStore + Send + Sync>, BudgetError> {
    Err(BudgetError::Database {
        reason: "sqlite feature is required for stored calculations".to_string(),
    })
}

fn run_serve(config_path: &PathBuf) -> Result<ExitCode, BudgetError> {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{AppState, build_router};
        use std::net::SocketAddr;
        use std::sync::Arc;

        let adapter = load_config(config_path)?;
        validate_projection_config(&adapter)?;
        let store: Arc<dyn CalculationStore + Send + Sync> = Arc::from(open_store(&adapter)?);

        let listen = adapter
            .get_string("web", "listen")
            .unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let addr: SocketAddr = listen.parse().map_err(|_| BudgetError::ConfigInvalid {
            section: "web".to_string(),
            key: "listen".to_string(),
            reason: format!("'{listen}' is not a socket address"),
        })?;

        let state = AppState {
            store,
            config: build_projection_config(&adapter),
            today: Arc::new(|| Local::now().date_naive()),
        };
        let router = build_router(state);

        eprintln!("Starting web server on {addr}");
        let runtime = tokio::runtime::Runtime::new()?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        })?;

        Ok(ExitCode::SUCCESS)
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = config_path;
        eprintln!("error: web feature is required for serve");
        Ok(ExitCode::from(1))
    }
}
