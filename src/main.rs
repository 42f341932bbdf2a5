use clap::Parser;
use budgetly::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    env_logger::init();
    run(Cli::parse())
}
