//! Reduce the epsilon raster of a calibration pass to the betas worth
//! simulating next, and write the script that launches them.
//
//  Run:  `cargo run --release -- <configuration> <gis> <tolerance> <step> <username>`

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use env_logger::Env;
use epsilon_reduce::pipeline::{run, Outcome, RunOptions};
use epsilon_reduce::ReduceError;

/// Positional arguments after the program name.
const ARG_COUNT: usize = 5;

#[derive(Parser, Debug)]
#[command(
    name = "reduce_epsilons",
    about = "Prepare the next calibration pass from the cells whose epsilon exceeds a tolerance"
)]
struct Cli {
    /// The configuration file to be loaded
    configuration: PathBuf,

    /// The directory that GIS files can be found in
    gis: PathBuf,

    /// Float, maximum epsilon
    #[arg(allow_negative_numbers = true)]
    tolerance: f64,

    /// Float, increment +/- 10x around known beta (maximum 0.00001).
    /// Betas are kept to four decimals, so steps below 0.00005 yield a
    /// single candidate
    #[arg(allow_negative_numbers = true)]
    step: f64,

    /// The user who will be running the calibration on the cluster
    username: String,
}

fn try_main(cli: Cli) -> anyhow::Result<Outcome> {
    let options = RunOptions {
        configuration: cli.configuration,
        gis: cli.gis,
        tolerance: cli.tolerance,
        step: cli.step,
        username: cli.username,
    };
    run(&options).with_context(|| format!("reducing epsilons with {}", options.configuration.display()))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    // Wrong argument count: show usage, no side effects.
    if std::env::args_os().count() != ARG_COUNT + 1 {
        println!("{}", Cli::command().render_help());
        return ExitCode::SUCCESS;
    }
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };

    match try_main(cli) {
        Ok(Outcome::NothingToReduce) => {
            println!("Nothing to reduce!");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Written { records, results, script }) => {
            println!(
                "Reduction complete → {} candidates in {}, launcher {}",
                records,
                results.display(),
                script.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            match err.downcast_ref::<ReduceError>() {
                Some(range) if range.is_parameter_range() => println!("{range}"),
                _ => log::error!("{err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
