//! The `gseim_solver` binary.
//!
//! Batch contract: read one scenario file, simulate, write the result
//! artifact next to the input, print `Program completed.` on stdout, exit 0.
//! Any failure suppresses the marker, leaves no partial artifact, and maps
//! onto a classified non-zero exit code.

mod config;
mod error;
mod output;
mod stamper;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use gseim_parser::Method;
use gseim_solver::{ConvergenceCriteria, IntegrationMethod, TransientParams, solve_transient};

use config::SolverDefaults;
use error::RunError;
use stamper::{CircuitStamper, build_reactive_state};

#[derive(Parser)]
#[command(name = "gseim_solver")]
#[command(about = "GSEIM batch circuit solver", long_about = None)]
#[command(version)]
struct Cli {
    /// Input scenario file (.in)
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Newton defaults file (bypasses the $GSEIM_HOME/$HOME lookup)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose progress on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.use_stderr() {
                eprint!("{err}");
                return ExitCode::from(1);
            }
            // --help / --version
            print!("{err}");
            return ExitCode::SUCCESS;
        }
    };

    match run(&cli) {
        Ok(()) => {
            println!("Program completed.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("gseim_solver: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: &Cli) -> Result<(), RunError> {
    let content = fs::read_to_string(&cli.input).map_err(|source| RunError::Input {
        path: cli.input.clone(),
        source,
    })?;

    let scenario = gseim_parser::parse(&content).map_err(|source| RunError::Parse {
        path: cli.input.clone(),
        source,
    })?;

    if cli.verbose {
        eprintln!(
            "circuit: {}",
            scenario.circuit.title().unwrap_or("(untitled)")
        );
        eprintln!("nodes: {}", scenario.circuit.num_nodes());
        eprintln!("elements: {}", scenario.circuit.num_devices());
    }

    let defaults = SolverDefaults::load(cli.config.as_deref())?;
    let mut criteria = ConvergenceCriteria::default();
    defaults.apply(&mut criteria);
    // Scenario-file settings win over user defaults.
    if let Some(itmax) = scenario.solve.itmax {
        criteria.max_iterations = itmax;
    }
    if let Some(vtol) = scenario.solve.vtol {
        criteria.v_abstol = vtol;
    }
    if let Some(itol) = scenario.solve.itol {
        criteria.i_abstol = itol;
    }

    let params = TransientParams {
        t_start: scenario.solve.t_start,
        t_end: scenario.solve.t_end,
        t_step: scenario.solve.t_step,
        method: match scenario.solve.method {
            Method::BackwardEuler => IntegrationMethod::BackwardEuler,
            Method::Trapezoidal => IntegrationMethod::Trapezoidal,
        },
    };

    let stamper = CircuitStamper {
        circuit: &scenario.circuit,
    };
    let (mut caps, mut inds) = build_reactive_state(&scenario.circuit);
    let result = solve_transient(&stamper, &mut caps, &mut inds, &params, &criteria)?;

    let dat = output::artifact_path(&cli.input);
    output::write_artifact(&dat, &scenario.outputs, &result).map_err(|source| {
        RunError::Output {
            path: dat.clone(),
            source,
        }
    })?;

    if cli.verbose {
        eprintln!("wrote {} rows to {}", result.points.len(), dat.display());
    }

    Ok(())
}
