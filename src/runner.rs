use std::io;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::NodeConfig;
use crate::error::SeqiahrError;
use crate::log::{apply_directives, info, set_log_level, Directive, LevelFilter};
use crate::model::ModelRegistry;
use crate::node::{run_node, NodeSeries};
use crate::report::StepReport;

/// Runs a single SEQIAHR node and reports every step as CSV
#[derive(Parser, Debug)]
#[command(name = "seqiahr", version)]
pub struct RunnerArgs {
    /// Path to the JSON node configuration
    #[arg(short, long)]
    pub config: PathBuf,

    /// Number of steps to run, overriding the configuration
    #[arg(short, long)]
    pub steps: Option<u32>,

    /// Write the report to this CSV file instead of standard output
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Replace the report file if it already exists
    #[arg(long)]
    pub overwrite: bool,

    /// Registered model to run, overriding the configuration
    #[arg(short, long)]
    pub model: Option<String>,

    /// Stop with an error as soon as a compartment turns negative or non-finite
    #[arg(long, conflicts_with = "model")]
    pub strict: bool,

    /// Global log level, or comma separated `module=level` filters
    #[arg(long)]
    pub log_level: Option<String>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, action = ArgAction::Count)]
    pub verbose: u8,
}

/// The global level `-v` asks for, if any.
fn verbosity_level(verbose: u8) -> Option<LevelFilter> {
    match verbose {
        0 => None,
        1 => Some(LevelFilter::Info),
        2 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    }
}

/// Applies `-v` counts, then a `--log-level` directive string such as `info` or
/// `seqiahr::step=trace,seqiahr::node=debug`.
///
/// # Errors
///
/// Returns an error if a directive is malformed.
pub fn configure_logging(log_level: Option<&str>, verbose: u8) -> Result<(), SeqiahrError> {
    if let Some(level) = verbosity_level(verbose) {
        set_log_level(level);
    }
    let Some(spec) = log_level else {
        return Ok(());
    };
    for directive in apply_directives(spec)? {
        match directive {
            Directive::Global(level) => info!("Logging enabled at level {}", level),
            Directive::Module(module, level) => {
                info!("Logging enabled for {} at level {}", module, level);
            }
        }
    }
    Ok(())
}

/// Parses the command line, runs the configured node, and writes its report.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the model is unknown or
/// rejects a step, or the report cannot be written.
pub fn run_with_args() -> Result<NodeSeries, SeqiahrError> {
    run_with_args_internal(RunnerArgs::parse())
}

pub(crate) fn run_with_args_internal(args: RunnerArgs) -> Result<NodeSeries, SeqiahrError> {
    configure_logging(args.log_level.as_deref(), args.verbose)?;

    let mut config = NodeConfig::load(&args.config)?;
    if let Some(steps) = args.steps {
        config.steps = steps;
    }

    let name = if args.strict {
        "seqiahr-strict".to_string()
    } else {
        args.model.unwrap_or_else(|| config.model.clone())
    };
    let registry = ModelRegistry::with_builtin();
    let model = registry.create(&name)?;
    let node = run_node(model.as_ref(), &config)?;

    match &args.output {
        Some(path) => {
            info!("Writing report to {}", path.display());
            StepReport::create(path, args.overwrite)?.write_series(&node)?;
        }
        None => StepReport::from_writer(io::stdout().lock()).write_series(&node)?,
    }
    Ok(node)
}
