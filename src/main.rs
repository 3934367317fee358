//! gpucheck command-line entry point.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use gpucheck::collector::{Prober, SystemCommandRunner};
use gpucheck::config::{RunSettings, DEFAULT_CONFIG_PATH, DEFAULT_REPORT_PATH, DEFAULT_TOOL_TIMEOUT_SECS};
use gpucheck::{pipeline, report};

#[derive(Parser)]
#[command(name = "gpucheck", version, about = "Validate installed GPUs against a golden hardware profile")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe this host, validate it and write the report
    Run(RunArgs),
    /// Show version information
    Version,
}

#[derive(Args)]
struct RunArgs {
    /// Golden profile document (YAML, keyed by system model)
    #[arg(long, env = "GPUCHECK_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Where the validation report is written
    #[arg(long, env = "GPUCHECK_REPORT", default_value = DEFAULT_REPORT_PATH)]
    report: PathBuf,

    /// Seconds each inventory tool may run before it is killed
    #[arg(long, env = "GPUCHECK_TOOL_TIMEOUT", default_value_t = DEFAULT_TOOL_TIMEOUT_SECS)]
    tool_timeout: u64,

    /// Enable debug logging
    #[arg(long)]
    verbose: bool,

    /// Skip the console summary
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_cmd(args),
        Commands::Version => {
            println!("gpucheck v{}", report::ENGINE_VERSION);
            ExitCode::SUCCESS
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_cmd(args: RunArgs) -> ExitCode {
    init_logging(args.verbose);

    let settings = RunSettings {
        config_path: args.config,
        report_path: args.report,
        tool_timeout: Duration::from_secs(args.tool_timeout),
    };

    let prober = Prober::new(SystemCommandRunner::new(settings.tool_timeout));
    let report = match pipeline::run(&settings, &prober) {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "no usable report was produced");
            return ExitCode::FAILURE;
        }
    };

    if !args.quiet {
        println!("{}", report::text::generate(&report, &settings.report_path.display().to_string()));
    }

    ExitCode::from(report.exit_code())
}
