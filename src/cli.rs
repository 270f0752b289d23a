//! CLI definition and dispatch.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::console_report::write_summary;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::map_config_adapter::{LayeredConfig, MapConfigAdapter};
use crate::adapters::prompt_adapter::PromptAdapter;
use crate::adapters::svg_report_adapter::SvgReportAdapter;
use crate::adapters::typst_report::TypstReportAdapter;
use crate::domain::config_validation::{build_run_config, SECTION};
use crate::domain::error::DcaError;
use crate::domain::pipeline::{self, RunReport};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::PriceDataPort;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_OUTPUT: &str = "dca_report.svg";
pub const DEFAULT_CSV_DIR: &str = "data";

#[derive(Parser, Debug)]
#[command(name = "dcasim", about = "Dollar-cost averaging simulator")]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Csv,
    Yahoo,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Simulate monthly, weekly and custom DCA plans
    Simulate {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        ticker: Option<String>,
        /// Weekly base contribution
        #[arg(short, long)]
        amount: Option<f64>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Custom cadence, e.g. 2W or 3M
        #[arg(long)]
        custom: Option<String>,
        /// Invest the base amount on every cadence instead of scaling it
        #[arg(long)]
        no_normalize: bool,
        /// Day step for the flat tail that aligns charts to the end date
        #[arg(long)]
        step_days: Option<u32>,
        #[arg(long, value_enum)]
        source: Option<Source>,
        /// Directory holding <TICKER>.csv files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Report path; `.svg` writes a chart, anything else a Typst report
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Prompt for any run parameter not given by flags or config
        #[arg(short, long)]
        interactive: bool,
    },
    /// Validate a run configuration without fetching data
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the verbosity flag.
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    init_tracing(cli.verbose);

    match cli.command {
        Command::Simulate {
            config,
            ticker,
            amount,
            start,
            end,
            custom,
            no_normalize,
            step_days,
            source,
            data_dir,
            output,
            interactive,
        } => {
            let mut flags = MapConfigAdapter::new();
            flags.set_opt(SECTION, "ticker", ticker);
            flags.set_opt(SECTION, "amount", amount.map(|a| a.to_string()));
            flags.set_opt(SECTION, "start_date", start);
            flags.set_opt(SECTION, "end_date", end);
            flags.set_opt(SECTION, "custom_interval", custom);
            if no_normalize {
                flags.set(SECTION, "normalize", "false");
            }
            flags.set_opt(SECTION, "extend_step_days", step_days.map(|s| s.to_string()));
            flags.set_opt(
                "data",
                "source",
                source.map(|s| match s {
                    Source::Csv => "csv",
                    Source::Yahoo => "yahoo",
                }),
            );
            flags.set_opt("data", "csv_dir", data_dir.map(|p| p.display().to_string()));
            flags.set_opt("report", "output", output.map(|p| p.display().to_string()));

            run_simulate(config.as_ref(), &flags, interactive)
        }
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = DcaError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn run_simulate(config_path: Option<&PathBuf>, flags: &MapConfigAdapter, interactive: bool) -> ExitCode {
    // Stage 1: Load config file, if any
    let file = match config_path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            match load_config(path) {
                Ok(f) => Some(f),
                Err(code) => return code,
            }
        }
        None => None,
    };
    let empty = MapConfigAdapter::new();
    let file_layer: &dyn ConfigPort = match &file {
        Some(f) => f,
        None => &empty,
    };

    // Stage 2: Prompt for anything still missing
    let answers = if interactive {
        let known = LayeredConfig::new().push(flags).push(file_layer);
        let stdin = io::stdin();
        match PromptAdapter::new(stdin.lock(), io::stdout()).collect_missing(&known) {
            Ok(a) => a,
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    } else {
        MapConfigAdapter::new()
    };
    let config = LayeredConfig::new()
        .push(flags)
        .push(file_layer)
        .push(&answers);

    // Stage 3: Validate and build the run
    let run_config = match build_run_config(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 4: Data source
    let data_port = match build_data_port(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 5: Simulate
    let report = match pipeline::run(data_port.as_ref(), &run_config) {
        Ok(r) => r,
        Err(e @ DcaError::NoData { .. }) => {
            println!("{e}");
            return (&e).into();
        }
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    // Stage 6: Console summary
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = write_summary(&mut out, &report).and_then(|_| out.flush()) {
        eprintln!("error: failed to print summary: {e}");
        return ExitCode::from(1);
    }

    // Stage 7: Chart / report
    let output = config
        .get_string("report", "output")
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let template_path = config.get_string("report", "template_path");
    if let Err(e) = write_report(&report, &output, template_path.as_deref()) {
        eprintln!("error: failed to write report: {e}");
        return (&e).into();
    }

    exit_code_for(&report)
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn PriceDataPort>, DcaError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "csv".to_string())
        .to_lowercase();

    match source.as_str() {
        "csv" => {
            let dir = config
                .get_string("data", "csv_dir")
                .unwrap_or_else(|| DEFAULT_CSV_DIR.to_string());
            tracing::debug!(dir = %dir, "using CSV price data");
            Ok(Box::new(CsvAdapter::new(PathBuf::from(dir))))
        }
        #[cfg(feature = "yahoo")]
        "yahoo" => Ok(Box::new(
            crate::adapters::yahoo_adapter::YahooAdapter::new()?,
        )),
        #[cfg(not(feature = "yahoo"))]
        "yahoo" => Err(DcaError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: "yahoo feature is required for source = yahoo".into(),
        }),
        other => Err(DcaError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("unknown source '{}', expected csv or yahoo", other),
        }),
    }
}

/// Pick the report writer from the output extension.
pub fn report_adapter(output: &str, template_path: Option<&str>) -> Result<Box<dyn ReportPort>, DcaError> {
    let is_svg = Path::new(output)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        return Ok(Box::new(SvgReportAdapter::new()));
    }
    match template_path {
        Some(path) => Ok(Box::new(TypstReportAdapter::from_template_file(path)?)),
        None => Ok(Box::new(TypstReportAdapter::new())),
    }
}

pub fn write_report(report: &RunReport, output: &str, template_path: Option<&str>) -> Result<(), DcaError> {
    if report.completed().next().is_none() {
        tracing::warn!("every cadence failed; no report written");
        return Ok(());
    }
    report_adapter(output, template_path)?.write(report, output)?;
    tracing::info!("Report written to: {}", output);
    Ok(())
}

/// Success when at least one cadence completed.
pub fn exit_code_for(report: &RunReport) -> ExitCode {
    if report.completed().next().is_some() {
        return ExitCode::SUCCESS;
    }
    report
        .failed()
        .next()
        .map(|(_, e)| ExitCode::from(e))
        .unwrap_or(ExitCode::SUCCESS)
}

fn run_validate(config_path: &Path) -> ExitCode {
    tracing::info!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let run_config = match build_run_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Err(e) = build_data_port(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    eprintln!("Ticker:    {}", run_config.ticker);
    eprintln!("Period:    {} to {}", run_config.start_date, run_config.end_date);
    eprintln!("Base:      ${:.2} per week", run_config.base_amount);
    for cadence in run_config.cadences() {
        match run_config.contribution_for(&cadence) {
            Ok(amount) => eprintln!("  {:<10} ${:.2} per contribution", cadence.label(), amount),
            Err(e) => {
                eprintln!("error: {e}");
                return (&e).into();
            }
        }
    }
    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}
