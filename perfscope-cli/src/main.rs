//! perfscope CLI — analyse and compare performance sample files.
//!
//! Commands:
//! - `analyze` — full metrics, intervals and advisories for one file
//! - `compare` — per-file records, pooled record and quality distribution
//! - `policy` — print the default configuration as TOML

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use perfscope_runner::{
    analyze_file, compare_files, export_analysis_csv, export_analysis_json, export_csv,
    export_json, AnalysisConfig, ReportStyle, SampleKind,
};
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "perfscope",
    version,
    about = "perfscope — volume-adaptive statistics for performance samples"
)]
struct Cli {
    /// Log level. RUST_LOG takes precedence.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a single sample file.
    Analyze {
        /// File with one value per line, or process-table monitor output.
        file: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },
    /// Compare several sample files and their pooled samples.
    Compare {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        options: RunOptions,

        /// Analyse datasets in parallel.
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },
    /// Print the default configuration as TOML.
    Policy {
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct RunOptions {
    /// Metric to read from process tables. Defaults to the config's loader kind.
    #[arg(long, value_enum)]
    kind: Option<KindArg>,

    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Cpu,
    Memory,
    Generic,
}

impl From<KindArg> for SampleKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Cpu => SampleKind::Cpu,
            KindArg::Memory => SampleKind::Memory,
            KindArg::Generic => SampleKind::Generic,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

fn init_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(Level::from(log_level).into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match cli.command {
        Commands::Analyze { file, options } => run_analyze(&file, &options),
        Commands::Compare {
            files,
            options,
            parallel,
        } => run_compare(&files, &options, parallel),
        Commands::Policy { output } => {
            let text = AnalysisConfig::default().to_toml()?;
            emit(&text, output.as_deref())
        }
    }
}

fn load_config(options: &RunOptions) -> Result<AnalysisConfig> {
    let mut config = match &options.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(kind) = options.kind {
        config.loader.kind = kind.into();
    }
    Ok(config)
}

fn run_analyze(file: &Path, options: &RunOptions) -> Result<()> {
    let config = load_config(options)?;
    let analysis = analyze_file(file, &config)?;
    let rendered = match options.format {
        OutputFormat::Text => ReportStyle::Text.generator(&config).analysis(&analysis),
        OutputFormat::Markdown => ReportStyle::Markdown.generator(&config).analysis(&analysis),
        OutputFormat::Json => export_analysis_json(&analysis)?,
        OutputFormat::Csv => export_analysis_csv(&analysis)?,
    };
    emit(&rendered, options.output.as_deref())
}

fn run_compare(files: &[PathBuf], options: &RunOptions, parallel: bool) -> Result<()> {
    let mut config = load_config(options)?;
    config.compare.parallel |= parallel;
    let run = compare_files(files, &config)?;
    let rendered = match options.format {
        OutputFormat::Text => ReportStyle::Text.generator(&config).comparison(&run),
        OutputFormat::Markdown => ReportStyle::Markdown.generator(&config).comparison(&run),
        OutputFormat::Json => export_json(&run)?,
        OutputFormat::Csv => export_csv(&run)?,
    };
    emit(&rendered, options.output.as_deref())?;

    for failure in &run.failures {
        eprintln!("Error for {}: {}", failure.identifier, failure.reason);
    }
    if run.all_failed() {
        bail!("all {} datasets failed", run.failures.len());
    }
    Ok(())
}

fn emit(text: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => print!("{text}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn rejects_unknown_kind_and_log_level() {
        assert!(Cli::try_parse_from(["perfscope", "analyze", "a.txt", "--kind", "disk"]).is_err());
        assert!(
            Cli::try_parse_from(["perfscope", "--log-level", "loud", "policy"]).is_err()
        );
    }

    #[test]
    fn parses_kind_and_log_level() {
        let cli = Cli::try_parse_from([
            "perfscope",
            "compare",
            "a.txt",
            "b.txt",
            "--kind",
            "memory",
            "--log-level",
            "debug",
            "--parallel",
        ])
        .unwrap();
        assert!(matches!(cli.log_level, LogLevel::Debug));
        match cli.command {
            Commands::Compare {
                files,
                options,
                parallel,
            } => {
                assert_eq!(files.len(), 2);
                assert!(parallel);
                let config = load_config(&options).unwrap();
                assert_eq!(config.loader.kind, SampleKind::Memory);
            }
            _ => panic!("expected compare"),
        }
    }
}
