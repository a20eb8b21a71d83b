//! Command-line front end: argument parsing and the single, batch and
//! interactive modes.

pub mod repl;

use crate::config::{self, Config};
use crate::format::{Formatter, DEFAULT_MAX_CONTENT_LENGTH};
use crate::logging;
use crate::search::{
    ExportKind, ExportOptions, ExportOutcome, SearchClient, SearchDepth, SearchOptions, SearchRun,
    SearchTopic,
};
use anyhow::Result;
use clap::Parser;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;

/// Search the web with Tavily and format the results for the console, JSON or HTML.
#[derive(Parser, Debug)]
#[command(name = "tavily-tools", version, about)]
pub struct Args {
    /// Run a single search
    #[arg(short, long, value_name = "QUERY", conflicts_with_all = ["batch", "interactive"])]
    pub query: Option<String>,

    /// Run several searches one after another
    #[arg(short, long, value_name = "QUERY", num_args = 1.., conflicts_with = "interactive")]
    pub batch: Vec<String>,

    /// Interactive mode (the default when no query is given)
    #[arg(short, long)]
    pub interactive: bool,

    /// Save results as JSON
    #[arg(long)]
    pub save_json: bool,

    /// Save results as an HTML report
    #[arg(long)]
    pub save_html: bool,

    /// Do not print results to the console
    #[arg(long)]
    pub no_print: bool,

    /// Directory for saved files (overrides RESULTS_SAVE_PATH)
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Results per search (overrides MAX_SEARCH_RESULTS)
    #[arg(long, value_name = "N")]
    pub max_results: Option<usize>,

    /// Request timeout in seconds (overrides SEARCH_TIMEOUT)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Search depth
    #[arg(long, value_enum)]
    pub depth: Option<SearchDepth>,

    /// Search topic
    #[arg(long, value_enum)]
    pub topic: Option<SearchTopic>,

    /// Show the current configuration and exit
    #[arg(long = "config")]
    pub show_config: bool,

    /// Validate the environment configuration and exit
    #[arg(long)]
    pub validate_env: bool,

    /// Verbose output (debug logs, unmasked key in --config)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print results and errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// What the invocation asks for, in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    ShowConfig,
    ValidateEnv,
    Single(String),
    Batch(Vec<String>),
    Interactive,
}

impl Args {
    pub fn mode(&self) -> Mode {
        if self.show_config {
            Mode::ShowConfig
        } else if self.validate_env {
            Mode::ValidateEnv
        } else if let Some(query) = &self.query {
            Mode::Single(query.clone())
        } else if !self.batch.is_empty() {
            Mode::Batch(self.batch.clone())
        } else {
            Mode::Interactive
        }
    }

    /// Command-line values win over the environment and config file.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.output_dir {
            config.results_save_path = dir.display().to_string();
        }
        if let Some(n) = self.max_results {
            config.max_search_results = n;
        }
        if let Some(secs) = self.timeout {
            config.search_timeout = secs;
        }
    }

    pub fn search_options(&self, config: &Config) -> SearchOptions {
        let mut options = SearchOptions::from_config(config);
        if let Some(depth) = self.depth {
            options.search_depth = depth;
        }
        if let Some(topic) = self.topic {
            options.topic = topic;
        }
        options
    }

    /// `--save-html` is dropped when HTML reports are disabled.
    pub fn export_options(&self, config: &Config) -> ExportOptions {
        ExportOptions {
            save_json: self.save_json,
            save_html: self.save_html && config.enable_html_reports,
            html_title: None,
        }
    }
}

/// Console output policy shared by every mode.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    pub quiet: bool,
    pub print_results: bool,
}

impl Console {
    fn from_args(args: &Args) -> Self {
        Self {
            quiet: args.quiet,
            print_results: !args.no_print,
        }
    }

    /// Status line, suppressed by `--quiet`.
    pub fn info(&self, message: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", message.as_ref());
        }
    }

    pub fn warn(&self, message: impl AsRef<str>) {
        eprintln!("⚠️  {}", message.as_ref());
    }

    pub fn error(&self, message: impl AsRef<str>) {
        eprintln!("❌ {}", message.as_ref());
    }

    pub fn report_export(&self, outcome: &ExportOutcome) {
        match &outcome.result {
            Ok(path) => self.info(format!("✅ {} saved: {}", export_label(outcome.kind), path.display())),
            Err(e) => self.error(format!("Save failed: {e}")),
        }
    }

    /// Full console rendering of a loaded formatter, `None` under `--no-print`.
    pub fn results_text(&self, formatter: &Formatter) -> Option<String> {
        self.print_results
            .then(|| formatter.render_full(DEFAULT_MAX_CONTENT_LENGTH))
    }

    pub fn show_results(&self, formatter: &Formatter) {
        if let Some(text) = self.results_text(formatter) {
            print!("{text}");
        }
    }

    /// Console rendering of a run followed by its export outcomes.
    pub fn report_run(&self, run: &SearchRun) {
        self.show_results(&run.formatter);
        for outcome in &run.exports {
            self.report_export(outcome);
        }
    }
}

fn export_label(kind: ExportKind) -> &'static str {
    match kind {
        ExportKind::Json => "JSON",
        ExportKind::Html => "HTML report",
    }
}

/// Parse arguments, load configuration and dispatch. Ctrl-C ends any mode.
pub async fn run() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = config::load()?;
    args.apply_overrides(&mut config);
    let _log_guard = logging::init(&config, args.verbose)?;
    tracing::debug!(config = %config.summary(), "configuration loaded");

    until_interrupted(execute(&args, &config), tokio::signal::ctrl_c()).await
}

/// Run `work` unless `interrupt` resolves first, in which case report the
/// interruption and fail. An interrupt source that errors is ignored.
///
/// Nothing `work` leaves behind may hold the runtime open: stdin is read on a
/// detached thread (see [`repl::spawn_line_reader`]).
pub async fn until_interrupted<W, I>(work: W, interrupt: I) -> Result<ExitCode>
where
    W: Future<Output = Result<ExitCode>>,
    I: Future<Output = std::io::Result<()>>,
{
    let interrupt = async {
        if let Err(e) = interrupt.await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        code = work => code,
        _ = interrupt => {
            eprintln!("\n🛑 Interrupted");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn execute(args: &Args, config: &Config) -> Result<ExitCode> {
    let console = Console::from_args(args);

    match args.mode() {
        Mode::ShowConfig => {
            print!("{}", config.render_display(args.verbose));
            Ok(ExitCode::SUCCESS)
        }
        Mode::ValidateEnv => Ok(validate_env(config, &console)),
        mode => {
            config.validate()?;
            for warning in config.warnings() {
                console.warn(warning);
            }

            let mut client = SearchClient::from_config(config)?;
            let options = args.search_options(config);
            let export = args.export_options(config);
            if args.save_html && !export.save_html {
                console.warn("HTML reports are disabled (ENABLE_HTML_REPORTS); skipping --save-html");
            }

            match mode {
                Mode::Single(query) => {
                    let run = client.search_and_format(&query, &options, &export).await?;
                    console.report_run(&run);
                    Ok(ExitCode::SUCCESS)
                }
                Mode::Batch(queries) => Ok(batch(&mut client, &queries, &options, &export, &console).await),
                _ => repl::run(&mut client, config, &options, &console).await,
            }
        }
    }
}

fn validate_env(config: &Config, console: &Console) -> ExitCode {
    match config.validate() {
        Ok(()) => {
            for warning in config.warnings() {
                console.warn(warning);
            }
            println!("✅ Environment configuration is valid");
            print!("{}", config.render_display(false));
            ExitCode::SUCCESS
        }
        Err(e) => {
            console.error(e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Fails only when every query failed.
async fn batch(
    client: &mut SearchClient,
    queries: &[String],
    options: &SearchOptions,
    export: &ExportOptions,
    console: &Console,
) -> ExitCode {
    let total = queries.len();
    console.info(format!("🚀 Batch search: {total} queries"));

    let summary = client
        .batch_search(queries, options, export, |position, query, outcome| {
            console.info(format!("\n🔄 [{position}/{total}] {query}"));
            match outcome {
                Ok(run) => console.report_run(run),
                Err(e) => console.error(format!("Search failed for '{query}': {e}")),
            }
        })
        .await;

    console.info(format!(
        "\n📊 Batch summary:\n   Succeeded: {}/{}\n   Failed: {}\n   Total results: {}\n   Mean average score: {:.4}",
        summary.processed(),
        total,
        summary.failures.len(),
        summary.total_results(),
        summary.mean_average_score()
    ));

    if summary.runs.is_empty() && total > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
