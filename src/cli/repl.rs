//! Interactive search loop.

use super::Console;
use crate::config::Config;
use crate::format::{FormatError, Formatter, NO_DATA_NOTICE};
use crate::history::SearchHistory;
use crate::search::{SearchClient, SearchOptions};
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io::{BufRead, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::mpsc;

const HELP: &str = "\
Commands:
  :json             save the current results as JSON
  :html             save the current results as an HTML report
  :raw              print the raw API response
  :quality          show the quality analysis
  :history          list searches made this session
  :export-history   save the search history as JSON
  :clear-history    forget the search history
  :help             show this help
  :quit             exit
Anything else runs a new search.";

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Json,
    Html,
    Raw,
    Quality,
    History,
    ExportHistory,
    ClearHistory,
    Help,
    Quit,
    Unknown(String),
    Search(String),
    Empty,
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplCommand::Empty;
        }
        let Some(command) = line.strip_prefix(':') else {
            return ReplCommand::Search(line.to_string());
        };

        match command.trim().to_lowercase().as_str() {
            "json" => ReplCommand::Json,
            "html" => ReplCommand::Html,
            "raw" => ReplCommand::Raw,
            "quality" => ReplCommand::Quality,
            "history" => ReplCommand::History,
            "export-history" => ReplCommand::ExportHistory,
            "clear-history" => ReplCommand::ClearHistory,
            "help" | "h" | "?" => ReplCommand::Help,
            "quit" | "q" | "exit" => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

/// Numbered listing of the session history.
pub fn render_history(history: &SearchHistory) -> String {
    if history.is_empty() {
        return "📜 No searches yet\n".to_string();
    }

    let mut out = format!("📜 Search history ({} searches):\n", history.len());
    for (idx, entry) in history.entries().iter().enumerate() {
        let _ = writeln!(
            out,
            "   {}. [{}] {} ({} results)",
            idx + 1,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            entry.query,
            entry.results_count
        );
    }
    out
}

struct Session<'a> {
    client: &'a mut SearchClient,
    config: &'a Config,
    options: &'a SearchOptions,
    console: &'a Console,
    formatter: Formatter,
}

impl Session<'_> {
    async fn search(&mut self, query: &str) {
        self.console.info(format!("🔍 Searching: {query}"));
        match self.client.search(query, self.options).await {
            Ok(response) => {
                self.formatter.load_response(response);
                self.console.show_results(&self.formatter);
            }
            Err(e) => self.console.error(format!("Search failed: {e}")),
        }
    }

    fn report_write(&self, label: &str, result: Result<PathBuf, FormatError>) {
        match result {
            Ok(path) => self.console.info(format!("✅ {label} saved: {}", path.display())),
            Err(FormatError::NoResponse) => println!("{NO_DATA_NOTICE}"),
            Err(e) => self.console.error(format!("Save failed: {e}")),
        }
    }

    fn print_raw(&self) -> Result<()> {
        match self.formatter.response() {
            Some(response) => {
                let raw = response.to_raw_value().context("Failed to serialize response")?;
                println!("{}", serde_json::to_string_pretty(&raw)?);
            }
            None => println!("{NO_DATA_NOTICE}"),
        }
        Ok(())
    }

    /// Returns `false` when the loop should stop.
    async fn dispatch(&mut self, command: ReplCommand) -> Result<bool> {
        match command {
            ReplCommand::Empty if !self.formatter.is_loaded() => {
                let query = self.config.default_search_query.clone();
                self.search(&query).await;
            }
            ReplCommand::Empty => {}
            ReplCommand::Search(query) => self.search(&query).await,
            ReplCommand::Json => self.report_write("JSON", self.formatter.write_json(None, true)),
            ReplCommand::Html if !self.config.enable_html_reports => {
                self.console.warn("HTML reports are disabled (ENABLE_HTML_REPORTS)");
            }
            ReplCommand::Html => self.report_write("HTML report", self.formatter.write_html(None, None)),
            ReplCommand::Raw => self.print_raw()?,
            ReplCommand::Quality => print!("{}", self.formatter.render_quality()),
            ReplCommand::History => print!("{}", render_history(self.client.history())),
            ReplCommand::ExportHistory => match self.client.export_history(None) {
                Ok(path) => self.console.info(format!("✅ History saved: {}", path.display())),
                Err(e) => self.console.error(format!("Save failed: {e}")),
            },
            ReplCommand::ClearHistory => {
                self.client.clear_history();
                self.console.info("🧹 History cleared");
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Unknown(input) => {
                self.console.error(format!("Unknown command: {input} (try :help)"));
            }
            ReplCommand::Quit => return Ok(false),
        }
        Ok(true)
    }
}

/// Feed lines from `reader` into a channel from a detached thread.
///
/// The thread is never joined, so a read blocked on a terminal cannot keep the
/// runtime from shutting down. It exits at end of input or once the receiver
/// is dropped.
pub fn spawn_line_reader<R>(reader: R) -> std::io::Result<mpsc::Receiver<std::io::Result<String>>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    std::thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in reader.lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

fn prompt(text: &str) -> Result<()> {
    print!("{text}");
    std::io::stdout().flush().context("Failed to flush stdout")
}

/// Read commands from stdin until `:quit` or end of input.
pub async fn run(
    client: &mut SearchClient,
    config: &Config,
    options: &SearchOptions,
    console: &Console,
) -> Result<ExitCode> {
    let mut session = Session {
        formatter: Formatter::with_output_dir(client.output_dir()),
        client,
        config,
        options,
        console,
    };

    console.info("🤖 Tavily interactive search (:help for commands, :quit to exit)");
    prompt(&format!(
        "🔍 Enter a search query (empty for '{}'): ",
        config.default_search_query
    ))?;

    let mut lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
        .context("Failed to start stdin reader")?;
    while let Some(line) = lines.recv().await {
        let line = line.context("Failed to read from stdin")?;
        if !session.dispatch(ReplCommand::parse(&line)).await? {
            break;
        }
        prompt("\n> ")?;
    }

    console.info("👋 Bye");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse(":json"), ReplCommand::Json);
        assert_eq!(ReplCommand::parse(" :HTML "), ReplCommand::Html);
        assert_eq!(ReplCommand::parse(":raw"), ReplCommand::Raw);
        assert_eq!(ReplCommand::parse(":quality"), ReplCommand::Quality);
        assert_eq!(ReplCommand::parse(":history"), ReplCommand::History);
        assert_eq!(ReplCommand::parse(":export-history"), ReplCommand::ExportHistory);
        assert_eq!(ReplCommand::parse(":clear-history"), ReplCommand::ClearHistory);
        assert_eq!(ReplCommand::parse(":help"), ReplCommand::Help);
        assert_eq!(ReplCommand::parse(":q"), ReplCommand::Quit);
        assert_eq!(ReplCommand::parse(":exit"), ReplCommand::Quit);
    }

    #[test]
    fn test_parse_queries_and_blank_lines() {
        assert_eq!(
            ReplCommand::parse("  rust async runtime "),
            ReplCommand::Search("rust async runtime".into())
        );
        assert_eq!(ReplCommand::parse("   "), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse(":frobnicate"), ReplCommand::Unknown(":frobnicate".into()));
    }

    #[tokio::test]
    async fn test_line_reader_delivers_lines_then_closes() {
        let input = std::io::Cursor::new("rust\n:quality\n\n:quit\n");
        let mut lines = spawn_line_reader(input).unwrap();

        let mut received = Vec::new();
        while let Some(line) = lines.recv().await {
            received.push(line.unwrap());
        }
        assert_eq!(received, ["rust", ":quality", "", ":quit"]);
    }

    #[test]
    fn test_render_history() {
        let mut history = SearchHistory::new();
        assert_eq!(render_history(&history), "📜 No searches yet\n");

        let at = Local.with_ymd_and_hms(2025, 3, 1, 9, 30, 0).unwrap();
        history.record("rust", 5, at);
        history.record("tokio", 0, at);

        let out = render_history(&history);
        assert!(out.starts_with("📜 Search history (2 searches):\n"));
        assert!(out.contains("   1. [2025-03-01 09:30:00] rust (5 results)\n"));
        assert!(out.contains("   2. [2025-03-01 09:30:00] tokio (0 results)\n"));
    }
}
