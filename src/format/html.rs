//! Standalone HTML report.
//!
//! The document carries its own styling and references no external assets.
//! Titles, URLs and content come from the open web, so every interpolated
//! value goes through [`escape_html`].

use super::{FormatError, Formatter, NormalizedReport};
use crate::util::{self, display_seconds};
use chrono::Local;
use std::fmt::Write;
use std::path::{Path, PathBuf};

const STYLE: &str = r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            line-height: 1.6;
            color: #333;
            max-width: 1200px;
            margin: 0 auto;
            padding: 20px;
            background-color: #f8f9fa;
        }
        .header {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 30px;
            border-radius: 10px;
            margin-bottom: 30px;
        }
        .header h1 { margin: 0 0 10px 0; font-size: 2.2em; }
        .meta-info {
            display: grid;
            grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
            gap: 20px;
            padding: 20px;
            background: white;
            border-radius: 8px;
        }
        .meta-item { text-align: center; }
        .meta-label { font-weight: bold; color: #666; font-size: 0.9em; }
        .meta-value { font-size: 1.2em; margin-top: 5px; }
        .ai-answer {
            background: #e8f5e8;
            border-left: 4px solid #28a745;
            padding: 20px;
            margin: 20px 0;
            border-radius: 5px;
        }
        .results-section {
            background: white;
            padding: 20px;
            border-radius: 8px;
            margin: 20px 0;
        }
        .result-item { border-bottom: 1px solid #eee; padding: 20px 0; }
        .result-item:last-child { border-bottom: none; }
        .result-title { margin: 0 0 10px 0; color: #1a73e8; }
        .result-title a { color: inherit; text-decoration: none; }
        .result-title a:hover { text-decoration: underline; }
        .result-number {
            background: #1a73e8;
            color: white;
            padding: 2px 8px;
            border-radius: 12px;
            font-size: 0.8em;
            margin-right: 10px;
        }
        .result-meta { color: #666; font-size: 0.9em; margin: 5px 0; }
        .result-score {
            background: #f0f8ff;
            color: #1a73e8;
            padding: 2px 8px;
            border-radius: 4px;
            margin-right: 10px;
        }
        .result-url { word-break: break-all; }
        .result-content { margin-top: 10px; color: #444; }
        .follow-up-questions {
            background: #fff3cd;
            border-left: 4px solid #ffc107;
            padding: 20px;
            margin: 20px 0;
            border-radius: 5px;
            color: #856404;
        }
        .footer {
            text-align: center;
            color: #666;
            font-size: 0.9em;
            margin-top: 40px;
            padding: 20px;
            border-top: 1px solid #eee;
        }
        @media (max-width: 768px) {
            body { padding: 10px; }
            .meta-info { grid-template-columns: 1fr; }
        }
"#;

/// Escape the five HTML-significant characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Escaped `href` for a result URL. Anything but an http(s) URL links nowhere.
pub fn link_target(url: &str) -> String {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        escape_html(url.trim_start())
    } else {
        "#".to_string()
    }
}

/// Default report title for a query.
pub fn default_title(query: &str) -> String {
    format!("Search report - {query}")
}

/// Render a full HTML document. `generated_at` is shown verbatim.
pub fn render_document(report: &NormalizedReport, title: &str, generated_at: &str) -> String {
    let title = escape_html(title);
    let query = escape_html(&report.search_info.query);
    let generated_at = escape_html(generated_at);

    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str("    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(html, "    <title>{title}</title>");
    let _ = writeln!(html, "    <style>{STYLE}    </style>");
    html.push_str("</head>\n<body>\n");

    let _ = write!(
        html,
        r#"    <div class="header">
        <h1>{title}</h1>
        <p>Query: {query} &middot; Generated {generated_at}</p>
    </div>
"#
    );

    html.push_str("    <div class=\"meta-info\">\n");
    for (label, value) in [
        ("🔍 Query", query.clone()),
        ("⏱️ Response time", display_seconds(report.search_info.response_time)),
        ("📊 Results", report.search_info.result_count.to_string()),
        ("📅 Generated", generated_at.clone()),
    ] {
        let _ = writeln!(
            html,
            r#"        <div class="meta-item"><div class="meta-label">{label}</div><div class="meta-value">{value}</div></div>"#
        );
    }
    html.push_str("    </div>\n");

    if let Some(answer) = &report.answer {
        let _ = writeln!(
            html,
            r#"    <div class="ai-answer"><h2>🤖 AI answer</h2><p>{}</p></div>"#,
            escape_html(answer)
        );
    }

    html.push_str("    <div class=\"results-section\">\n        <h2>🔍 Results</h2>\n");
    for result in &report.results {
        let title = if result.title.is_empty() {
            "Untitled".to_string()
        } else {
            escape_html(&result.title)
        };
        let url = escape_html(&result.url);
        let href = link_target(&result.url);

        let _ = write!(
            html,
            r#"        <div class="result-item">
            <h3 class="result-title">
                <span class="result-number">[{index}]</span>
                <a href="{href}" target="_blank" rel="noopener noreferrer">{title}</a>
            </h3>
            <div class="result-meta">
                <span class="result-score">Score: {score:.4}</span>
                <span class="result-url">{url}</span>
            </div>
            <div class="result-content">{content}</div>
        </div>
"#,
            index = result.index,
            score = result.score,
            content = escape_html(&result.content),
        );
    }
    html.push_str("    </div>\n");

    if !report.follow_up_questions.is_empty() {
        html.push_str("    <div class=\"follow-up-questions\">\n        <h2>💡 Follow-up questions</h2>\n        <ul>\n");
        for question in &report.follow_up_questions {
            let _ = writeln!(html, "            <li>{}</li>", escape_html(question));
        }
        html.push_str("        </ul>\n    </div>\n");
    }

    let _ = write!(
        html,
        r#"    <div class="footer">
        <p>📄 Report generated {generated_at}</p>
        <p>🔧 Powered by tavily-tools</p>
    </div>
</body>
</html>
"#
    );

    html
}

impl Formatter {
    /// HTML report for the loaded response. `title` defaults to
    /// [`default_title`] of the query.
    pub fn render_html(&self, title: Option<&str>) -> Result<String, FormatError> {
        let report = self.to_normalized()?;
        let title = title
            .map(str::to_string)
            .unwrap_or_else(|| default_title(&report.search_info.query));
        let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        Ok(render_document(&report, &title, &generated_at))
    }

    /// Write the HTML report. Path handling matches [`Formatter::write_json`].
    pub fn write_html(&self, path: Option<&Path>, title: Option<&str>) -> Result<PathBuf, FormatError> {
        let html = self.render_html(title)?;
        let path = util::resolve_output_path(path, self.output_dir(), "search_results", "html");
        self.write(&path, &html)?;
        tracing::info!(path = %path.display(), "wrote html report");
        Ok(path)
    }
}
