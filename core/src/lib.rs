pub mod core;
pub mod http;
pub mod modules;
pub mod utils;

use std::fs;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub use crate::core::command::{CommandHandler, CommandRegistry, CommandReply, HandlerRef};
pub use crate::core::embed::{rating_color, Embed, EmbedField, COLOR_BAD, COLOR_GOOD, COLOR_WARN};
pub use crate::core::report::build_embed;
pub use crate::core::response::SiteCheckResponse;
pub use crate::core::result_aggregator::{CheckRecord, CheckSummary, ResultAggregator};
pub use crate::core::target_manager::{normalize_domain, TargetManager};
pub use crate::http::HttpClient;
pub use crate::modules::plugin::{SiteCheckCommand, SiteCheckPlugin, COMMAND_NAME};
pub use crate::modules::sitecheck::{CheckOutcome, SiteCheckClient, DEFAULT_API_URL};
pub use crate::utils::read_lines;

/// Checker settings shared by the CLI and library callers. Loadable from a
/// JSON file; every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckConfig {
    pub api_url: String,
    pub timeout: u64,
    pub proxy: String,
    pub headers: Vec<String>,
    pub user_agent: String,
    pub output: String,
    pub json: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: 30,
            proxy: String::new(),
            headers: Vec::new(),
            user_agent: String::new(),
            output: String::new(),
            json: false,
        }
    }
}

impl CheckConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let data =
            fs::read_to_string(path).with_context(|| format!("failed to read config '{}'", path))?;
        serde_json::from_str(&data).with_context(|| format!("invalid config '{}'", path))
    }

    pub fn parsed_headers(&self) -> Vec<(String, String)> {
        parse_custom_headers(&self.headers)
    }

    pub fn proxy_ref(&self) -> Option<&str> {
        if self.proxy.is_empty() { None } else { Some(&self.proxy) }
    }

    pub fn user_agent_ref(&self) -> Option<&str> {
        if self.user_agent.is_empty() { None } else { Some(&self.user_agent) }
    }

    pub fn output_ref(&self) -> Option<&str> {
        if self.output.is_empty() { None } else { Some(&self.output) }
    }

    /// Builds the API client these settings describe.
    pub fn build_client(&self) -> anyhow::Result<SiteCheckClient> {
        let http = HttpClient::new(
            self.timeout,
            self.proxy_ref(),
            &self.parsed_headers(),
            self.user_agent_ref(),
        )?;
        Ok(SiteCheckClient::new(Arc::new(http), self.api_url.clone()))
    }
}

/// Splits `"Name: value"` strings; entries without a name are dropped.
pub fn parse_custom_headers(raw: &[String]) -> Vec<(String, String)> {
    raw.iter().filter_map(|h| {
        let mut parts = h.splitn(2, ':');
        let key = parts.next()?.trim().to_string();
        let val = parts.next().unwrap_or("").trim().to_string();
        if key.is_empty() { return None; }
        Some((key, val))
    }).collect()
}

/// Output abstraction for command replies.
/// The CLI picks a colored terminal sink or a JSON sink.
pub trait ReportSink: Send + Sync {
    fn on_log(&self, level: &str, message: &str);
    fn on_reply(&self, site: &str, reply: &CommandReply);
    fn on_summary(&self, summary: &CheckSummary);
}

pub type SinkRef = Arc<dyn ReportSink>;

/// Terminal output sink for CLI usage.
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new_ref() -> SinkRef {
        Arc::new(Self)
    }
}

/// Drops the `**` bold markers the chat client would render.
fn strip_markdown(text: &str) -> String {
    text.replace("**", "")
}

impl ReportSink for ConsoleSink {
    fn on_log(&self, level: &str, message: &str) {
        use colored::*;
        let colored = match level {
            "success" => message.green().to_string(),
            "error"   => message.red().to_string(),
            "warn"    => message.yellow().to_string(),
            "phase"   => message.bright_cyan().bold().to_string(),
            _         => message.to_string(),
        };
        if level == "error" {
            eprintln!("{}", colored);
        } else {
            println!("{}", colored);
        }
    }

    fn on_reply(&self, site: &str, reply: &CommandReply) {
        use colored::*;
        match reply {
            CommandReply::Text(msg) => {
                println!("{} {}: {}", "[-]".yellow().bold(), site.white(), msg.yellow());
            }
            CommandReply::Embed(embed) => {
                let title = match embed.color {
                    Some(COLOR_GOOD) => embed.title.green().bold(),
                    Some(COLOR_WARN) => embed.title.yellow().bold(),
                    Some(COLOR_BAD) => embed.title.red().bold(),
                    _ => embed.title.white().bold(),
                };
                println!("\n{} {}", "[+]".green().bold(), title);
                println!("    {}", strip_markdown(&embed.description).bold());
                for field in &embed.fields {
                    println!("\n    {}", field.name.bright_cyan().bold());
                    for line in strip_markdown(&field.value).lines() {
                        println!("      {}", line);
                    }
                }
                println!("{}", "──────────────────────────────────────────".dimmed());
            }
        }
    }

    fn on_summary(&self, summary: &CheckSummary) {
        use colored::*;
        println!("\n{}", "CHECK SUMMARY :".yellow().bold());
        println!(
            "  {} site(s) checked, {} report(s), {} message(s)",
            summary.total.to_string().white().bold(),
            summary.reports.to_string().green(),
            summary.messages.to_string().yellow()
        );
    }
}

/// Machine-readable sink: one JSON object per reply on stdout.
pub struct JsonSink;

impl JsonSink {
    pub fn new_ref() -> SinkRef {
        Arc::new(Self)
    }
}

impl ReportSink for JsonSink {
    fn on_log(&self, _level: &str, message: &str) {
        eprintln!("{}", message);
    }

    fn on_reply(&self, site: &str, reply: &CommandReply) {
        let value = serde_json::json!({ "site": site, "reply": reply });
        println!("{}", value);
    }

    fn on_summary(&self, _summary: &CheckSummary) {}
}
