use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, LevelFilter};
use std::process;
use std::time::Duration;

use sitecheck_core::{
    read_lines, CheckConfig, CommandRegistry, ConsoleSink, JsonSink, ResultAggregator,
    SinkRef, SiteCheckPlugin, TargetManager, COMMAND_NAME,
};

#[derive(Parser, Debug)]
#[command(
    name = "sitecheck",
    version,
    about = "Website security check via sitecheck.sucuri.net",
    override_usage = "sitecheck <site>  <options>",
    after_help = "\x1b[1;36mEXAMPLES:\x1b[0m
  Single site:                    sitecheck example.com
  Sites from file:                sitecheck -l sites.txt
  JSON embeds:                    sitecheck example.com --json
  Save replies:                   sitecheck example.com -o replies.jsonl
  Through a proxy:                sitecheck example.com --proxy http://127.0.0.1:8080
  Dry-run test:                   sitecheck example.com --dry-run"
)]
pub struct Args {
    #[arg(required_unless_present = "list")]
    pub site: Option<String>,

    #[arg(short = 'l', long = "list", help = "File containing sites to check (one per line)")]
    pub list: Option<String>,

    #[arg(long, help = "JSON config file (CLI flags override it)")]
    pub config: Option<String>,

    #[arg(long, help = "SiteCheck API endpoint")]
    pub api_url: Option<String>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Proxy URL (e.g. http://127.0.0.1:8080)")]
    pub proxy: Option<String>,

    #[arg(short = 'H', long = "header", help = "Custom header (e.g. \"X-Api-Key: abc\")")]
    pub headers: Vec<String>,

    #[arg(short = 'o', long, help = "Append every reply to this file as a JSON line")]
    pub output: Option<String>,

    #[arg(long, default_value_t = false, help = "Print replies as JSON instead of colored text")]
    pub json: bool,

    #[arg(short = 'v', long, default_value_t = false, help = "Verbose logging")]
    pub verbose: bool,

    #[arg(long, help = "Show what would be checked without sending requests")]
    pub dry_run: bool,
}

impl Args {
    /// Layers CLI flags over the config file (or defaults).
    fn resolve_config(&self) -> anyhow::Result<CheckConfig> {
        let mut config = match self.config {
            Some(ref path) => CheckConfig::load(path)?,
            None => CheckConfig::default(),
        };

        if let Some(ref url) = self.api_url {
            config.api_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(ref proxy) = self.proxy {
            config.proxy = proxy.clone();
        }
        config.headers.extend(self.headers.iter().cloned());
        if let Some(ref output) = self.output {
            config.output = output.clone();
        }
        config.json |= self.json;

        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

#[tokio::main]
async fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let args = Args::parse();
    init_logging(args.verbose);

    let config = match args.resolve_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", format!("[!] {:#}", e).red());
            process::exit(1);
        }
    };

    let sink: SinkRef = if config.json { JsonSink::new_ref() } else { ConsoleSink::new_ref() };

    let mut targets = TargetManager::new();

    if let Some(ref list_path) = args.list {
        match read_lines(list_path) {
            Ok(lines) => {
                sink.on_log(
                    "success",
                    &format!("[+] Loaded {} site(s) from {}", lines.len(), list_path),
                );
                for line in &lines {
                    if !targets.add_target(line) {
                        debug!("Skipping '{}' (invalid or duplicate)", line);
                    }
                }
            }
            Err(e) => {
                sink.on_log("error", &format!("[!] Failed to read '{}': {}", list_path, e));
                process::exit(1);
            }
        }
    }

    if let Some(ref site) = args.site {
        if !targets.add_target(site) {
            debug!("Skipping '{}' (invalid or duplicate)", site);
        }
    }

    if targets.is_empty() {
        sink.on_log("error", "[!] No usable sites given. Provide a domain or use -l <file>.");
        process::exit(1);
    }

    if args.dry_run {
        while let Some(site) = targets.next() {
            println!("[DRY RUN] Would check site: {}", site);
        }
        return;
    }

    if let Err(e) = run_checks(targets, &config, &sink).await {
        sink.on_log("error", &format!("[!] {:#}", e));
        process::exit(1);
    }
}

/// Hosts the plugin for the lifetime of the run and dispatches one
/// `checksite` per queued site.
async fn run_checks(
    mut targets: TargetManager,
    config: &CheckConfig,
    sink: &SinkRef,
) -> anyhow::Result<()> {
    let client = std::sync::Arc::new(config.build_client()?);
    let plugin = SiteCheckPlugin::new(client);
    let mut registry = CommandRegistry::new();
    plugin.start(&mut registry);

    let mut aggregator = ResultAggregator::new(config.output_ref())?;
    let total = targets.len();
    let mut index = 0;

    while let Some(site) = targets.next() {
        index += 1;
        let spinner = spinner(&site, index, total, config.json);

        let reply = registry
            .dispatch(COMMAND_NAME, std::slice::from_ref(&site))
            .await?;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let record = aggregator.record(&site, reply)?;
        sink.on_reply(&record.site, &record.reply);
    }

    if total > 1 {
        sink.on_summary(&aggregator.summary());
    }

    plugin.unload(&mut registry);
    Ok(())
}

fn spinner(site: &str, index: usize, total: usize, quiet: bool) -> Option<ProgressBar> {
    if quiet {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(format!("Checking {} ({}/{})...", site, index, total));
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}
