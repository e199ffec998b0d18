use std::fs::{File, OpenOptions};
use std::io::Write;

use anyhow::Context;
use serde::Serialize;

use crate::core::command::CommandReply;

/// One checked site together with the reply shown for it.
#[derive(Debug, Clone, Serialize)]
pub struct CheckRecord {
    pub site: String,
    pub reply: CommandReply,
}

impl CheckRecord {
    pub fn is_report(&self) -> bool {
        self.reply.as_embed().is_some()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckSummary {
    pub total: usize,
    pub reports: usize,
    pub messages: usize,
}

/// Collects replies and, when an output path is set, appends each one to it
/// as a JSON line.
pub struct ResultAggregator {
    file: Option<File>,
    records: Vec<CheckRecord>,
}

impl ResultAggregator {
    pub fn new(output_path: Option<&str>) -> anyhow::Result<Self> {
        let file = match output_path {
            Some(path) => Some(
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("failed to open output file '{}'", path))?,
            ),
            None => None,
        };
        Ok(Self {
            file,
            records: Vec::new(),
        })
    }

    pub fn record(&mut self, site: &str, reply: CommandReply) -> anyhow::Result<&CheckRecord> {
        let record = CheckRecord {
            site: site.to_string(),
            reply,
        };

        if let Some(ref mut file) = self.file {
            let line = serde_json::to_string(&record)?;
            writeln!(file, "{}", line).context("failed to write result line")?;
        }

        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    pub fn records(&self) -> &[CheckRecord] {
        &self.records
    }

    pub fn summary(&self) -> CheckSummary {
        let reports = self.records.iter().filter(|r| r.is_report()).count();
        CheckSummary {
            total: self.records.len(),
            reports,
            messages: self.records.len() - reports,
        }
    }
}
