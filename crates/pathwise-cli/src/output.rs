//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use pathwise_domain::NormalizedRecord;
use pathwise_normalizer::{CollectionSource, NormalizedCollection};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a normalized collection.
    pub fn format_collection(&self, collection: &NormalizedCollection) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(collection),
            OutputFormat::Table => Ok(self.format_table(collection)),
            OutputFormat::Quiet => Ok(self.format_quiet(collection)),
        }
    }

    /// Status line describing where the records came from, or `None` in
    /// machine-readable formats.
    pub fn collection_status(&self, collection: &NormalizedCollection) -> Option<String> {
        if self.format != OutputFormat::Table {
            return None;
        }

        let meta = &collection.meta;
        let line = match meta.source {
            CollectionSource::Model => self.success(&format!(
                "{} {} record(s) recovered from model output",
                meta.count, collection.kind
            )),
            CollectionSource::Padded => self.warning(&format!(
                "{} of {} {} record(s) are placeholders",
                meta.count.saturating_sub(count_model(collection)),
                meta.requested,
                collection.kind
            )),
            CollectionSource::Fallback => self.warning(&format!(
                "Model output unusable; {} placeholder {} record(s)",
                meta.count, collection.kind
            )),
            CollectionSource::Stored => {
                self.info(&format!("{} stored {} record(s)", meta.count, collection.kind))
            }
        };

        if meta.dropped > 0 {
            Some(format!(
                "{}\n{}",
                line,
                self.warning(&format!("{} malformed record(s) dropped", meta.dropped))
            ))
        } else {
            Some(line)
        }
    }

    /// JSON envelope with metadata.
    fn format_json(&self, collection: &NormalizedCollection) -> Result<String> {
        let envelope = serde_json::json!({
            "success": true,
            "kind": collection.kind,
            "meta": collection.meta,
            "records": collection.records,
        });
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Format records as a table.
    fn format_table(&self, collection: &NormalizedCollection) -> String {
        if collection.is_empty() {
            return self.colorize("No records.", "yellow");
        }

        let mut builder = Builder::default();
        if collection.kind.is_question() {
            builder.push_record(["#", "Question", "Options", "Answer", "Source"]);
        } else {
            builder.push_record(["#", "Phase", "Duration", "Skills", "Source"]);
        }

        for (idx, record) in collection.records.iter().enumerate() {
            let number = (idx + 1).to_string();
            match record {
                NormalizedRecord::Roadmap(phase) => builder.push_record([
                    number,
                    phase.phase.clone(),
                    phase.duration.clone(),
                    phase.skills.join(", "),
                    record.source().to_string(),
                ]),
                _ => builder.push_record([
                    number,
                    record.headline().to_string(),
                    record.options().join(" | "),
                    record.answer().unwrap_or("-").to_string(),
                    record.source().to_string(),
                ]),
            }
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// One question or phase title per line.
    fn format_quiet(&self, collection: &NormalizedCollection) -> String {
        let lines: Vec<&str> = collection.records.iter().map(|r| r.headline()).collect();
        lines.join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn count_model(collection: &NormalizedCollection) -> usize {
    collection
        .records
        .iter()
        .filter(|r| r.source() == pathwise_domain::RecordOrigin::Model)
        .count()
}
