//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use kinship_domain::{
    Person, RelationshipEdge, RelationshipRequest, RelationshipTypeDefinition, Suggestion,
};
use kinship_regen::RegenMetrics;
use serde::Serialize;
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

    /// Format people.
    pub fn format_people(&self, people: &[Person]) -> Result<String> {
        self.render(
            people,
            "No people found.",
            ["ID", "Name", "Gender"],
            |p| vec![p.id.to_string(), p.display_name.clone(), p.gender.as_str().to_string()],
            |p| p.id.to_string(),
        )
    }

    /// Format relationship edges.
    pub fn format_edges(&self, edges: &[RelationshipEdge]) -> Result<String> {
        self.render(
            edges,
            "No relationships found.",
            ["From", "To", "Type", "Status", "Auto"],
            |e| {
                vec![
                    e.from_person_id.to_string(),
                    e.to_person_id.to_string(),
                    e.type_code.clone(),
                    e.status.as_str().to_string(),
                    if e.created_automatically { "yes" } else { "no" }.to_string(),
                ]
            },
            |e| e.id.to_string(),
        )
    }

    /// Format a single edge.
    pub fn format_edge(&self, edge: &RelationshipEdge) -> Result<String> {
        self.format_edges(std::slice::from_ref(edge))
    }

    /// Format suggestions.
    pub fn format_suggestions(&self, suggestions: &[Suggestion]) -> Result<String> {
        self.render(
            suggestions,
            "No pending suggestions.",
            ["ID", "Person", "Type", "Confidence", "Reason"],
            |s| {
                vec![
                    s.id.to_string(),
                    s.suggested_person_id.to_string(),
                    s.suggested_type_code.clone(),
                    s.confidence_score.to_string(),
                    s.reason.clone(),
                ]
            },
            |s| s.id.to_string(),
        )
    }

    /// Format requests.
    pub fn format_requests(&self, requests: &[RelationshipRequest]) -> Result<String> {
        self.render(
            requests,
            "No pending requests.",
            ["ID", "From", "To", "Type", "Status", "Message"],
            |r| {
                vec![
                    r.id.to_string(),
                    r.requester_id.to_string(),
                    r.target_id.to_string(),
                    r.proposed_type_code.clone(),
                    r.status.as_str().to_string(),
                    r.message.clone(),
                ]
            },
            |r| r.id.to_string(),
        )
    }

    /// Format a single request.
    pub fn format_request(&self, request: &RelationshipRequest) -> Result<String> {
        self.format_requests(std::slice::from_ref(request))
    }

    /// Format the relationship type catalog.
    pub fn format_types(&self, types: &[RelationshipTypeDefinition]) -> Result<String> {
        self.render(
            types,
            "No relationship types.",
            ["Code", "Family", "Category", "Generation", "Inverse"],
            |t| {
                vec![
                    t.code.to_string(),
                    t.family.as_str().to_string(),
                    format!("{:?}", t.category).to_lowercase(),
                    t.generation_offset.to_string(),
                    t.inverse_code.to_string(),
                ]
            },
            |t| t.code.to_string(),
        )
    }

    /// Format regeneration metrics.
    pub fn format_metrics(&self, metrics: &RegenMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let value = serde_json::json!({
                    "processed": metrics.processed,
                    "failed": metrics.failed,
                    "skipped": metrics.skipped,
                    "suggestions": metrics.suggestions,
                    "failures": metrics.failures,
                    "runtime_ms": metrics.total_runtime_ms,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Quiet => Ok(metrics.processed.to_string()),
            OutputFormat::Table => Ok(metrics.summary()),
        }
    }

    fn render<T, const N: usize>(
        &self,
        items: &[T],
        empty: &str,
        header: [&str; N],
        row: impl Fn(&T) -> Vec<String>,
        id: impl Fn(&T) -> String,
    ) -> Result<String>
    where
        T: Serialize,
    {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Quiet => Ok(items.iter().map(id).collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if items.is_empty() {
                    return Ok(self.colorize(empty, "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(header);
                for item in items {
                    builder.push_record(row(item));
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));

                Ok(table.to_string())
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
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
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
