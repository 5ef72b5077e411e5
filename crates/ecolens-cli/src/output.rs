//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use ecolens_domain::{DataSource, Field, FieldKind, ProductRecord};
use ecolens_workflow::{FieldEditor, Level, Notification, WorkflowContext};
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

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format a product record.
    pub fn format_record(&self, record: &ProductRecord) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Table => Ok(self.format_record_table(record)),
            OutputFormat::Quiet => Ok(Self::format_record_quiet(record)),
        }
    }

    /// Format a record as a Field | Value | Source table.
    fn format_record_table(&self, record: &ProductRecord) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value", "Source"]);

        for field in Field::ALL {
            let source = if record.is_present(field) {
                record.provenance(field).label().to_string()
            } else {
                self.colorize("missing", "yellow")
            };
            builder.push_record([
                field.label().to_string(),
                record.display_value(field),
                source,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format a record as `field=value` lines, skipping unset fields.
    fn format_record_quiet(record: &ProductRecord) -> String {
        Field::ALL
            .into_iter()
            .filter_map(|field| record.get(field).map(|value| format!("{}={}", field, value)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format the editor description for one field.
    pub fn format_editor(&self, editor: &FieldEditor) -> Result<String> {
        let input = match editor.kind {
            FieldKind::Text => "text".to_string(),
            FieldKind::Choice => format!(
                "one of: {}",
                editor.choices.clone().unwrap_or_default().join(", ")
            ),
            FieldKind::Number { min, max, step } => match max {
                Some(max) => format!("number from {} to {} (step {})", min, max, step),
                None => format!("number greater than {} (step {})", min, step),
            },
        };

        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "field": editor.field,
                "label": editor.label,
                "current": editor.current,
                "initial": editor.initial,
                "input": input,
                "choices": editor.choices,
            }))?),
            OutputFormat::Quiet => Ok(editor.current.clone().unwrap_or_default()),
            OutputFormat::Table => {
                let current = editor
                    .current
                    .clone()
                    .unwrap_or_else(|| self.colorize("not set", "yellow"));
                Ok(format!(
                    "{}\n  Current: {}\n  Input:   {}",
                    self.colorize(editor.label, "cyan"),
                    current,
                    input
                ))
            }
        }
    }

    /// Format a one-line summary of where a run stands.
    pub fn status_line(&self, ctx: &WorkflowContext) -> String {
        let user = ctx.username.as_deref().unwrap_or("guest");
        format!(
            "{} | data source: {} | stage: {} | user: {}",
            self.colorize(ctx.state.as_str(), "magenta"),
            ctx.data_source.display_name(),
            ctx.page.path(),
            user
        )
    }

    /// Format a workflow notification.
    pub fn notification(&self, notification: &Notification) -> String {
        match notification.level {
            Level::Success => self.success(&notification.message),
            Level::Info => self.info(&notification.message),
            Level::Warning => self.warning(&notification.message),
            Level::Error => self.error(&notification.message),
        }
    }

    /// Format the list of selectable data sources.
    pub fn data_sources(&self, selected: DataSource) -> String {
        DataSource::ALL
            .iter()
            .map(|source| {
                let marker = if *source == selected { "* " } else { "  " };
                let line = format!("{}{:<10} {}", marker, source.as_str(), source.display_name());
                if *source == selected {
                    self.colorize(&line, "green")
                } else {
                    line
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
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
            "cyan" => text.cyan().to_string(),
            "magenta" => text.magenta().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecolens_domain::{FieldValue, LifecycleStage, MaterialType, Provenance};

    fn create_test_record() -> ProductRecord {
        let mut record = ProductRecord::new();
        record.product_name = Some("Water Bottle".to_string());
        record.material_type = Some(MaterialType::Aluminum);
        record.weight = Some(0.5);
        record.lifecycle_stage = Some(LifecycleStage::EndOfLife);
        record
            .set(Field::RecycledContent, FieldValue::Number(30.0), Provenance::User)
            .unwrap();
        record
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        assert!(output.contains("Source"));
        assert!(output.contains("0.5 kg"));
        assert!(output.contains("User Edited"));
        assert!(output.contains("AI Extracted"));
        assert!(output.contains("End of Life"));
        assert!(output.contains("missing"));
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["productName"], "Water Bottle");
        assert_eq!(value["source"]["recycledContent"], "user");
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_record(&create_test_record()).unwrap();
        assert!(output.contains("weight=0.5"));
        assert!(output.contains("lifecycleStage=end-of-life"));
        assert!(!output.contains("processingDetails"));
    }

    #[test]
    fn test_editor_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let editor = FieldEditor::for_field(&create_test_record(), Field::RecycledContent);
        let output = formatter.format_editor(&editor).unwrap();
        assert!(output.contains("Recycled Content"));
        assert!(output.contains("number from 0 to 100"));
    }

    #[test]
    fn test_notification_levels() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(
            formatter.notification(&Notification::warning("careful")),
            "⚠ careful"
        );
        assert_eq!(formatter.notification(&Notification::success("done")), "✓ done");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
