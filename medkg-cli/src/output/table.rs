//! Table output formatting using the `tabled` crate

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, style::Style, Alignment, Modify},
};

use super::OutputConfig;

/// Table output formatter
pub struct TableOutput;

impl TableOutput {
    /// Two-column table of labelled values.
    pub fn key_values(rows: &[(&str, String)], config: &OutputConfig) -> String {
        let mut builder = Builder::default();
        for (key, value) in rows {
            builder.push_record([Self::label(key, config), value.clone()]);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        table.to_string()
    }

    /// Table with a header row. Columns listed in `numeric` are right-aligned.
    pub fn grid(
        headers: &[&str],
        rows: Vec<Vec<String>>,
        numeric: &[usize],
        config: &OutputConfig,
    ) -> String {
        if rows.is_empty() {
            return "(no results)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(headers.iter().map(|h| Self::label(h, config)));
        for row in rows {
            builder.push_record(row);
        }

        let mut table = builder.build();
        table.with(Style::rounded());
        for &col in numeric {
            table.with(Modify::new(Columns::single(col)).with(Alignment::right()));
        }
        table.to_string()
    }

    fn label(text: &str, config: &OutputConfig) -> String {
        if config.use_colors() {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Truncate a string to at most `max` characters, adding an ellipsis.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}
