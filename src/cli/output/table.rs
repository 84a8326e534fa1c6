//! Table output formatting for CLI commands
//!
//! Renders search results and subquery plans with comfy-table. Colors are
//! dropped when `NO_COLOR` is set or the terminal is dumb.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use crate::cli::output::truncate;
use crate::domain::models::RetrievedDocument;

const PASSAGE_WIDTH: usize = 80;

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format retrieved passages, closest first
    pub fn format_documents(&self, documents: &[RetrievedDocument]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Similarity").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Passage").add_attribute(Attribute::Bold),
        ]);

        for (rank, document) in documents.iter().enumerate() {
            let similarity = document.similarity();
            let score = format!("{similarity:.3}");
            let score_cell = if self.use_colors {
                Cell::new(score).fg(similarity_color(similarity))
            } else {
                Cell::new(score)
            };

            table.add_row(vec![
                Cell::new(rank + 1),
                score_cell,
                Cell::new(truncate(&document.source_id, 40)),
                Cell::new(truncate(&single_line(&document.content), PASSAGE_WIDTH)),
            ]);
        }

        table.to_string()
    }

    /// Format a numbered list of subqueries
    pub fn format_subqueries(&self, subqueries: &[String]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Subquery").add_attribute(Attribute::Bold),
        ]);

        for (n, subquery) in subqueries.iter().enumerate() {
            table.add_row(vec![Cell::new(n + 1), Cell::new(subquery)]);
        }

        table.to_string()
    }

    /// Create a base table with common settings
    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn similarity_color(similarity: f32) -> Color {
    if similarity >= 0.75 {
        Color::Green
    } else if similarity >= 0.4 {
        Color::Yellow
    } else {
        Color::Red
    }
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_documents() {
        let formatter = TableFormatter::with_config(false, Some(120));
        let documents = vec![
            RetrievedDocument::new("Closures capture\n their environment.", "docs/rust.md", 0.1),
            RetrievedDocument::new("Lists are mutable.", "docs/python.md", 0.7),
        ];

        let table = formatter.format_documents(&documents);

        assert!(table.contains("Similarity"));
        assert!(table.contains("docs/rust.md"));
        assert!(table.contains("0.900"));
        assert!(table.contains("Closures capture their environment."));
    }

    #[test]
    fn test_format_subqueries() {
        let formatter = TableFormatter::with_config(false, None);
        let table = formatter.format_subqueries(&["Parse input".to_string(), "Sort".to_string()]);

        assert!(table.contains("Parse input"));
        assert!(table.contains("Sort"));
    }

    #[test]
    fn test_no_color_env() {
        temp_env::with_var("NO_COLOR", Some("1"), || {
            assert!(!supports_color());
        });
    }
}
