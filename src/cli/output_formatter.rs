use colored::*;
use crate::cli::cli_args::OutputFormat;
use crate::utils::error::DataStoreError;
use crate::utils::types::{ExecuteResult, Row, Value};

/// Formats statement results for CLI output
pub struct OutputFormatter;

impl OutputFormatter {
    /// Format SELECT rows according to the specified format
    pub fn format_rows(rows: &[Row], format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(rows),
            OutputFormat::Json => Self::format_json(rows),
            OutputFormat::Csv => Self::format_csv(rows),
        }
    }

    /// Format the outcome of a write statement
    pub fn format_execute_result(result: &ExecuteResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Csv => format!(
                "rows_affected,insert_id\n{},{}\n",
                result.rows_affected,
                result.insert_id.map(|id| id.to_string()).unwrap_or_default()
            ),
            OutputFormat::Table => {
                let mut output = format!(
                    "{} {} affected",
                    result.rows_affected.to_string().green().bold(),
                    if result.rows_affected == 1 { "row" } else { "rows" }
                );
                if let Some(id) = result.insert_id {
                    output.push_str(&format!(" (insert id {})", id.to_string().cyan()));
                }
                output
            }
        }
    }

    /// Column names across all rows, in first-seen order
    fn columns(rows: &[Row]) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in rows {
            for column in row.columns() {
                if !columns.iter().any(|c| c == column) {
                    columns.push(column.to_string());
                }
            }
        }
        columns
    }

    /// Format rows as a colored table
    fn format_table(rows: &[Row]) -> String {
        if rows.is_empty() {
            return "No results found.".dimmed().to_string();
        }

        let columns = Self::columns(rows);

        // Column widths from headers and cells
        let mut col_widths: Vec<usize> = columns.iter().map(|c| c.len().max(4)).collect();
        for row in rows {
            for (i, column) in columns.iter().enumerate() {
                let cell = Self::cell_to_string(row.get(column));
                col_widths[i] = col_widths[i].max(cell.len());
            }
        }

        let mut output = String::new();
        output.push_str(&Self::format_table_separator(&col_widths, true));
        output.push('|');
        for (i, column) in columns.iter().enumerate() {
            let header = column.bold().cyan().to_string();
            output.push_str(&format!(" {} |", Self::pad(&header, column.len(), col_widths[i])));
        }
        output.push('\n');
        output.push_str(&Self::format_table_separator(&col_widths, false));

        for row in rows {
            output.push('|');
            for (i, column) in columns.iter().enumerate() {
                let value = row.get(column);
                let plain_len = Self::cell_to_string(value).len();
                let colored = Self::format_cell_colored(value).to_string();
                output.push_str(&format!(" {} |", Self::pad(&colored, plain_len, col_widths[i])));
            }
            output.push('\n');
        }

        output.push_str(&Self::format_table_separator(&col_widths, true));
        output.push_str(&format!(
            "\n{} {}\n",
            rows.len().to_string().green().bold(),
            if rows.len() == 1 { "row" } else { "rows" }
        ));

        output
    }

    /// Right-pad text whose visible width differs from its byte length
    fn pad(text: &str, visible_len: usize, width: usize) -> String {
        format!("{}{}", text, " ".repeat(width.saturating_sub(visible_len)))
    }

    /// Format table separator line
    fn format_table_separator(col_widths: &[usize], is_border: bool) -> String {
        let edge = if is_border { '+' } else { '|' };
        let mut separator = String::new();
        separator.push(edge);
        for &width in col_widths {
            separator.push_str(&"-".repeat(width + 2));
            separator.push(edge);
        }
        separator.push('\n');
        separator
    }

    /// Format rows as a JSON array of objects
    fn format_json(rows: &[Row]) -> String {
        serde_json::to_string_pretty(rows).unwrap_or_else(|_| "[]".to_string())
    }

    /// Format rows as CSV; absent cells are empty
    fn format_csv(rows: &[Row]) -> String {
        Self::write_csv(rows).unwrap_or_default()
    }

    fn write_csv(rows: &[Row]) -> Result<String, Box<dyn std::error::Error>> {
        let columns = Self::columns(rows);
        let mut writer = csv::Writer::from_writer(Vec::new());

        writer.write_record(&columns)?;
        for row in rows {
            writer.write_record(columns.iter().map(|c| Self::cell_to_string(row.get(c))))?;
        }

        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Convert a Value to a display string
    fn value_to_string(value: &Value) -> String {
        match value {
            Value::Float(f) => format!("{:.2}", f),
            other => other.to_string(),
        }
    }

    fn cell_to_string(value: Option<&Value>) -> String {
        value.map(Self::value_to_string).unwrap_or_default()
    }

    /// Convert a cell to a colored string for table display
    fn format_cell_colored(value: Option<&Value>) -> ColoredString {
        match value {
            None => "".normal(),
            Some(Value::Text(s)) => s.normal(),
            Some(Value::Integer(i)) => i.to_string().blue(),
            Some(Value::Float(f)) => format!("{:.2}", f).blue(),
            Some(Value::Boolean(true)) => "true".green(),
            Some(Value::Boolean(false)) => "false".red(),
            Some(Value::Date(d)) => d.to_rfc3339().yellow(),
            Some(Value::Null) => "NULL".dimmed(),
        }
    }

    /// Format error message for CLI display
    pub fn format_error(error: &DataStoreError) -> String {
        format!("{} {}", "Error:".red().bold(), error.to_string().red())
    }

    /// Format success message for CLI display
    pub fn format_success(message: &str) -> String {
        format!("{} {}", "Success:".green().bold(), message)
    }

    /// Format info message for CLI display
    pub fn format_info(message: &str) -> String {
        format!("{} {}", "Info:".blue().bold(), message)
    }
}
