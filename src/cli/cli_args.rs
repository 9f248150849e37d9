use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// lcds - run SQL against the in-memory DataStore engine
#[derive(Parser, Debug)]
#[command(name = "lcds")]
#[command(about = "In-memory relational DataStore engine for local development and testing")]
#[command(version = "0.1.0")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    /// DataStore configuration file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute a single SQL statement
    Query {
        /// SQL statement to execute
        #[arg(value_name = "SQL")]
        sql: String,

        /// Positional parameter bound to $1, $2, ... in order of appearance
        #[arg(short, long = "param", value_name = "VALUE")]
        params: Vec<String>,

        /// SQL script run before the statement
        #[arg(short, long, value_name = "FILE")]
        setup: Option<PathBuf>,

        /// Migrations file (JSON array) applied before the statement
        #[arg(short, long, value_name = "FILE")]
        migrations: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Execute a `;`-separated SQL script
    Script {
        /// Script file
        #[arg(value_name = "FILE")]
        path: PathBuf,

        /// Migrations file (JSON array) applied before the script
        #[arg(short, long, value_name = "FILE")]
        migrations: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Apply a migrations file and report the ledger
    Migrate {
        /// Migrations file (JSON array)
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Formatted table output
    Table,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query_with_params() {
        let args = CliArgs::try_parse_from([
            "lcds",
            "query",
            "SELECT * FROM users WHERE age > $1",
            "-p",
            "30",
            "--param",
            "Bob",
            "-f",
            "json",
        ])
        .unwrap();

        match args.command {
            Commands::Query { sql, params, format, setup, migrations } => {
                assert_eq!(sql, "SELECT * FROM users WHERE age > $1");
                assert_eq!(params, vec!["30".to_string(), "Bob".to_string()]);
                assert_eq!(format, OutputFormat::Json);
                assert!(setup.is_none());
                assert!(migrations.is_none());
            }
            other => panic!("Expected Query, got {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let argv = ["lcds", "migrate", "m.json", "--verbose", "--config", "c.json"];
        let args = CliArgs::try_parse_from(argv).unwrap();

        assert!(args.verbose);
        assert_eq!(args.config, Some(PathBuf::from("c.json")));
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
    }
}
