use clap::Parser;
use colored::*;
use std::path::Path;
use tracing::debug;
use crate::cli::{CliArgs, Commands, OutputFormat, OutputFormatter};
use crate::connectors::{DataStore, MockDataStore};
use crate::engine::{Migration, StatementKind};
use crate::utils::{
    config::DataStoreConfig,
    error::{DataStoreError, DataStoreResult},
    logging::init_logging,
    types::{ExecuteResult, Row, Value},
};

/// Result of one statement run from the CLI
#[derive(Debug, Clone, PartialEq)]
pub enum StatementOutput {
    Rows(Vec<Row>),
    Affected(ExecuteResult),
}

/// Main CLI runner that handles command execution
pub struct CliRunner {
    store: MockDataStore,
}

impl CliRunner {
    /// Create a connected runner
    pub async fn new(config: DataStoreConfig) -> DataStoreResult<Self> {
        let store = MockDataStore::with_config(config)?;
        store.connect().await?;
        Ok(Self { store })
    }

    pub fn store(&self) -> &MockDataStore {
        &self.store
    }

    /// Apply a JSON migrations file
    pub async fn apply_migrations(&self, path: &Path) -> DataStoreResult<()> {
        let migrations = Migration::load_file(path)?;
        debug!(count = migrations.len(), path = %path.display(), "loaded migrations");
        self.store.migrate(&migrations).await
    }

    /// Route one statement to the read or write path
    pub async fn run_statement(
        &self,
        sql: &str,
        params: &[Value],
    ) -> DataStoreResult<StatementOutput> {
        if self.store.classify(sql) == StatementKind::Select {
            Ok(StatementOutput::Rows(self.store.query(sql, params).await?))
        } else {
            Ok(StatementOutput::Affected(self.store.execute(sql, params).await?))
        }
    }

    /// Run every `;`-separated statement of a script, without parameters
    pub async fn run_script(&self, script: &str) -> DataStoreResult<Vec<StatementOutput>> {
        let mut outputs = Vec::new();
        for statement in split_statements(script) {
            outputs.push(self.run_statement(&statement, &[]).await?);
        }
        Ok(outputs)
    }

    /// Run a script file
    pub async fn run_script_file(&self, path: &Path) -> DataStoreResult<Vec<StatementOutput>> {
        let script = std::fs::read_to_string(path).map_err(|e| {
            DataStoreError::Configuration(format!(
                "Failed to read script {}: {}",
                path.display(),
                e
            ))
        })?;
        self.run_script(&script).await
    }

    /// Summary of applied migrations and resulting tables
    pub async fn describe(&self) -> DataStoreResult<String> {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Applied Migrations:".bold()));
        for version in self.store.applied_migrations().await? {
            output.push_str(&format!("  {} {}\n", "•".green(), version.cyan()));
        }

        output.push_str(&format!("{}\n", "Tables:".bold()));
        for table in self.store.table_names().await? {
            let rows = self.store.query(&format!("SELECT * FROM {}", table), &[]).await?.len();
            output.push_str(&format!("  {} {} ({} rows)\n", "•".green(), table.cyan(), rows));
        }

        Ok(output)
    }
}

/// Split a script on `;`, dropping `--` comment lines and blank statements
pub fn split_statements(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(|chunk| {
            chunk
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}

fn format_output(output: &StatementOutput, format: OutputFormat) -> String {
    match output {
        StatementOutput::Rows(rows) => OutputFormatter::format_rows(rows, format),
        StatementOutput::Affected(result) => OutputFormatter::format_execute_result(result, format),
    }
}

async fn run_command(args: CliArgs) -> DataStoreResult<String> {
    let config = match &args.config {
        Some(path) => DataStoreConfig::from_file(path)?,
        None => DataStoreConfig::default(),
    };
    let runner = CliRunner::new(config).await?;

    match args.command {
        Commands::Query { sql, params, setup, migrations, format } => {
            if let Some(path) = migrations {
                runner.apply_migrations(&path).await?;
            }
            if let Some(path) = setup {
                runner.run_script_file(&path).await?;
            }
            let params: Vec<Value> = params.iter().map(|p| Value::parse_literal(p)).collect();
            let output = runner.run_statement(&sql, &params).await?;
            Ok(format_output(&output, format))
        }

        Commands::Script { path, migrations, format } => {
            if let Some(migrations) = migrations {
                runner.apply_migrations(&migrations).await?;
            }
            let outputs = runner.run_script_file(&path).await?;
            if args.verbose {
                let message = format!("Executed {} statements", outputs.len());
                eprintln!("{}", OutputFormatter::format_info(&message));
            }
            Ok(outputs
                .iter()
                .filter(|output| matches!(output, StatementOutput::Rows(_)))
                .map(|output| format_output(output, format))
                .collect::<Vec<_>>()
                .join("\n"))
        }

        Commands::Migrate { path } => {
            runner.apply_migrations(&path).await?;
            Ok(format!(
                "{}\n{}",
                OutputFormatter::format_success("Migrations applied"),
                runner.describe().await?
            ))
        }
    }
}

/// Main entry point for CLI execution
pub async fn run_cli() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.verbose);

    match run_command(args).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", OutputFormatter::format_error(&e));
            std::process::exit(1);
        }
    }
}
