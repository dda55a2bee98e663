//! csvql command line interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use csvql::llm::OpenAiTranslator;
use csvql::{Identifier, Pipeline, QueryOutput};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "csvql")]
#[command(about = "Natural language queries over CSV data, backed by SQLite", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, default_value = "csvql.db")]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a CSV file into a table, creating or extending it as needed
    Import {
        /// CSV file path (first row = header)
        csv: PathBuf,

        /// Target table name
        #[arg(long, default_value = "data_table")]
        table: String,
    },

    /// Ask a natural language question against a table
    Ask {
        /// Question text
        question: String,

        /// Table to query
        #[arg(long, default_value = "data_table")]
        table: String,

        /// Execute whatever the model returns, including writes
        #[arg(long)]
        allow_writes: bool,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Execute raw SQL (read-only unless --allow-writes)
    Query {
        /// SQL statement
        sql: String,

        #[arg(long)]
        allow_writes: bool,

        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Import { csv, table } => {
            let table = Identifier::normalize(&table)?;
            let mut pipeline = Pipeline::open(&cli.db)?;
            let rows = pipeline.import(&csv, &table)?;
            println!("Loaded {} rows into {}", rows, table);
        }

        Commands::Ask {
            question,
            table,
            allow_writes,
            format,
        } => {
            let table = Identifier::normalize(&table)?;
            let translator = OpenAiTranslator::from_env()?;
            let pipeline = Pipeline::open(&cli.db)?.allow_writes(allow_writes);

            let output = pipeline.ask(&translator, &question, &table).await?;
            print_output(&output, &format)?;
        }

        Commands::Query {
            sql,
            allow_writes,
            format,
        } => {
            let pipeline = Pipeline::open(&cli.db)?.allow_writes(allow_writes);
            let output = pipeline.run_sql(&sql)?;
            print_output(&output, &format)?;
        }
    }

    Ok(())
}

fn print_output(output: &QueryOutput, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(output)?);
        return Ok(());
    }

    if output.rows.is_empty() {
        println!("(no rows)");
        return Ok(());
    }

    println!("{}", output.columns.join(" | "));
    for row in &output.rows {
        let cells: Vec<String> = row.iter().map(cell_text).collect();
        println!("{}", cells.join(" | "));
    }
    println!("({} rows)", output.rows.len());
    Ok(())
}

fn cell_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
