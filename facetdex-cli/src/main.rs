use clap::{Parser, Subcommand};
use facetdex::seed::seed_catalog;
use facetdex::{Index, IndexConfig, SearchParams};
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "facetdex", about = "Faceted search over a SQLite catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Database file; created on first use
    #[arg(long, global = true, env = "FACETDEX_DB_PATH", default_value = "./facetdex.db")]
    db: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Index a generated product catalog and rebuild aggregations
    Seed {
        #[arg(long, default_value = "1000")]
        count: usize,
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Insert or replace one JSON document (pass `-` to read stdin)
    Upsert { document: String },
    /// Print stored documents
    Get {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Ranked, filtered, paginated search
    Search {
        #[arg(long)]
        sort_by: Option<String>,
        /// Facet filter, repeatable (`color:red`, `on_sale`)
        #[arg(long = "filter", short = 'f')]
        filters: Vec<String>,
        #[arg(long)]
        desc: bool,
        #[arg(long)]
        size: Option<usize>,
        #[arg(long, requires = "after")]
        start: Option<f64>,
        #[arg(long, requires = "start")]
        after: Option<i64>,
        /// Load payloads for only the first N hits
        #[arg(long)]
        documents: Option<usize>,
        /// Also print drill-down counts for the same filters
        #[arg(long)]
        with_aggregations: bool,
    },
    /// Drill-down counts and scalar statistics under the given filters
    Aggregations {
        #[arg(long = "filter", short = 'f')]
        filters: Vec<String>,
    },
    /// Recompute aggregation statistics from the result rows
    Rebuild,
    /// Compact the database file
    Reclaim,
    /// Drop every document, term and aggregation
    Reset {
        #[arg(long)]
        yes: bool,
    },
    /// Row counts per table
    Stats,
}

fn read_document(arg: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let raw = if arg == "-" {
        std::io::read_to_string(std::io::stdin())?
    } else {
        arg.to_string()
    };
    Ok(serde_json::from_str(&raw)?)
}

fn print(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = IndexConfig {
        db_path: Some(cli.db),
        ..IndexConfig::from_env()
    };
    let index = Index::with_config(config)?;

    match cli.command {
        Command::Seed { count, seed } => {
            let seeded = seed_catalog(&index, count, seed)?;
            print(&json!({"documents": seeded.documents, "results": seeded.results}))
        }
        Command::Upsert { document } => {
            let outcome = index.upsert_detailed(&read_document(&document)?)?;
            print(&json!({
                "id": outcome.id,
                "created": outcome.created,
                "results": outcome.results,
            }))
        }
        Command::Get { ids } => print(&Value::Array(index.get_many(&ids)?)),
        Command::Search {
            sort_by,
            filters,
            desc,
            size,
            start,
            after,
            documents,
            with_aggregations,
        } => {
            let params = SearchParams {
                sort_by,
                filters,
                descending: desc,
                size,
                start,
                after,
                hydrate: documents,
            };
            if with_aggregations {
                print(&serde_json::to_value(index.results(&params)?)?)
            } else {
                print(&serde_json::to_value(index.search(&params)?)?)
            }
        }
        Command::Aggregations { filters } => {
            print(&serde_json::to_value(index.aggregations(&filters)?)?)
        }
        Command::Rebuild => {
            let report = index.rebuild()?;
            print(&json!({"refreshed": report.refreshed, "orphaned": report.orphaned}))
        }
        Command::Reclaim => {
            index.reclaim()?;
            print(&serde_json::to_value(index.stats()?)?)
        }
        Command::Reset { yes } => {
            if !yes {
                return Err("reset destroys every document; pass --yes to confirm".into());
            }
            index.reset()?;
            print(&serde_json::to_value(index.stats()?)?)
        }
        Command::Stats => print(&serde_json::to_value(index.stats()?)?),
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}
