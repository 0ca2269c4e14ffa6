use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use policyfts::api::{create_router, AppState};
use policyfts::{load_documents, Config, DocumentFilter, DocumentType, SearchEngine};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Policy document search with fuzzy, field-weighted ranking", long_about = None)]
struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a single query against a document set
    Search {
        /// JSON array of documents
        #[arg(short, long)]
        documents: PathBuf,

        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long = "type")]
        document_type: Option<DocumentType>,

        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Print index statistics for a document set
    Stats {
        #[arg(short, long)]
        documents: PathBuf,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(short, long)]
        documents: Option<PathBuf>,

        #[arg(short, long)]
        addr: Option<String>,
    },
}

fn build_engine(config: &Config, documents: Option<&PathBuf>) -> Result<SearchEngine> {
    let mut engine = SearchEngine::with_config(config.search.clone());

    if let Some(path) = documents {
        let start = Instant::now();
        let docs = load_documents(path)
            .with_context(|| format!("failed to load documents from {}", path.display()))?;
        let count = docs.len();
        engine.set_documents(docs);
        tracing::info!(documents = count, elapsed = ?start.elapsed(), "indexed documents");
    }

    Ok(engine)
}

fn do_search(engine: &SearchEngine, query: &str, limit: usize, filter: &DocumentFilter) {
    let start = Instant::now();
    let results = filter.apply(engine.search(query, limit));
    let duration = start.elapsed();

    println!("Search found {} documents in {:?}", results.len(), duration);
    println!();

    for (i, result) in results.iter().enumerate() {
        println!(
            "{}. [Score: {:.4}] {} (#{}, {})",
            i + 1,
            result.score,
            result.document.name,
            result.document.id,
            result.document.category
        );
        for detail in &result.matches {
            if detail.is_fuzzy() {
                println!(
                    "     {:<12} {} ~ {}  {:.4}",
                    detail.field, detail.text, detail.matched, detail.score
                );
            } else {
                println!("     {:<12} {}  {:.4}", detail.field, detail.text, detail.score);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref()).context("failed to load configuration")?;

    match args.command {
        Command::Search {
            documents,
            limit,
            category,
            document_type,
            query,
        } => {
            let engine = build_engine(&config, Some(&documents))?;
            let query = query.join(" ");
            let limit = limit.unwrap_or(config.search.default_limit);
            let filter = DocumentFilter {
                category,
                document_type,
            };

            println!("Searching for: \"{}\"", query);
            println!();
            do_search(&engine, &query, limit, &filter);
        }
        Command::Stats { documents } => {
            let engine = build_engine(&config, Some(&documents))?;
            let snapshot = engine.snapshot();
            let stats = snapshot.stats();

            println!("Supplied documents: {}", snapshot.documents().len());
            println!("Indexed documents: {}", stats.total_documents);
            println!("Unique tokens: {}", stats.total_tokens);
            println!("Postings: {}", stats.total_postings);
            println!("Average postings per token: {:.2}", stats.avg_postings_per_token);
        }
        Command::Serve { documents, addr } => {
            if let Some(addr) = addr {
                config.server.addr = addr;
            }
            let engine = build_engine(&config, documents.as_ref())?;
            let app = create_router(Arc::new(AppState::new(engine)));

            let listener = tokio::net::TcpListener::bind(&config.server.addr)
                .await
                .with_context(|| format!("failed to bind {}", config.server.addr))?;
            tracing::info!(addr = %config.server.addr, "listening");
            axum::serve(listener, app).await.context("server error")?;
        }
    }

    Ok(())
}
