use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    time::Instant,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tf_idf_search_server::{
    add_documents, config::DEFAULT_PAGE_SIZE, paginate, process_queries, remove_duplicates,
    Document, DocumentRecord, DocumentStatus, ExecutionPolicy, MatchReport, SearchServer,
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "search-server")]
#[command(about = "In-memory TF-IDF document search", long_about = None)]
struct Cli {
    /// Space-delimited stop words
    #[arg(long, default_value = "")]
    stop_words: String,
    /// JSON-lines file of documents ({"id", "text", "status", "ratings"})
    #[arg(long)]
    docs: String,
    /// Run search, matching and removal on the rayon pool
    #[arg(long, default_value_t = false)]
    parallel: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank documents against a query
    Search {
        query: String,
        /// Status filter (actual, irrelevant, banned, removed)
        #[arg(long, default_value = "actual")]
        status: DocumentStatus,
        /// Results per printed page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show which query terms every document (or one) contains
    Match {
        query: String,
        #[arg(long)]
        id: Option<i32>,
    },
    /// Remove documents repeating the term set of an earlier one
    Dedup,
    /// Run several queries at once
    Batch {
        queries: Vec<String>,
        /// Print results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();
    let policy = if cli.parallel {
        ExecutionPolicy::Parallel
    } else {
        ExecutionPolicy::Sequential
    };

    let mut server = SearchServer::from_stop_words_text(&cli.stop_words)
        .context("invalid stop words")?;
    let start = Instant::now();
    let records = read_records(Path::new(&cli.docs))?;
    let report = add_documents(&mut server, records);
    info!(
        added = report.added.len(),
        failed = report.failed.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "documents loaded"
    );

    match cli.command {
        Commands::Search { query, status, page_size, json } => {
            let start = Instant::now();
            let documents = server.find_top_documents_with_policy(policy, &query, |_, s, _| s == status)?;
            info!(elapsed_ms = start.elapsed().as_millis() as u64, "search finished");
            if json {
                println!("{}", serde_json::to_string_pretty(&documents)?);
            } else {
                println!("Search result for query: {}", query);
                for page in &paginate(&documents, page_size) {
                    for document in page.iter() {
                        println!("{}", document);
                    }
                    println!("Page break");
                }
            }
        }
        Commands::Match { query, id } => {
            let start = Instant::now();
            let ids: Vec<i32> = match id {
                Some(id) => vec![id],
                None => server.document_ids().collect(),
            };
            println!("Document matching for query: {}", query);
            for id in ids {
                let (words, status) = server.match_document_with_policy(policy, &query, id)?;
                println!("{}", MatchReport::new(id, words, status));
            }
            info!(elapsed_ms = start.elapsed().as_millis() as u64, "matching finished");
        }
        Commands::Dedup => {
            let start = Instant::now();
            let removed = remove_duplicates(&mut server);
            info!(
                removed = removed.len(),
                remaining = server.document_count(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "duplicates removed"
            );
            for id in removed {
                println!("Found duplicate document id {}", id);
            }
        }
        Commands::Batch { queries, json } => {
            let start = Instant::now();
            let results = process_queries(&server, &queries)?;
            info!(
                queries = queries.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "batch finished"
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for (query, documents) in queries.iter().zip(&results) {
                    print_results(query, documents);
                }
            }
        }
    }
    Ok(())
}

fn read_records(path: &Path) -> Result<Vec<DocumentRecord>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut records = Vec::new();
    for (number, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: DocumentRecord = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: malformed record", path.display(), number + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn print_results(query: &str, documents: &[Document]) {
    println!("{} documents for query: {}", documents.len(), query);
    for document in documents {
        println!("{}", document);
    }
}
