use anyhow::{bail, Result};
use catalog_core::{build_all, build_index, BuildReport, CatalogStore, Corpus, EntityKind, IndexRegistry, MemoryStore};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build and query the in-memory catalog search index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild indexes from a JSON corpus file or directory
    Build {
        /// Corpus path (file or directory of .json snapshots)
        #[arg(long)]
        corpus: String,
        /// Only rebuild this kind (studio, scene, actor, label)
        #[arg(long)]
        kind: Option<EntityKind>,
    },
    /// Search one kind and print the matching entities
    Search {
        #[arg(long)]
        corpus: String,
        #[arg(long)]
        kind: EntityKind,
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long, default_value_t = 20)]
        take: usize,
    },
}

#[derive(Serialize)]
struct BuildSummary {
    created_at: String,
    reports: Vec<BuildReport>,
}

#[derive(Serialize)]
struct SearchOutput {
    query: String,
    kind: EntityKind,
    took_s: f64,
    total_hits: usize,
    results: Vec<serde_json::Value>,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, kind } => run_build(&corpus, kind).await,
        Commands::Search { corpus, kind, query, skip, take } => {
            run_search(&corpus, kind, query, skip, take).await
        }
    }
}

async fn run_build(corpus: &str, kind: Option<EntityKind>) -> Result<()> {
    let store = MemoryStore::new(load_corpus(Path::new(corpus))?);
    let registry = IndexRegistry::new();

    let reports = match kind {
        Some(kind) => vec![build_index(&registry, &store, kind).await?],
        None => build_all(&registry, &store).await?,
    };

    let summary = BuildSummary {
        created_at: time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "".into()),
        reports,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

async fn run_search(corpus: &str, kind: EntityKind, query: String, skip: usize, take: usize) -> Result<()> {
    let store = MemoryStore::new(load_corpus(Path::new(corpus))?);
    let registry = IndexRegistry::new();
    build_index(&registry, &store, kind).await?;

    let start = Instant::now();
    let ids = registry.search(kind, &query);
    let total_hits = ids.len();

    let mut results = Vec::new();
    for id in ids.iter().skip(skip).take(take) {
        // the index may be ahead of or behind the store; skip ids that no longer resolve
        match resolve(&store, kind, id).await? {
            Some(entity) => results.push(entity),
            None => tracing::debug!(%kind, %id, "hit no longer in store"),
        }
    }

    let output = SearchOutput { query, kind, took_s: start.elapsed().as_secs_f64(), total_hits, results };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Re-read a search hit from the authoritative store.
async fn resolve(store: &dyn CatalogStore, kind: EntityKind, id: &str) -> Result<Option<serde_json::Value>> {
    let value = match kind {
        EntityKind::Studio => store.studio(id).await?.map(serde_json::to_value).transpose()?,
        EntityKind::Scene => store.scene(id).await?.map(serde_json::to_value).transpose()?,
        EntityKind::Actor => store.actor(id).await?.map(serde_json::to_value).transpose()?,
        EntityKind::Label => store.label(id).await?.map(serde_json::to_value).transpose()?,
    };
    Ok(value)
}

/// Load one snapshot file, or merge every `.json` file under a directory in
/// file-name order.
fn load_corpus(input_path: &Path) -> Result<Corpus> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
                files.push(p.to_path_buf());
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        bail!("corpus path does not exist: {}", input_path.display());
    }

    let mut corpus = Corpus::default();
    for file in &files {
        let reader = BufReader::new(File::open(file)?);
        let part: Corpus = serde_json::from_reader(reader)?;
        tracing::debug!(file = %file.display(), studios = part.studios.len(), scenes = part.scenes.len(), "loaded corpus file");
        corpus.merge(part);
    }
    tracing::info!(files = files.len(), "corpus loaded");
    Ok(corpus)
}
