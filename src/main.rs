use anyhow::Result;
use clap::Parser;
use covidindexer::{
    process::{process_all_files, process_file},
    schema::{CanonicalSchema, Reconciler},
    sink::{EsClient, Sink},
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_INDEX: &str = "covid_summary";

/// Index COVID report data to Elasticsearch.
#[derive(Parser, Debug)]
#[command(name = "covidindexer", version)]
struct Args {
    /// Directory path of summary report files
    data_path: PathBuf,

    /// Process all files in the directory
    #[arg(long, conflicts_with = "files")]
    all: bool,

    /// List of specific files to process
    #[arg(long, num_args = 1..)]
    files: Vec<String>,

    /// Send documents to the console instead of Elasticsearch
    #[arg(long, conflicts_with_all = ["check", "index"])]
    console: bool,

    /// Scan the files and parse for data problems, without indexing
    #[arg(long, conflicts_with = "index")]
    check: bool,

    /// Name of Elasticsearch index for documents
    #[arg(long)]
    index: Option<String>,

    /// Canonical mapping declaration for the destination index
    #[arg(long, default_value = "assets/mappings/covid_summary.json")]
    schema: PathBuf,

    /// Elasticsearch endpoint
    #[arg(long, default_value = "http://localhost:9200")]
    es_url: String,

    /// Resolve ambiguous dates day-first instead of month-first
    #[arg(long)]
    day_first: bool,
}

fn main() -> Result<()> {
    // ─── init logging ────────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let args = Args::parse();
    let index = args.index.clone().unwrap_or_else(|| DEFAULT_INDEX.to_string());

    // ─── one reconciliation session per run ──────────────────────────
    let schema = CanonicalSchema::load(&args.schema)?;
    info!(fields = schema.fields().len(), "loaded canonical schema");
    let mut reconciler = Reconciler::new(schema);

    let mut sink = if args.console {
        Sink::Console
    } else if args.check {
        Sink::Check
    } else {
        Sink::Bulk(EsClient::new(&args.es_url)?)
    };

    // ─── stream files through the pipeline ───────────────────────────
    let total = if args.all {
        process_all_files(
            &mut reconciler,
            &mut sink,
            &args.data_path,
            &index,
            args.day_first,
        )?
    } else if !args.files.is_empty() {
        let mut total = 0;
        for file in &args.files {
            total += process_file(
                &mut reconciler,
                &mut sink,
                &args.data_path,
                Some(file),
                &index,
                args.day_first,
            )?;
        }
        total
    } else {
        process_file(
            &mut reconciler,
            &mut sink,
            &args.data_path,
            None,
            &index,
            args.day_first,
        )?
    };

    info!(docs = total, "done");
    Ok(())
}
