use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tmep_embedding::Embedder;
use tmep_index::{load_batch, IndexSchema, LocalIndex};
use tmep_rag::{
    generate_assessment, AnalysisOptions, ApplicationRecord, HttpGenerativeClient, RagError,
};
use tmep_risk::NO_PROVISION_FOUND;

#[derive(Parser)]
#[command(name = "tmep")]
#[command(about = "TMEP retrieval pipeline for trademark application analysis", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and chunk TMEP HTML files into a chunk artifact
    #[command(name = "build-chunks")]
    BuildChunks(BuildChunksArgs),

    /// Embed a chunk artifact with passage-role encoding
    Embed(EmbedArgs),

    /// Load an embedded artifact into the vector index
    Load(LoadArgs),

    /// Analyze a trademark application record against the indexed corpus
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct BuildChunksArgs {
    /// Directory containing TMEP HTML files
    input_dir: PathBuf,

    /// Corpus release label, e.g. "May 2025"
    #[arg(long, env = "TMEP_DOC_VERSION")]
    doc_version: String,

    /// Output path for the chunk artifact
    #[arg(long, short = 'o', default_value = "artifacts/chunks.json")]
    out: PathBuf,
}

#[derive(Args)]
struct EmbedArgs {
    /// Path to the chunk artifact
    #[arg(default_value = "artifacts/chunks.json")]
    chunks: PathBuf,

    /// Output path for the embedded artifact
    #[arg(long, short = 'o', default_value = "artifacts/embedded.json")]
    out: PathBuf,
}

#[derive(Args)]
struct LoadArgs {
    /// Path to the embedded artifact
    #[arg(default_value = "artifacts/embedded.json")]
    embedded: PathBuf,

    /// Index file to create or update
    #[arg(long, default_value = "artifacts/index.json")]
    index: PathBuf,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Path to the application record JSON
    record: PathBuf,

    /// Index file to search
    #[arg(long, default_value = "artifacts/index.json")]
    index: PathBuf,

    /// Corpus release to search within
    #[arg(long, env = "TMEP_DOC_VERSION")]
    doc_version: String,

    /// Number of evidence chunks to retrieve
    #[arg(long, short = 'n', default_value_t = 3)]
    top_k: usize,

    /// Generative-call timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout_seconds: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::BuildChunks(args) => run_build_chunks(args)?,
        Commands::Embed(args) => run_embed(args).await?,
        Commands::Load(args) => run_load(args).await?,
        Commands::Analyze(args) => run_analyze(args).await?,
    }

    Ok(())
}

fn run_build_chunks(args: BuildChunksArgs) -> Result<()> {
    let chunks = tmep_corpus::collect_corpus(&args.input_dir, &args.doc_version)
        .with_context(|| format!("Failed to process corpus at {}", args.input_dir.display()))?;
    tmep_corpus::write_chunks(&chunks, &args.out)?;
    eprintln!("Wrote {} chunks to {}", chunks.len(), args.out.display());
    Ok(())
}

async fn run_embed(args: EmbedArgs) -> Result<()> {
    let chunks = tmep_corpus::read_chunks(&args.chunks)
        .with_context(|| format!("Failed to read chunks from {}", args.chunks.display()))?;

    let embedder = Embedder::shared().context("Failed to initialize embedding backend")?;
    let embedded = tmep_embedding::embed_chunks(embedder, &chunks).await?;
    tmep_embedding::write_embedded_chunks(&embedded, &args.out)?;
    eprintln!(
        "Embedded {} chunks (dimension {}) to {}",
        embedded.len(),
        embedder.dimension(),
        args.out.display()
    );
    Ok(())
}

async fn run_load(args: LoadArgs) -> Result<()> {
    let batch = tmep_embedding::read_embedded_chunks(&args.embedded)
        .with_context(|| format!("Failed to read {}", args.embedded.display()))?;

    let mut index = if args.index.exists() {
        LocalIndex::load(&args.index)?
    } else {
        LocalIndex::with_path(&args.index)
    };

    let dimension = batch
        .first()
        .map(|c| c.embedding.len())
        .context("Embedded artifact is empty")?;
    let schema = IndexSchema::tmep(dimension);

    load_batch(&mut index, &schema, &batch).await?;
    index.save()?;
    eprintln!(
        "Loaded {} records into {} ({} total)",
        batch.len(),
        args.index.display(),
        index.len()
    );
    Ok(())
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.record)
        .with_context(|| format!("Failed to read record from {}", args.record.display()))?;
    let record: ApplicationRecord =
        serde_json::from_str(&raw).context("Invalid application record JSON")?;

    let index = LocalIndex::load(&args.index)
        .with_context(|| format!("Failed to load index from {}", args.index.display()))?;
    let embedder = Embedder::shared().context("Failed to initialize embedding backend")?;
    let client = HttpGenerativeClient::from_env().context("Generative client not configured")?;

    let options = AnalysisOptions {
        top_k: args.top_k,
        timeout: Duration::from_secs(args.timeout_seconds),
    };

    match generate_assessment(
        &index,
        embedder,
        &client,
        &record,
        &args.doc_version,
        &options,
    )
    .await
    {
        Ok(report) => {
            println!("{report}");
            Ok(())
        }
        // The no-evidence outcome is an answer, not a failure.
        Err(RagError::NoEvidence) => {
            println!("{NO_PROVISION_FOUND}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
