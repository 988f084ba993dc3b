//! Main entry point for the jam-ranker batch tool
//!
//! Discovers snapshot files, runs the ranking pipeline over them and writes
//! the ranked contributors plus the optional duplicate report, legend and
//! metrics.

use anyhow::Result;
use clap::Parser;
use jam_ranker::config::{validate_config, AppConfig};
use jam_ranker::ingest::RecordNormalizer;
use jam_ranker::metrics::PipelineMetrics;
use jam_ranker::output;
use jam_ranker::pipeline::{RankingOutcome, RankingPipeline};
use jam_ranker::ranking::CompositeRanker;
use jam_ranker::scoring::ScoringLegend;
use jam_ranker::sources::{discover_sources, load_batches, RecordSource};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Jam Ranker - Composite contributor rankings for game-jam results
#[derive(Parser)]
#[command(
    name = "jam-ranker",
    version,
    about = "Rank game-jam contributors by a weighted composite score",
    long_about = "Jam Ranker reads game-jam result snapshots, attributes every entry to its \
                 contributors, scores them per judging category with placement multipliers \
                 and ranks them by a composite of participation, community engagement and \
                 category performance."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, value_name = "DIR", help = "Directory holding the snapshot files")]
    data_dir: Option<PathBuf>,

    /// Rankings output override
    #[arg(short, long, value_name = "FILE", help = "Where to write the rankings JSON")]
    output: Option<PathBuf>,

    /// Duplicate report output
    #[arg(
        long,
        value_name = "FILE",
        help = "Write contributors found in more than one snapshot to this file"
    )]
    duplicates: Option<PathBuf>,

    /// Scoring legend output
    #[arg(long, value_name = "FILE", help = "Write the scoring legend to this file")]
    legend: Option<PathBuf>,

    /// Metrics output
    #[arg(
        long,
        value_name = "FILE",
        help = "Write run metrics in Prometheus text format to this file"
    )]
    metrics: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Enable debug mode
    #[arg(short, long, help = "Enable debug mode with verbose logging")]
    debug: bool,

    /// Normalize sources one after another
    #[arg(long, help = "Disable parallel normalization of sources")]
    sequential: bool,

    /// Dry run mode (validate config and exit)
    #[arg(
        long,
        help = "Validate configuration, list discovered sources and exit without ranking"
    )]
    dry_run: bool,
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Display startup banner with run information
fn display_startup_banner(config: &AppConfig) {
    info!("🏆 Jam Ranker v{}", jam_ranker::VERSION);
    info!("   Service: {}", config.service.name);
    info!("   Log level: {}", config.service.log_level);
    info!(
        "   Sources: {}/{}*.{}",
        config.input.data_dir.display(),
        config.input.file_prefix,
        config.input.file_extension
    );
    info!("   Identity field: {}", config.input.identity_field);
    info!(
        "   Parallel normalization: {}",
        config.input.parallel_normalization
    );
    info!("   Rankings: {}", config.output.rankings_path.display());
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    // Apply CLI overrides
    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    if args.debug {
        config.service.log_level = "debug".to_string();
    }

    if let Some(data_dir) = &args.data_dir {
        config.input.data_dir = data_dir.clone();
    }

    if args.sequential {
        config.input.parallel_normalization = false;
    }

    if let Some(path) = &args.output {
        config.output.rankings_path = path.clone();
    }

    if let Some(path) = &args.duplicates {
        config.output.duplicates_path = Some(path.clone());
    }

    if let Some(path) = &args.legend {
        config.output.legend_path = Some(path.clone());
    }

    if let Some(path) = &args.metrics {
        config.output.metrics_path = Some(path.clone());
    }

    validate_config(&config)?;
    Ok(config)
}

/// Persist everything the run produced
async fn write_outputs(
    config: &AppConfig,
    outcome: &RankingOutcome,
    metrics: &PipelineMetrics,
) -> Result<()> {
    let out = &config.output;
    output::write_rankings(&out.rankings_path, &outcome.rankings, out.pretty).await?;

    if let (Some(path), Some(report)) = (&out.duplicates_path, &outcome.duplicates) {
        output::write_duplicates(path, report, out.pretty).await?;
    }

    if let Some(path) = &out.legend_path {
        output::write_legend(path, &ScoringLegend::current()).await?;
    }

    if let Some(path) = &out.metrics_path {
        output::write_metrics(path, metrics.render()?).await?;
    }

    Ok(())
}

async fn run(config: &AppConfig, dry_run: bool) -> Result<()> {
    let discovered = discover_sources(
        &config.input.data_dir,
        &config.input.file_prefix,
        &config.input.file_extension,
    )
    .await?;

    info!("Discovered {} snapshot files", discovered.len());
    for source in &discovered {
        info!("   {}", source.source_tag());
    }

    if dry_run {
        info!("Dry run completed - exiting without ranking");
        return Ok(());
    }

    let sources: Vec<Arc<dyn RecordSource>> = discovered
        .into_iter()
        .map(|source| Arc::new(source) as Arc<dyn RecordSource>)
        .collect();
    let batches = load_batches(&sources, config.input.max_concurrent_sources).await?;

    let metrics = Arc::new(PipelineMetrics::new()?);
    let pipeline = RankingPipeline::new(
        RecordNormalizer::new(config.normalizer_config()),
        CompositeRanker::default(),
        config.pipeline_options(),
    )
    .with_metrics(metrics.clone());

    let outcome = if config.input.parallel_normalization {
        pipeline.run_parallel(batches).await?
    } else {
        pipeline.run(&batches)
    };

    write_outputs(config, &outcome, &metrics).await?;

    if let Some(top) = outcome.rankings.first() {
        info!(
            "Top contributor: {} with composite score {:.2}",
            top.identity, top.composite_score
        );
    }
    info!(
        "✅ Ranked {} contributors in {:.2?}",
        outcome.rankings.len(),
        outcome.stats.duration
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration (CLI args can override environment/config file)
    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    // Initialize logging early (before any other operations)
    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Some(config_path) = &args.config {
        info!("Loaded configuration from: {}", config_path.display());
    }
    display_startup_banner(&config);

    if let Err(e) = run(&config, args.dry_run).await {
        error!("Ranking run failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
