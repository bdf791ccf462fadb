use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pkgscout::config::SearchConfig;
use pkgscout::output;
use pkgscout::search::PackageSearcher;

#[derive(Parser)]
#[command(name = "pkgscout")]
#[command(version, about = "Search for packages across many package registries")]
struct Cli {
    /// Package names to search for
    #[arg(required = true)]
    packages: Vec<String>,

    /// Maximum number of registry lookups in flight at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Per-registry lookup deadline in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Path to a JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit results as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn load_config(cli: &Cli) -> anyhow::Result<SearchConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        }
        None => SearchConfig::default(),
    };
    if let Some(concurrency) = cli.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.timeout_secs = timeout_secs;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&cli)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))
}

async fn run(cli: Cli, config: SearchConfig) -> anyhow::Result<()> {
    let searcher = PackageSearcher::with_sources(config.sources())
        .concurrency(config.concurrency)
        .timeout(Duration::from_secs(config.timeout_secs));

    // Per-registry failures surface inside each result; only usage errors
    // (an empty name list, caught by clap already) can fail the search.
    let results = searcher.search_packages(&cli.packages).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", output::render_results(&results));
    }

    Ok(())
}
