use anyhow::Result;
use clap::Parser;
use feedjson::config::{self, PipelineConfig};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "feedjson")]
#[command(about = "Fetch an RSS feed and save it as normalized JSON", long_about = None)]
struct Cli {
    /// Feed URL or local file path
    #[arg(short, long, default_value = config::DEFAULT_FEED_URL)]
    url: String,
    /// Destination JSON file
    #[arg(short, long, default_value = config::DEFAULT_OUTPUT_PATH)]
    output: String,
    /// Request timeout in seconds
    #[arg(long, default_value_t = config::DEFAULT_TIMEOUT_SECS)]
    timeout: u64,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // logs go to stderr, progress lines to stdout
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let config = PipelineConfig::new(&cli.url, &cli.output, Duration::from_secs(cli.timeout));

    println!("Fetching: {}", config.locator);
    feedjson::run(&config).await?;
    println!("RSS feed data saved to {}", config.destination.display());

    Ok(())
}
