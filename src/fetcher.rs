use anyhow::{anyhow, Context, Result};

use crate::config::{is_remote, PipelineConfig};
use crate::models::Feed;
use crate::parser;

/// Fetches the feed named by `config.locator` and parses it.
/// http(s) locators go over the network, anything else is read from disk.
/// Returns an error if the fetch fails or the feed is invalid.
pub async fn fetch_feed(config: &PipelineConfig) -> Result<Feed> {
    let locator = config.locator.as_str();

    let bytes = if is_remote(locator) {
        fetch_remote(config).await?
    } else {
        tokio::fs::read(locator)
            .await
            .with_context(|| format!("Failed to read feed file: {}", locator))?
    };

    let feed = parser::parse_feed(&bytes)
        .with_context(|| format!("Failed to parse feed from {}", locator))?;

    tracing::info!("Fetched {} entries from {}", feed.entries.len(), locator);
    Ok(feed)
}

async fn fetch_remote(config: &PipelineConfig) -> Result<Vec<u8>> {
    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout)
        .build()?;

    let response = client
        .get(&config.locator)
        .send()
        .await
        .with_context(|| format!("Request to {} failed", config.locator))?;

    if !response.status().is_success() {
        return Err(anyhow!("Failed to fetch feed: {}", response.status()));
    }

    let bytes = response.bytes().await?;
    Ok(bytes.to_vec())
}
