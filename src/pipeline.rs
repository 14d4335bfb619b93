use anyhow::Result;

use crate::config::PipelineConfig;
use crate::fetcher;
use crate::models::OutputDocument;
use crate::normalizer;
use crate::writer;

/// Runs fetch, normalize and write once, in that order.
/// Nothing is written if fetching or normalizing fails.
pub async fn run(config: &PipelineConfig) -> Result<OutputDocument> {
    let feed = fetcher::fetch_feed(config).await?;
    let doc = normalizer::normalize(&feed)?;
    writer::write_document(&doc, &config.destination)?;
    Ok(doc)
}
