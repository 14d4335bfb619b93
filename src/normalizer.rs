use anyhow::{anyhow, Result};

use crate::models::{
    Entry, ExtensionValue, Feed, OutputDocument, OutputEnclosure, OutputItem, OutputMeta,
};

const TURBO_CONTENT_KEY: &str = "turbo_content";

/// Reads the non-standard `turbo:content` extension of an entry.
/// Returns `None` when the entry is missing, the field is absent or empty,
/// or the field holds markup instead of text. Lookup problems are logged, never raised.
pub fn extract_turbo_content(entry: Option<&Entry>) -> Option<String> {
    let entry = entry?;

    match entry.extensions.get(TURBO_CONTENT_KEY)? {
        ExtensionValue::Text(text) if !text.is_empty() => Some(text.clone()),
        ExtensionValue::Text(_) => None,
        ExtensionValue::Nested(children) => {
            tracing::warn!(
                "Error extracting turbo content: expected text, found elements [{}]",
                children.join(", ")
            );
            None
        }
    }
}

/// Maps an acquired feed into the output document.
/// Entries keep their source order. A missing required entry field aborts
/// the whole transformation.
pub fn normalize(feed: &Feed) -> Result<OutputDocument> {
    let meta = OutputMeta {
        title: feed.title.clone(),
        link: feed.link.clone(),
        description: feed.description.clone(),
        language: feed.language.clone(),
    };

    let items = feed
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| normalize_entry(index, entry))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Normalized {} items", items.len());

    Ok(OutputDocument { meta, items })
}

fn normalize_entry(index: usize, entry: &Entry) -> Result<OutputItem> {
    let required = |value: &Option<String>, field: &str| {
        value
            .clone()
            .ok_or_else(|| anyhow!("Entry {} is missing required field `{}`", index, field))
    };

    // Only the first enclosure is modeled.
    let enclosure = entry.enclosures.first().map(|e| OutputEnclosure {
        url: e.href.clone(),
        mime_type: e.mime_type.clone(),
    });

    Ok(OutputItem {
        title: required(&entry.title, "title")?,
        link: required(&entry.link, "link")?,
        pub_date: required(&entry.published, "published")?,
        author: entry.author.clone(),
        category: entry.category.clone(),
        description: required(&entry.description, "description")?,
        content: extract_turbo_content(Some(entry)),
        enclosure,
    })
}

#[cfg(test)]
#[path = "normalizer_tests.rs"]
mod tests;
