use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::Path;

use crate::models::OutputDocument;

/// Serializes the document as UTF-8 JSON with 4-space indentation.
/// Key order follows the field order of the output model.
pub fn to_json(doc: &OutputDocument) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = Serializer::with_formatter(&mut buf, formatter);
    doc.serialize(&mut ser)?;
    Ok(String::from_utf8(buf)?)
}

/// Writes the document to `path`, creating parent directories as needed.
/// Any existing file is overwritten in place.
pub fn write_document(doc: &OutputDocument, path: &Path) -> Result<()> {
    let json = to_json(doc)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!("Wrote {} items to {}", doc.items.len(), path.display());
    Ok(())
}
