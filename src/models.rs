use serde::Serialize;
use std::collections::BTreeMap;

/// Value of a namespaced extension element found on a feed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionValue {
    /// Character data (text or CDATA).
    Text(String),
    /// The element held child elements instead of text; names are kept for diagnostics.
    Nested(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    pub href: String,
    pub mime_type: Option<String>,
}

/// One feed item as acquired from the source.
/// `None` means the source did not declare the field at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub enclosures: Vec<Enclosure>,
    pub extensions: BTreeMap<String, ExtensionValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feed {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputMeta {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputEnclosure {
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
}

// Field order here is the key order of the written JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputItem {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub author: Option<String>,
    pub category: Option<String>,
    pub description: String,
    pub content: Option<String>,
    pub enclosure: Option<OutputEnclosure>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputDocument {
    pub meta: OutputMeta,
    pub items: Vec<OutputItem>,
}
