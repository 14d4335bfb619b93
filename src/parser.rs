use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use quick_xml::encoding::Decoder;
use quick_xml::escape::{resolve_html5_entity, resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::BTreeMap;

use crate::models::{Enclosure, Entry, ExtensionValue, Feed};

/// Parses raw feed bytes into our Feed model.
/// RSS 2.0 and RSS 1.0 documents are read element by element so that text stays
/// verbatim and namespaced extensions (e.g. `turbo:content`) are kept.
/// Anything else (Atom, JSON Feed) is handed to feed-rs.
pub fn parse_feed(bytes: &[u8]) -> Result<Feed> {
    match root_element(bytes).as_deref() {
        Some("rss") | Some("rdf:RDF") => parse_rss(bytes),
        _ => parse_with_feed_rs(bytes),
    }
}

fn root_element(bytes: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(bytes);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => return Some(element_name(&e)),
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Extension map key for a prefixed element name: `turbo:content` -> `turbo_content`.
fn extension_key(name: &str) -> String {
    name.replace(':', "_")
}

fn parse_rss(bytes: &[u8]) -> Result<Feed> {
    // field content is trimmed once, when the field closes
    let mut reader = Reader::from_reader(bytes);
    let mut state = RssState::default();

    loop {
        let event = reader.read_event();
        // Follows the encoding declared in the XML prolog once it has been read.
        let decoder = reader.decoder();

        match event {
            Ok(Event::Start(e)) => state.start(&e, decoder, false)?,
            Ok(Event::Empty(e)) => state.start(&e, decoder, true)?,
            Ok(Event::Text(e)) => state.characters(&decoder.decode(&e)?),
            Ok(Event::CData(e)) => state.cdata(&decoder.decode(&e)?),
            Ok(Event::End(_)) => state.end(),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(anyhow!(
                    "XML parse error at position {}: {}",
                    reader.error_position(),
                    e
                ))
            }
            _ => {}
        }
    }

    tracing::debug!("Parsed {} RSS items", state.feed.entries.len());
    Ok(state.feed)
}

/// Resolves XML and HTML 5 entities. Text with an entity neither knows is kept as written.
fn unescape_text(raw: &str) -> String {
    let resolve = |entity: &str| {
        resolve_predefined_entity(entity).or_else(|| resolve_html5_entity(entity))
    };

    match unescape_with(raw, resolve) {
        Ok(text) => text.into_owned(),
        Err(e) => {
            tracing::warn!("Keeping text with unresolved entity as written: {}", e);
            raw.to_string()
        }
    }
}

#[derive(Default)]
struct RssState {
    feed: Feed,
    stack: Vec<String>,
    item: Option<Entry>,
    item_depth: usize,
    // depth of the channel or item child whose content is being collected
    field_depth: Option<usize>,
    // character data of the field, entities resolved
    text: String,
    // the field's content as written, inner markup included
    raw: String,
    // names of elements directly inside the field
    nested: Vec<String>,
}

impl RssState {
    fn start(&mut self, e: &BytesStart<'_>, decoder: Decoder, empty: bool) -> Result<()> {
        let name = element_name(e);
        let depth = self.stack.len();

        if let Some(field_depth) = self.field_depth {
            if depth == field_depth + 1 {
                self.nested.push(name.clone());
            }
            self.raw.push('<');
            self.raw.push_str(&decoder.decode(e)?);
            self.raw.push_str(if empty { "/>" } else { ">" });
            if !empty {
                self.stack.push(name);
            }
            return Ok(());
        }

        if self.item.is_none() && name == "item" {
            self.item = Some(Entry::default());
            self.item_depth = depth;
        } else if self.starts_field(depth) {
            self.field_depth = Some(depth);
            self.text.clear();
            self.raw.clear();
            self.nested.clear();
            if name == "enclosure" && self.item.is_some() {
                self.push_enclosure(e, decoder)?;
            }
        }

        self.stack.push(name);
        if empty {
            self.end();
        }
        Ok(())
    }

    fn starts_field(&self, depth: usize) -> bool {
        match self.item {
            Some(_) => depth == self.item_depth + 1,
            None => self.stack.last().map(String::as_str) == Some("channel"),
        }
    }

    fn characters(&mut self, raw: &str) {
        if self.field_depth.is_some() {
            self.raw.push_str(raw);
            self.text.push_str(&unescape_text(raw));
        }
    }

    fn cdata(&mut self, content: &str) {
        if self.field_depth.is_some() {
            self.raw.push_str(content);
            self.text.push_str(content);
        }
    }

    fn end(&mut self) {
        let Some(name) = self.stack.pop() else {
            return;
        };
        let depth = self.stack.len();

        match self.field_depth {
            Some(field_depth) if depth > field_depth => {
                self.raw.push_str("</");
                self.raw.push_str(&name);
                self.raw.push('>');
            }
            Some(field_depth) if depth == field_depth => {
                self.field_depth = None;
                let nested = std::mem::take(&mut self.nested);
                let text = std::mem::take(&mut self.text);
                let raw = std::mem::take(&mut self.raw);
                // markup inside a field is kept as written
                let value = if nested.is_empty() { text } else { raw };
                let value = value.trim().to_string();

                if self.item.is_some() {
                    self.assign_item_field(&name, value, nested);
                } else {
                    self.assign_channel_field(&name, value);
                }
            }
            _ => {
                if name == "item" && depth == self.item_depth {
                    if let Some(entry) = self.item.take() {
                        self.feed.entries.push(entry);
                    }
                }
            }
        }
    }

    fn assign_channel_field(&mut self, name: &str, value: String) {
        let feed = &mut self.feed;
        let slot = match name {
            "title" => &mut feed.title,
            "link" => &mut feed.link,
            "description" => &mut feed.description,
            "language" | "dc:language" => &mut feed.language,
            _ => return,
        };
        slot.get_or_insert(value);
    }

    fn assign_item_field(&mut self, name: &str, value: String, nested: Vec<String>) {
        let Some(entry) = self.item.as_mut() else {
            return;
        };

        match name {
            "title" => {
                entry.title.get_or_insert(value);
            }
            "link" => {
                entry.link.get_or_insert(value);
            }
            "description" => {
                entry.description.get_or_insert(value);
            }
            "pubDate" => entry.published = Some(value),
            // Deliberate: RDF items carry their date only as dc:date, so it stands in
            // for a missing pubDate instead of failing the required-field check.
            "dc:date" => {
                entry.published.get_or_insert(value);
            }
            "author" => entry.author = Some(value),
            "dc:creator" => {
                entry.author.get_or_insert(value);
            }
            "category" => {
                entry.category.get_or_insert(value);
            }
            name if name.contains(':') => {
                let ext = if nested.is_empty() {
                    ExtensionValue::Text(value)
                } else {
                    ExtensionValue::Nested(nested)
                };
                entry.extensions.entry(extension_key(name)).or_insert(ext);
            }
            _ => {}
        }
    }

    fn push_enclosure(&mut self, e: &BytesStart<'_>, decoder: Decoder) -> Result<()> {
        let Some(entry) = self.item.as_mut() else {
            return Ok(());
        };

        let Some(url) = e.try_get_attribute("url")? else {
            tracing::warn!("Skipping enclosure without url attribute");
            return Ok(());
        };
        let href = unescape_text(&decoder.decode(&url.value)?);
        let mime_type = match e.try_get_attribute("type")? {
            Some(attr) => Some(unescape_text(&decoder.decode(&attr.value)?)),
            None => None,
        };

        entry.enclosures.push(Enclosure { href, mime_type });
        Ok(())
    }
}

fn parse_with_feed_rs(bytes: &[u8]) -> Result<Feed> {
    let parsed = feed_rs::parser::parse(bytes).context("Failed to parse feed document")?;

    let link = parsed.links.first().map(|l| l.href.clone());
    let entries: Vec<Entry> = parsed.entries.into_iter().map(entry_from_feed_rs).collect();

    tracing::debug!("Parsed {} entries with feed-rs", entries.len());

    Ok(Feed {
        title: parsed.title.map(|t| t.content),
        link,
        description: parsed.description.map(|d| d.content),
        language: parsed.language,
        entries,
    })
}

fn entry_from_feed_rs(entry: feed_rs::model::Entry) -> Entry {
    let is_enclosure = |l: &&feed_rs::model::Link| l.rel.as_deref() == Some("enclosure");

    let enclosures = entry
        .links
        .iter()
        .filter(is_enclosure)
        .map(|l| Enclosure {
            href: l.href.clone(),
            mime_type: l.media_type.clone(),
        })
        .collect();

    let link = entry
        .links
        .iter()
        .find(|l| !is_enclosure(l))
        .map(|l| l.href.clone());

    let published = entry
        .published
        .or(entry.updated)
        .map(|d| d.with_timezone(&Utc).to_rfc2822());

    let description = match entry.summary {
        Some(summary) => Some(summary.content),
        None => entry.content.and_then(|c| c.body),
    };

    Entry {
        title: entry.title.map(|t| t.content),
        link,
        published,
        author: entry.authors.first().map(|a| a.name.clone()),
        category: entry.categories.first().map(|c| c.term.clone()),
        description,
        enclosures,
        // feed-rs does not expose unknown elements
        extensions: BTreeMap::new(),
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
