use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use feedjson::PipelineConfig;

fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("fin_news.xml")
}

fn config_for(locator: &Path, destination: &Path) -> PipelineConfig {
    PipelineConfig::new(
        locator.to_str().unwrap(),
        destination.to_str().unwrap(),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_pipeline_writes_expected_document() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("data").join("input_news_feed.json");

    let doc = feedjson::run(&config_for(&fixture_path(), &output)).await.unwrap();
    assert_eq!(doc.items.len(), 2);

    let written = std::fs::read_to_string(&output).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();

    assert_eq!(
        value["meta"],
        serde_json::json!({
            "title": "Fin News",
            "link": "https://x",
            "description": "d",
            "language": "en"
        })
    );
    assert_eq!(
        value["items"][0],
        serde_json::json!({
            "title": "A",
            "link": "https://x/a",
            "pubDate": "Mon, 01 Jan 2024",
            "author": null,
            "category": null,
            "description": "desc",
            "content": null,
            "enclosure": {"url": "https://x/a.mp3", "type": "audio/mpeg"}
        })
    );

    let second = &value["items"][1];
    assert_eq!(second["author"], "desk@x (Market Desk)");
    assert_eq!(second["category"], "markets");
    assert_eq!(second["description"], "<p>Stocks rose.</p>");
    assert_eq!(
        second["content"],
        "<header><h1>Weekly summary</h1></header><p>NVDA up 4%</p>"
    );
    assert_eq!(second["enclosure"]["url"], "https://x/chart.png");
}

#[tokio::test]
async fn test_pipeline_key_order_and_indent() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("feed.json");

    feedjson::run(&config_for(&fixture_path(), &output)).await.unwrap();
    let written = std::fs::read_to_string(&output).unwrap();

    assert!(written.starts_with("{\n    \"meta\": {\n        \"title\": \"Fin News\","));

    let keys = [
        "\"title\"",
        "\"link\"",
        "\"pubDate\"",
        "\"author\"",
        "\"category\"",
        "\"description\"",
        "\"content\"",
        "\"enclosure\"",
    ];
    let items_start = written.find("\"items\"").unwrap();
    let mut cursor = items_start;
    for key in keys {
        let pos = written[cursor..].find(key).unwrap() + cursor;
        cursor = pos;
    }
    assert!(written[items_start..].find("\"meta\"").is_none());
}

#[tokio::test]
async fn test_pipeline_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let first = temp_dir.path().join("first.json");
    let second = temp_dir.path().join("second.json");

    feedjson::run(&config_for(&fixture_path(), &first)).await.unwrap();
    feedjson::run(&config_for(&fixture_path(), &second)).await.unwrap();

    let a = std::fs::read(&first).unwrap();
    let b = std::fs::read(&second).unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_pipeline_missing_required_field_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let feed = temp_dir.path().join("broken.xml");
    std::fs::write(
        &feed,
        r#"<rss version="2.0"><channel><title>t</title>
        <item><title>A</title><link>https://x/a</link><pubDate>Mon, 01 Jan 2024</pubDate></item>
        </channel></rss>"#,
    )
    .unwrap();
    let output = temp_dir.path().join("out").join("feed.json");

    let err = feedjson::run(&config_for(&feed, &output)).await.unwrap_err();

    assert!(err.to_string().contains("description"));
    assert!(!output.exists());
}
