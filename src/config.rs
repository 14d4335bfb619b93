use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FEED_URL: &str = "https://pythoninvest.com/rss-feed-612566707351.xml";
pub const DEFAULT_OUTPUT_PATH: &str = "data/input_news_feed.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = "feedjson/0.1";

/// Everything one pipeline run needs: where the feed comes from and where the JSON goes.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// An http(s) URL or a local file path.
    pub locator: String,
    pub destination: PathBuf,
    pub timeout: Duration,
    pub user_agent: String,
}

impl PipelineConfig {
    /// Builds a config, expanding a leading `~` in the locator and destination.
    pub fn new(locator: &str, destination: &str, timeout: Duration) -> Self {
        let locator = if is_remote(locator) {
            locator.to_string()
        } else {
            shellexpand::tilde(locator).to_string()
        };

        Self {
            locator,
            destination: PathBuf::from(shellexpand::tilde(destination).as_ref()),
            timeout,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_FEED_URL,
            DEFAULT_OUTPUT_PATH,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }
}

pub fn is_remote(locator: &str) -> bool {
    locator.starts_with("http://") || locator.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.locator, DEFAULT_FEED_URL);
        assert_eq!(config.destination, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_tilde_expansion_for_paths_only() {
        let config = PipelineConfig::new("~/feed.xml", "~/out/feed.json", Duration::from_secs(1));
        assert!(!config.locator.starts_with('~'));
        assert!(!config.destination.starts_with("~"));

        let remote = PipelineConfig::new("https://x/~feed", "out.json", Duration::from_secs(1));
        assert_eq!(remote.locator, "https://x/~feed");
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("http://x/feed"));
        assert!(is_remote("https://x/feed"));
        assert!(!is_remote("feeds/local.xml"));
        assert!(!is_remote("ftp://x/feed"));
    }
}
