use std::path::PathBuf;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::db::DEFAULT_DB_PATH;
use crate::merge::DEFAULT_CLOCK_MARKER;

const DEFAULT_URL: &str = "https://www.marathonbet.by/su/live/popular";
const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";

/// Run settings: defaults, then `live_odds.toml`, then `LIVE_ODDS_*` env vars.
/// CLI flags are applied on top by the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub urls: Vec<String>,
    pub db_path: PathBuf,
    pub clock_marker: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Config::builder()
            .set_default("urls", vec![DEFAULT_URL])?
            .set_default("db_path", DEFAULT_DB_PATH)?
            .set_default("clock_marker", DEFAULT_CLOCK_MARKER)?
            .set_default("timeout_secs", 30_i64)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .add_source(File::with_name("live_odds").required(false))
            .add_source(
                Environment::with_prefix("LIVE_ODDS")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("urls"),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Overlay non-empty CLI values.
    pub fn with_overrides(
        mut self,
        urls: Vec<String>,
        db_path: Option<PathBuf>,
        clock_marker: Option<String>,
    ) -> Self {
        if !urls.is_empty() {
            self.urls = urls;
        }
        if let Some(p) = db_path {
            self.db_path = p;
        }
        if let Some(m) = clock_marker {
            self.clock_marker = m;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Settings {
        Settings {
            urls: vec![DEFAULT_URL.to_string()],
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            clock_marker: DEFAULT_CLOCK_MARKER.to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    #[test]
    fn empty_overrides_keep_settings() {
        let s = base().with_overrides(Vec::new(), None, None);
        assert_eq!(s.urls, vec![DEFAULT_URL.to_string()]);
        assert_eq!(s.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(s.clock_marker, "Пер.");
    }

    #[test]
    fn cli_values_win() {
        let s = base().with_overrides(
            vec!["https://a.example/live".into(), "https://b.example/live".into()],
            Some(PathBuf::from("/tmp/x.sqlite")),
            Some("HT".into()),
        );
        assert_eq!(s.urls.len(), 2);
        assert_eq!(s.db_path, PathBuf::from("/tmp/x.sqlite"));
        assert_eq!(s.clock_marker, "HT");
    }
}
