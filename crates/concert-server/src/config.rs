//! Server Configuration
//!
//! Read from the environment (a `.env` file is loaded first when present).

use std::sync::Arc;

use concert_data::{ConcertSource, SpreadsheetSource, StaticSource};
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SITE_URL: &str = "https://meadowlarkconcerts.com";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown CONCERT_SOURCE {0:?} (expected \"static\" or \"spreadsheet\")")]
    UnknownSource(String),

    #[error("CONCERT_SHEET_URL must be set when CONCERT_SOURCE=spreadsheet")]
    MissingSheetUrl,
}

/// Where concert listings are read from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Compiled-in list
    Static,

    /// Published spreadsheet CSV
    Spreadsheet { url: String },
}

impl SourceKind {
    pub fn build(&self) -> concert_data::Result<Arc<dyn ConcertSource>> {
        Ok(match self {
            SourceKind::Static => Arc::new(StaticSource::new()),
            SourceKind::Spreadsheet { url } => Arc::new(SpreadsheetSource::new(url.clone())?),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    /// `BIND_ADDR`
    pub bind_addr: String,

    /// `SITE_URL`, used for watch links and as the checkout origin fallback
    pub site_url: String,

    /// `CONCERT_SOURCE` + `CONCERT_SHEET_URL`
    pub source: SourceKind,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let source = match lookup("CONCERT_SOURCE").as_deref().map(str::trim) {
            None | Some("" | "static") => SourceKind::Static,
            Some("spreadsheet") => {
                let url = lookup("CONCERT_SHEET_URL")
                    .filter(|u| !u.trim().is_empty())
                    .ok_or(ConfigError::MissingSheetUrl)?;
                SourceKind::Spreadsheet { url }
            }
            Some(other) => return Err(ConfigError::UnknownSource(other.to_string())),
        };

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            site_url: lookup("SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.into()),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.site_url, "https://meadowlarkconcerts.com");
        assert_eq!(config.source, SourceKind::Static);
        assert_eq!(config.source.build().unwrap().name(), "static");
    }

    #[test]
    fn test_spreadsheet_source() {
        let config = config(&[
            ("CONCERT_SOURCE", "spreadsheet"),
            ("CONCERT_SHEET_URL", "https://docs.example.com/pub?output=csv"),
        ])
        .unwrap();
        assert_eq!(
            config.source,
            SourceKind::Spreadsheet {
                url: "https://docs.example.com/pub?output=csv".into()
            }
        );
        assert_eq!(config.source.build().unwrap().name(), "spreadsheet");
    }

    #[test]
    fn test_spreadsheet_requires_url() {
        assert_eq!(config(&[("CONCERT_SOURCE", "spreadsheet")]), Err(ConfigError::MissingSheetUrl));
    }

    #[test]
    fn test_unknown_source() {
        assert_eq!(
            config(&[("CONCERT_SOURCE", "airtable")]),
            Err(ConfigError::UnknownSource("airtable".into()))
        );
    }
}
