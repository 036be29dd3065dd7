//! GDP dataset loading: HTTP fetch, local file, or JSON text.

use std::path::{Path, PathBuf};

use reqwest::StatusCode;
use reqwest::blocking::Client;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::GdpDataset;

pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/GDP-data.json";

/// Environment variable that overrides [`DEFAULT_DATA_URL`].
pub const DATA_URL_ENV: &str = "GDP_DATA_URL";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("failed to parse GDP dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to read dataset file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct GdpClient {
    client: Client,
    url: String,
}

impl GdpClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }

    /// Single GET of the dataset document. No retries.
    pub fn fetch_dataset(&self) -> Result<GdpDataset, SourceError> {
        info!(url = %self.url, "fetching GDP dataset");

        let resp = self.client.get(&self.url).send().map_err(|source| SourceError::Request {
            url: self.url.clone(),
            source,
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: self.url.clone(),
                status,
            });
        }

        let body = resp.text().map_err(|source| SourceError::Request {
            url: self.url.clone(),
            source,
        })?;
        debug!(bytes = body.len(), "received dataset body");

        parse_dataset(&body)
    }
}

/// Pick the data URL: explicit value, then `GDP_DATA_URL`, then the default.
pub fn resolve_data_url(explicit: Option<&str>) -> String {
    if let Some(url) = explicit.map(str::trim).filter(|u| !u.is_empty()) {
        return url.to_string();
    }
    dotenvy::dotenv().ok();
    std::env::var(DATA_URL_ENV)
        .ok()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_URL.to_string())
}

pub fn parse_dataset(json: &str) -> Result<GdpDataset, SourceError> {
    Ok(serde_json::from_str(json)?)
}

pub fn read_dataset(path: &Path) -> Result<GdpDataset, SourceError> {
    info!(path = %path.display(), "reading GDP dataset from file");
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_dataset(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amount, PointInTime, RawRow};

    #[test]
    fn parses_gdp_document_with_metadata() {
        let json = r#"{
            "name": "Gross Domestic Product, 1 Decimal",
            "description": "Units: Billions of Dollars\nSeasonal Adjustment: Seasonally Adjusted Annual Rate",
            "frequency": "quarterly",
            "from_date": "1947-01-01",
            "to_date": "2015-07-01",
            "unknown_field": [1, 2, 3],
            "data": [["1947-01-01", 243.1], ["1947-04-01", "246.3"]]
        }"#;
        let ds = parse_dataset(json).unwrap();

        assert_eq!(ds.frequency.as_deref(), Some("quarterly"));
        assert_eq!(ds.data.len(), 2);
        assert_eq!(
            ds.data[0],
            RawRow(PointInTime::Text("1947-01-01".to_string()), Amount::Number(243.1))
        );
        assert_eq!(ds.units_note().as_deref(), Some("Units: Billions of Dollars"));
    }

    #[test]
    fn missing_data_field_is_a_parse_error() {
        let err = parse_dataset(r#"{"name": "x"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
        assert!(err.to_string().contains("failed to parse GDP dataset"));
    }

    #[test]
    fn malformed_rows_are_a_parse_error() {
        assert!(parse_dataset(r#"{"data": [["1947-01-01"]]}"#).is_err());
        assert!(parse_dataset("not json").is_err());
    }

    #[test]
    fn explicit_url_wins() {
        assert_eq!(resolve_data_url(Some(" http://localhost/gdp.json ")), "http://localhost/gdp.json");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_dataset(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
