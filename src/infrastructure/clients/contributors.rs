use crate::domain::ContributorRecord;
use crate::error::{Result, WallError};
use crate::services::parsing::parse_records;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use std::path::PathBuf;
use tracing::{error, info};

/// Where the NDJSON data file lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContributorSource {
    Url(String),
    File(PathBuf),
}

impl ContributorSource {
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            ContributorSource::Url(location.to_string())
        } else {
            ContributorSource::File(PathBuf::from(location))
        }
    }
}

pub struct ContributorClient {
    client: Client,
}

impl ContributorClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetches the raw data file. Any transport failure or non-2xx status is
    /// an error; there is no retry.
    pub async fn fetch_text(&self, source: &ContributorSource) -> Result<String> {
        match source {
            ContributorSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .header(CACHE_CONTROL, "no-store")
                    .send()
                    .await?;

                if !response.status().is_success() {
                    error!("Contributor data error: Status {}", response.status());
                    return Err(WallError::Http {
                        status: response.status().as_u16(),
                        url: url.clone(),
                    });
                }

                Ok(response.text().await?)
            }
            ContributorSource::File(path) => Ok(tokio::fs::read_to_string(path).await?),
        }
    }

    pub async fn load(&self, source: &ContributorSource) -> Result<Vec<ContributorRecord>> {
        let text = self.fetch_text(source).await?;
        let records = parse_records(&text);
        info!("Loaded {} contributors from {:?}", records.len(), source);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_location() {
        assert_eq!(
            ContributorSource::from_location("https://example.org/data/contributors.ndjson"),
            ContributorSource::Url("https://example.org/data/contributors.ndjson".to_string())
        );
        assert_eq!(
            ContributorSource::from_location("data/contributors.ndjson"),
            ContributorSource::File(PathBuf::from("data/contributors.ndjson"))
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contributors.ndjson");
        std::fs::write(
            &path,
            "{\"username\":\"ana\"}\nnot json\n\n{\"username\":\"bo\"}\n",
        )
        .unwrap();

        let client = ContributorClient::new(Client::new());
        let records = client.load(&ContributorSource::File(path)).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal() {
        let client = ContributorClient::new(Client::new());
        let result = client
            .load(&ContributorSource::File(PathBuf::from("/nonexistent/contributors.ndjson")))
            .await;
        assert!(matches!(result, Err(WallError::Io(_))));
    }
}
