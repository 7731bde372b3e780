//! Google Books volume search.

use std::time::Duration;

use async_trait::async_trait;
use folio_model::RemoteBook;
use serde::Deserialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::traits::{BookSearchProvider, ProviderError, SearchQuery};

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";
pub const DEFAULT_MAX_RESULTS: u32 = 20;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const VOLUME_FIELDS: &str = "items(id,volumeInfo(title,authors,pageCount,industryIdentifiers))";
const NO_TITLE: &str = "No Title";
const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Clone)]
pub struct GoogleBooksConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub max_results: u32,
    pub timeout: Duration,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            max_results: DEFAULT_MAX_RESULTS,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleBooksProvider {
    client: reqwest::Client,
    config: GoogleBooksConfig,
}

impl GoogleBooksProvider {
    pub fn new(config: GoogleBooksConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GoogleBooksConfig {
        &self.config
    }

    fn volumes_url(&self, query: &str) -> Result<Url, ProviderError> {
        let endpoint = format!("{}/volumes", self.config.base_url.trim_end_matches('/'));
        let max_results = self.config.max_results.to_string();
        let mut params = vec![
            ("q", query),
            ("maxResults", max_results.as_str()),
            ("fields", VOLUME_FIELDS),
        ];
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            params.push(("key", key));
        }
        Ok(Url::parse_with_params(&endpoint, &params)?)
    }
}

#[async_trait]
impl BookSearchProvider for GoogleBooksProvider {
    #[instrument(skip(self), level = "debug")]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<RemoteBook>, ProviderError> {
        let q = query.to_query_string();
        if q.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.volumes_url(&q)?;
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "book search rejected");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let parsed: VolumesResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;
        let books = parsed.into_books();
        debug!(found = books.len(), "book search completed");
        Ok(books)
    }
}

#[derive(Debug, Default, Deserialize)]
struct VolumesResponse {
    #[serde(default)]
    items: Option<Vec<Volume>>,
}

impl VolumesResponse {
    fn into_books(self) -> Vec<RemoteBook> {
        self.items
            .unwrap_or_default()
            .into_iter()
            .filter_map(Volume::into_book)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    id: Option<String>,
    volume_info: Option<VolumeInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    page_count: Option<u32>,
    industry_identifiers: Option<Vec<IndustryIdentifier>>,
}

#[derive(Debug, Deserialize)]
struct IndustryIdentifier {
    #[serde(rename = "type")]
    kind: Option<String>,
    identifier: Option<String>,
}

impl Volume {
    fn into_book(self) -> Option<RemoteBook> {
        let info = self.volume_info?;
        let volume_id = self.id?;

        let isbn = info
            .industry_identifiers
            .as_deref()
            .and_then(preferred_isbn);

        Some(RemoteBook {
            volume_id,
            isbn,
            title: info.title.unwrap_or_else(|| NO_TITLE.to_string()),
            authors: info
                .authors
                .map(|authors| authors.join(", "))
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            page_count: info.page_count.unwrap_or(0),
        })
    }
}

fn preferred_isbn(ids: &[IndustryIdentifier]) -> Option<String> {
    let find = |kind: &str| {
        ids.iter()
            .find(|id| id.kind.as_deref() == Some(kind))
            .and_then(|id| id.identifier.as_deref())
    };
    let raw = find("ISBN_13").or_else(|| find("ISBN_10"))?;
    let cleaned = raw.replace('-', "").trim().to_string();
    (!cleaned.is_empty()).then_some(cleaned)
}
