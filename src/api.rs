use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::FetchError;
use crate::models::Scalar;

/// The remote sources the catalog reads from. No method writes anything back.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn fetch_feed(&self) -> Result<Vec<Entry<FeedRecord>>, FetchError>;
    async fn fetch_detail(&self, guid: &str) -> Result<DetailRecord, FetchError>;
    async fn fetch_credits(&self, guid: &str) -> Result<CreditsRecord, FetchError>;
}

/// One element of a JSON array, decoded on its own so a single wrong-typed element does
/// not sink the rest of the array.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<T> {
    Valid(T),
    Malformed(String),
}

impl<T> Entry<T> {
    pub fn is_malformed(&self) -> bool {
        matches!(self, Entry::Malformed(_))
    }

    pub fn valid(self) -> Option<T> {
        match self {
            Entry::Valid(record) => Some(record),
            Entry::Malformed(_) => None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Entry<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match serde_json::from_value(value) {
            Ok(record) => Entry::Valid(record),
            Err(e) => Entry::Malformed(e.to_string()),
        })
    }
}

/// Raw feed item as served by `GET /rss`. Nothing is trusted until the feed normalizer
/// has looked at it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedRecord {
    pub guid: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "watchedDate")]
    pub watched_date: Option<String>,
    #[serde(rename = "tmdbId")]
    pub tmdb_id: Option<Scalar>,
    pub poster_path: Option<String>,
    pub year: Option<Scalar>,
    #[serde(rename = "memberRating")]
    pub member_rating: Option<Scalar>,
}

/// Raw `GET /movie/{guid}` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailRecord {
    pub guid: Option<String>,
    pub title: Option<String>,
    pub year: Option<Scalar>,
    pub plot: Option<String>,
    pub genre: Option<String>,
    pub runtime: Option<Scalar>,
    #[serde(rename = "releaseDate")]
    pub release_date: Option<String>,
    pub original_language: Option<String>,
    pub budget: Option<Scalar>,
    pub revenue: Option<Scalar>,
    pub status: Option<String>,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub tagline: Option<String>,
    #[serde(rename = "imdbRating", alias = "rating")]
    pub rating: Option<Scalar>,
    pub homepage: Option<String>,
    pub director: Option<String>,
    pub production_companies: Option<String>,
    pub spoken_languages: Option<String>,
}

/// Raw `GET /movie/{guid}/credits` record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditsRecord {
    #[serde(default)]
    pub cast: Vec<Entry<CastRecord>>,
    #[serde(default)]
    pub crew: Vec<Entry<CrewRecord>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CastRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrewRecord {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub job: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let user_agent = format!("cinedrome/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5).min(timeout))
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|source| FetchError::Request {
                url: base_url.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(&config.api_url, config.timeout)
    }

    pub fn feed_url(&self) -> String {
        format!("{}/rss", self.base_url)
    }

    pub fn detail_url(&self, guid: &str) -> String {
        format!("{}/movie/{}", self.base_url, urlencoding::encode(guid))
    }

    pub fn credits_url(&self, guid: &str) -> String {
        format!("{}/credits", self.detail_url(guid))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url = %url, "GET");
        let res = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;
        let status = res.status();
        let text = res.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }
        serde_json::from_str(&text).map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn fetch_feed(&self) -> Result<Vec<Entry<FeedRecord>>, FetchError> {
        self.get_json(&self.feed_url()).await
    }

    async fn fetch_detail(&self, guid: &str) -> Result<DetailRecord, FetchError> {
        self.get_json(&self.detail_url(guid)).await
    }

    async fn fetch_credits(&self, guid: &str) -> Result<CreditsRecord, FetchError> {
        self.get_json(&self.credits_url(guid)).await
    }
}
