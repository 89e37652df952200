use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::{info, warn};

use crate::api::{CatalogApi, Entry, FeedRecord};
use crate::error::FetchError;
use crate::models::MovieSummary;

/// Why a feed record did not make it into the visible list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Malformed,
    NotWatched,
    MissingIdentifier,
    MissingTitle,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::Malformed => "wrong field types",
            SkipReason::NotWatched => "no watched date",
            SkipReason::MissingIdentifier => "no guid and no tmdb id",
            SkipReason::MissingTitle => "no title",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub index: usize,
    pub title: Option<String>,
    pub reason: SkipReason,
    /// Decode error, for malformed records only.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedNormalization {
    pub movies: Vec<MovieSummary>,
    pub skipped: Vec<SkippedRecord>,
}

/// Fetches the watched feed and returns it normalized, most recently watched first.
///
/// Only the request itself can fail; bad records are skipped and logged.
pub async fn load_feed(api: &dyn CatalogApi) -> Result<Vec<MovieSummary>, FetchError> {
    let records = api.fetch_feed().await?;
    let total = records.len();
    let FeedNormalization { movies, skipped } = normalize(records);
    for s in &skipped {
        warn!(
            index = s.index,
            title = s.title.as_deref().unwrap_or("<untitled>"),
            reason = s.reason.as_str(),
            error = s.error.as_deref().unwrap_or_default(),
            "Skipping feed record"
        );
    }
    info!(
        total,
        kept = movies.len(),
        skipped = skipped.len(),
        "Feed normalized"
    );
    Ok(movies)
}

pub fn normalize(records: Vec<Entry<FeedRecord>>) -> FeedNormalization {
    let mut out = FeedNormalization::default();
    for (index, entry) in records.into_iter().enumerate() {
        let record = match entry {
            Entry::Valid(record) => record,
            Entry::Malformed(error) => {
                out.skipped.push(SkippedRecord {
                    index,
                    title: None,
                    reason: SkipReason::Malformed,
                    error: Some(error),
                });
                continue;
            }
        };
        match summarize(record) {
            Ok(movie) => out.movies.push(movie),
            Err((title, reason)) => out.skipped.push(SkippedRecord {
                index,
                title,
                reason,
                error: None,
            }),
        }
    }
    // sort_by is stable, so equal timestamps keep feed order
    out.movies.sort_by(|a, b| b.watched_at.cmp(&a.watched_at));
    out
}

fn summarize(record: FeedRecord) -> Result<MovieSummary, (Option<String>, SkipReason)> {
    let title = non_empty(record.title);

    let Some(watched_at) = record.watched_date.as_deref().and_then(parse_watched_date) else {
        return Err((title, SkipReason::NotWatched));
    };
    let guid = non_empty(record.guid).or_else(|| {
        record
            .tmdb_id
            .as_ref()
            .and_then(|id| id.as_text())
            .map(|id| fallback_guid(&id))
    });
    let Some(guid) = guid else {
        return Err((title, SkipReason::MissingIdentifier));
    };
    let Some(title) = title else {
        return Err((None, SkipReason::MissingTitle));
    };

    Ok(MovieSummary {
        guid,
        title,
        poster_path: non_empty(record.poster_path),
        year: record.year.as_ref().and_then(|y| y.as_text()),
        member_rating: record.member_rating.as_ref().and_then(|r| r.as_f64()),
        watched_at,
    })
}

/// Identifier used when the feed item carries no guid of its own.
pub fn fallback_guid(tmdb_id: &str) -> String {
    format!("movie-{tmdb_id}")
}

/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339 and `YYYY-MM-DD HH:MM:SS`.
pub fn parse_watched_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
