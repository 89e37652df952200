use tracing::{info, warn};

use crate::api::{CatalogApi, CreditsRecord, DetailRecord, Entry};
use crate::error::FetchError;
use crate::models::{CastEntry, Credits, CrewEntry, DetailView, MovieDetail, Scalar};

/// Loads the detail record for `guid`, then its credits.
///
/// Credits are only requested once the detail succeeded. A credits failure is logged and
/// leaves `credits` empty; a detail failure fails the whole load.
pub async fn load_detail(api: &dyn CatalogApi, guid: &str) -> Result<DetailView, FetchError> {
    let record = api.fetch_detail(guid).await?;
    let detail = validate_detail(guid, record)?;

    let credits = match api.fetch_credits(guid).await {
        Ok(record) => Some(build_credits(guid, record)),
        Err(e) => {
            warn!(guid = %guid, error = %e, "Credits unavailable, showing detail without cast");
            None
        }
    };

    info!(
        guid = %guid,
        title = %detail.title,
        cast = credits.as_ref().map(|c| c.cast.len()).unwrap_or(0),
        "Loaded movie detail"
    );
    Ok(DetailView { detail, credits })
}

/// Turns the raw detail record into a [`MovieDetail`] for `requested`.
pub fn validate_detail(requested: &str, record: DetailRecord) -> Result<MovieDetail, FetchError> {
    if let Some(guid) = text(record.guid) {
        if guid != requested {
            return Err(FetchError::Shape(format!(
                "detail for '{requested}' carries guid '{guid}'"
            )));
        }
    }
    let title = text(record.title)
        .ok_or_else(|| FetchError::Shape(format!("detail for '{requested}' has no title")))?;

    Ok(MovieDetail {
        id: requested.to_string(),
        title,
        plot: text(record.plot),
        genre: text(record.genre),
        runtime_minutes: positive(record.runtime.as_ref()).map(|m| m.round() as u32),
        release_date: text(record.release_date),
        year: record.year.as_ref().and_then(Scalar::as_text),
        original_language: text(record.original_language),
        budget: positive(record.budget.as_ref()).map(|b| b as i64),
        revenue: positive(record.revenue.as_ref()).map(|r| r as i64),
        status: text(record.status),
        backdrop_path: text(record.backdrop_path),
        poster_path: text(record.poster_path),
        tagline: text(record.tagline),
        rating: record.rating.as_ref().and_then(Scalar::as_f64),
        homepage: text(record.homepage),
        director: text(record.director),
        production_companies: text(record.production_companies),
        spoken_languages: text(record.spoken_languages),
    })
}

/// Credits are keyed by the identifier they were requested for. Unnamed people and entries
/// with wrong field types are dropped.
pub fn build_credits(guid: &str, record: CreditsRecord) -> Credits {
    let malformed = record.cast.iter().filter(|e| e.is_malformed()).count()
        + record.crew.iter().filter(|e| e.is_malformed()).count();
    if malformed > 0 {
        warn!(guid = %guid, malformed, "Dropping credits entries with wrong field types");
    }
    let cast = record
        .cast
        .into_iter()
        .filter_map(Entry::valid)
        .filter_map(|c| {
            Some(CastEntry {
                id: c.id.unwrap_or_default(),
                name: text(c.name)?,
                character: text(c.character),
                profile_path: text(c.profile_path),
            })
        })
        .collect();
    let crew = record
        .crew
        .into_iter()
        .filter_map(Entry::valid)
        .filter_map(|c| {
            Some(CrewEntry {
                id: c.id.unwrap_or_default(),
                name: text(c.name)?,
                job: text(c.job),
                department: text(c.department),
            })
        })
        .collect();
    Credits {
        movie_id: guid.to_string(),
        cast,
        crew,
    }
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Zero is how the backend says "unknown" for runtime, budget and revenue.
fn positive(value: Option<&Scalar>) -> Option<f64> {
    value.and_then(Scalar::as_f64).filter(|v| *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> DetailRecord {
        serde_json::from_value(value).expect("detail record")
    }

    #[test]
    fn maps_backend_record() {
        let detail = validate_detail(
            "g-1",
            record(json!({
                "guid": "g-1",
                "title": "Stalker",
                "plot": "A guide leads two men into the Zone.",
                "genre": "Drama, Science Fiction",
                "runtime": 162,
                "releaseDate": "1979-05-25",
                "original_language": "ru",
                "budget": 1000000,
                "revenue": 0,
                "status": "Released",
                "poster_path": "/poster.jpg",
                "backdrop_path": "",
                "tagline": "",
                "imdbRating": "8.1",
                "year": "1979"
            })),
        )
        .expect("valid detail");
        assert_eq!(detail.id, "g-1");
        assert_eq!(detail.runtime_minutes, Some(162));
        assert_eq!(detail.budget, Some(1_000_000));
        assert_eq!(detail.revenue, None);
        assert_eq!(detail.backdrop_path, None);
        assert_eq!(detail.tagline, None);
        assert_eq!(detail.rating, Some(8.1));
        assert_eq!(detail.year.as_deref(), Some("1979"));
    }

    #[test]
    fn missing_guid_adopts_requested_identifier() {
        let detail = validate_detail("movie-42", record(json!({ "title": "Ran" })))
            .expect("valid detail");
        assert_eq!(detail.id, "movie-42");
    }

    #[test]
    fn mismatched_guid_is_a_shape_error() {
        let err = validate_detail("a", record(json!({ "guid": "b", "title": "Wrong" })))
            .expect_err("guid mismatch");
        assert!(matches!(err, FetchError::Shape(_)));
    }

    #[test]
    fn missing_title_is_a_shape_error() {
        let err = validate_detail("a", record(json!({ "guid": "a", "title": "  " })))
            .expect_err("no title");
        assert!(matches!(err, FetchError::Shape(_)));
    }

    #[test]
    fn credits_keep_order_and_drop_unnamed() {
        let raw: CreditsRecord = serde_json::from_value(json!({
            "id": 1398,
            "cast": [
                { "id": 1, "name": "Alisa Freindlich", "character": "Wife", "profile_path": "/a.jpg" },
                { "id": 2, "name": "", "character": "Nobody" },
                { "id": 3, "name": "Aleksandr Kaydanovskiy", "character": "Stalker", "profile_path": null }
            ],
            "crew": [
                { "id": 9, "name": "Andrei Tarkovsky", "job": "Director", "department": "Directing" }
            ]
        }))
        .expect("credits record");
        let credits = build_credits("g-1", raw);
        assert_eq!(credits.movie_id, "g-1");
        let names: Vec<_> = credits.cast.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Alisa Freindlich", "Aleksandr Kaydanovskiy"]);
        assert_eq!(credits.cast[1].profile_path, None);
        assert_eq!(credits.directors(), vec!["Andrei Tarkovsky"]);
    }

    #[test]
    fn wrong_typed_credit_entries_are_dropped_individually() {
        let raw: CreditsRecord = serde_json::from_value(json!({
            "cast": [
                { "id": "12", "name": "String id" },
                { "id": 4, "name": "Nikolai Grinko", "character": "Professor" },
                null
            ],
            "crew": [
                { "id": 9, "name": "Andrei Tarkovsky", "job": "Director" },
                { "id": 10, "name": ["not", "a", "name"] }
            ]
        }))
        .expect("credits record");
        let credits = build_credits("g-1", raw);
        let names: Vec<_> = credits.cast.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Nikolai Grinko"]);
        assert_eq!(credits.directors(), vec!["Andrei Tarkovsky"]);
        assert_eq!(credits.crew.len(), 1);
    }
}
