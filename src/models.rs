use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Number of cast entries a detail page shows.
pub const TOP_CAST_LIMIT: usize = 6;

/// A JSON value the sources send either as a number or as a string (`42` vs `"42"`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(serde_json::Number),
    Text(String),
}

impl Scalar {
    /// Trimmed text form, `None` when empty.
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.trim().to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => n.as_f64(),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|v| v.is_finite())
    }
}

/// One entry of the watched list.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    pub guid: String,
    pub title: String,
    pub poster_path: Option<String>,
    pub year: Option<String>,
    pub member_rating: Option<f64>,
    pub watched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub plot: Option<String>,
    pub genre: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub release_date: Option<String>,
    pub year: Option<String>,
    pub original_language: Option<String>,
    pub budget: Option<i64>,
    pub revenue: Option<i64>,
    pub status: Option<String>,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    pub tagline: Option<String>,
    pub rating: Option<f64>,
    pub homepage: Option<String>,
    pub director: Option<String>,
    pub production_companies: Option<String>,
    pub spoken_languages: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastEntry {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrewEntry {
    pub id: i64,
    pub name: String,
    pub job: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Credits {
    pub movie_id: String,
    pub cast: Vec<CastEntry>,
    pub crew: Vec<CrewEntry>,
}

impl Credits {
    pub fn directors(&self) -> Vec<&str> {
        self.crew
            .iter()
            .filter(|c| c.job.as_deref() == Some("Director"))
            .map(|c| c.name.as_str())
            .collect()
    }
}

/// Detail page view model. `credits` is `None` when the companion fetch failed.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub detail: MovieDetail,
    pub credits: Option<Credits>,
}

impl DetailView {
    pub fn top_cast(&self) -> &[CastEntry] {
        match &self.credits {
            Some(credits) => {
                let end = credits.cast.len().min(TOP_CAST_LIMIT);
                &credits.cast[..end]
            }
            None => &[],
        }
    }
}
