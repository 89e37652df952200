use crate::image::{image_url, ImageSize, ImageSource};
use crate::models::{DetailView, MovieSummary};

pub const NOT_AVAILABLE: &str = "N/A";

/// Route of the detail page for `guid`.
pub fn detail_route(guid: &str) -> String {
    format!("/movie/{}", urlencoding::encode(guid))
}

#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub title: String,
    pub year: String,
    pub rating: String,
    pub route: String,
    pub poster: ImageSource,
}

impl MovieCard {
    pub fn from_summary(movie: &MovieSummary, image_base: &str) -> Self {
        Self {
            title: movie.title.clone(),
            year: movie.year.clone().unwrap_or_else(na),
            rating: movie
                .member_rating
                .map(|r| r.to_string())
                .unwrap_or_else(na),
            route: detail_route(&movie.guid),
            poster: ImageSource::poster(image_base, movie.poster_path.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CastLine {
    pub name: String,
    pub character: String,
    pub profile: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailPage {
    pub title: String,
    pub year: String,
    pub tagline: Option<String>,
    pub plot: String,
    pub facts: Vec<(&'static str, String)>,
    pub rating: Option<String>,
    pub stars: Option<f64>,
    pub backdrop: Option<String>,
    pub poster: Option<String>,
    pub homepage: Option<String>,
    pub cast: Vec<CastLine>,
}

impl DetailPage {
    pub fn from_view(view: &DetailView, image_base: &str) -> Self {
        let d = &view.detail;
        let director = view
            .credits
            .as_ref()
            .map(|c| c.directors().join(", "))
            .filter(|names| !names.is_empty())
            .or_else(|| d.director.clone());
        let facts = vec![
            ("Director", director.unwrap_or_else(na)),
            ("Genre", d.genre.clone().unwrap_or_else(na)),
            (
                "Runtime",
                d.runtime_minutes
                    .map(|m| format!("{m} min"))
                    .unwrap_or_else(na),
            ),
            ("Release date", d.release_date.clone().unwrap_or_else(na)),
            (
                "Language",
                d.original_language
                    .as_deref()
                    .map(str::to_uppercase)
                    .unwrap_or_else(na),
            ),
            ("Budget", d.budget.map(format_dollars).unwrap_or_else(na)),
            ("Revenue", d.revenue.map(format_dollars).unwrap_or_else(na)),
            ("Status", d.status.clone().unwrap_or_else(na)),
            ("Spoken", d.spoken_languages.clone().unwrap_or_else(na)),
            ("Production", d.production_companies.clone().unwrap_or_else(na)),
        ];
        let cast = view
            .top_cast()
            .iter()
            .map(|c| CastLine {
                name: c.name.clone(),
                character: c.character.clone().unwrap_or_else(na),
                profile: image_url(image_base, ImageSize::W185, c.profile_path.as_deref()),
            })
            .collect();

        Self {
            title: d.title.clone(),
            year: d.year.clone().unwrap_or_default(),
            tagline: d.tagline.clone(),
            plot: d.plot.clone().unwrap_or_default(),
            facts,
            rating: d.rating.map(|r| format!("{r:.1}")),
            stars: d.rating.map(five_star_score),
            backdrop: image_url(image_base, ImageSize::Original, d.backdrop_path.as_deref()),
            poster: image_url(image_base, ImageSize::W500, d.poster_path.as_deref()),
            homepage: d.homepage.clone(),
            cast,
        }
    }

    pub fn render(&self) -> String {
        let mut out = format!("{} ({})\n", self.title, self.year);
        if let Some(tagline) = &self.tagline {
            out.push_str(&format!("  \"{tagline}\"\n"));
        }
        if !self.plot.is_empty() {
            out.push_str(&format!("\n{}\n\n", self.plot));
        }
        for (label, value) in &self.facts {
            out.push_str(&format!("  {label:<13} {value}\n"));
        }
        if let (Some(rating), Some(stars)) = (&self.rating, self.stars) {
            out.push_str(&format!("  {:<13} {rating} ({stars:.1}/5)\n", "Rating"));
        }
        if let Some(homepage) = &self.homepage {
            out.push_str(&format!("  {:<13} {homepage}\n", "Homepage"));
        }
        if let Some(poster) = &self.poster {
            out.push_str(&format!("  {:<13} {poster}\n", "Poster"));
        }
        if !self.cast.is_empty() {
            out.push_str("\nCast\n");
            for c in &self.cast {
                out.push_str(&format!("  {} as {}\n", c.name, c.character));
            }
        }
        out
    }
}

/// Ten-point rating on the five-star scale.
pub fn five_star_score(rating: f64) -> f64 {
    (rating / 2.0).clamp(0.0, 5.0)
}

/// `1234567` -> `$1,234,567`.
pub fn format_dollars(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn na() -> String {
    NOT_AVAILABLE.to_string()
}
