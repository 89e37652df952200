/// Shown whenever a poster is missing or fails to load.
pub const POSTER_PLACEHOLDER: &str = "/api/placeholder/300/450";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    Original,
    W500,
    W185,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Original => "original",
            ImageSize::W500 => "w500",
            ImageSize::W185 => "w185",
        }
    }
}

/// Joins a CDN base with a path fragment returned by the catalog (e.g. `/abc.jpg`).
pub fn image_url(base: &str, size: ImageSize, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    Some(format!(
        "{}/{}{}",
        base.trim_end_matches('/'),
        size.as_str(),
        path
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageState {
    Primary,
    Fallback,
}

/// One displayed image. After the first load failure it shows the fallback for good.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    primary: String,
    fallback: String,
    state: ImageState,
}

impl ImageSource {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
            state: ImageState::Primary,
        }
    }

    /// w500 poster with the placeholder as fallback. Without a poster path the source
    /// starts out on the placeholder.
    pub fn poster(base: &str, poster_path: Option<&str>) -> Self {
        match image_url(base, ImageSize::W500, poster_path) {
            Some(url) => Self::new(url, POSTER_PLACEHOLDER),
            None => Self {
                primary: POSTER_PLACEHOLDER.to_string(),
                fallback: POSTER_PLACEHOLDER.to_string(),
                state: ImageState::Fallback,
            },
        }
    }

    pub fn current(&self) -> &str {
        match self.state {
            ImageState::Primary => &self.primary,
            ImageState::Fallback => &self.fallback,
        }
    }

    pub fn state(&self) -> ImageState {
        self.state
    }

    /// Returns `true` if this call switched to the fallback.
    pub fn on_load_failure(&mut self) -> bool {
        match self.state {
            ImageState::Primary => {
                self.state = ImageState::Fallback;
                true
            }
            ImageState::Fallback => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://image.tmdb.org/t/p";

    #[test]
    fn builds_cdn_urls_per_size() {
        assert_eq!(
            image_url(BASE, ImageSize::W500, Some("/p.jpg")).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/p.jpg")
        );
        assert_eq!(
            image_url("https://cdn.local/t/p/", ImageSize::Original, Some("/b.jpg")).as_deref(),
            Some("https://cdn.local/t/p/original/b.jpg")
        );
        assert_eq!(image_url(BASE, ImageSize::W185, Some("")), None);
        assert_eq!(image_url(BASE, ImageSize::W185, None), None);
    }

    #[test]
    fn first_failure_switches_to_fallback_for_good() {
        let mut img = ImageSource::new("https://img/a.jpg", "/fallback.png");
        assert_eq!(img.current(), "https://img/a.jpg");
        assert_eq!(img.state(), ImageState::Primary);

        assert!(img.on_load_failure());
        assert_eq!(img.current(), "/fallback.png");

        assert!(!img.on_load_failure());
        assert_eq!(img.current(), "/fallback.png");
        assert_eq!(img.state(), ImageState::Fallback);
    }

    #[test]
    fn poster_without_path_starts_on_placeholder() {
        let img = ImageSource::poster(BASE, None);
        assert_eq!(img.current(), POSTER_PLACEHOLDER);
        assert_eq!(img.state(), ImageState::Fallback);

        let img = ImageSource::poster(BASE, Some("/x.jpg"));
        assert_eq!(img.current(), "https://image.tmdb.org/t/p/w500/x.jpg");
    }

    #[test]
    fn instances_fail_independently() {
        let mut a = ImageSource::poster(BASE, Some("/a.jpg"));
        let b = ImageSource::poster(BASE, Some("/b.jpg"));
        a.on_load_failure();
        assert_eq!(a.current(), POSTER_PLACEHOLDER);
        assert_eq!(b.current(), "https://image.tmdb.org/t/p/w500/b.jpg");
    }
}
