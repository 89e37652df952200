use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::api::{CatalogApi, CatalogClient};
use crate::config::Config;
use crate::detail::load_detail;
use crate::display_mode::{DisplayModeSetting, FileModeStore};
use crate::feed::load_feed;
use crate::models::{DetailView, MovieSummary};
use crate::present::{DetailPage, MovieCard};
use crate::view::{DetailScreen, ListScreen, ViewState};

/// Both screens plus the source they read from.
///
/// Locks are never held across a fetch, so a newer navigation can start while an older
/// request is still in flight; the screens' tickets decide which result sticks.
#[derive(Clone)]
pub struct Catalog {
    pub api: Arc<dyn CatalogApi>,
    pub list: Arc<Mutex<ListScreen>>,
    pub detail: Arc<Mutex<DetailScreen>>,
}

impl Catalog {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            list: Arc::new(Mutex::new(ListScreen::new())),
            detail: Arc::new(Mutex::new(DetailScreen::new())),
        }
    }

    /// (Re)loads the list screen. Returns whether this fetch's result was applied.
    pub async fn refresh_list(&self) -> bool {
        let ticket = self.list.lock().await.begin();
        let result = load_feed(self.api.as_ref()).await;
        self.list.lock().await.apply(&ticket, result)
    }

    /// Navigates the detail screen to `guid`. Returns whether this fetch's result was applied.
    pub async fn open_detail(&self, guid: &str) -> bool {
        let ticket = self.detail.lock().await.begin(guid);
        let result = load_detail(self.api.as_ref(), guid).await;
        self.detail.lock().await.apply(&ticket, result)
    }
}

enum Command {
    List,
    Detail(String),
    ToggleMode,
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [] => Ok(Command::List),
        [flag] if flag == "--toggle-mode" => Ok(Command::ToggleMode),
        [flag, ..] if flag.starts_with("--") => anyhow::bail!("Unknown option: {flag}"),
        [guid] => Ok(Command::Detail(guid.clone())),
        _ => anyhow::bail!("Usage: cinedrome [<guid> | --toggle-mode]"),
    }
}

pub async fn run(config: Config, args: &[String]) -> Result<()> {
    let command = parse_args(args)?;
    let mut mode = DisplayModeSetting::load(Box::new(FileModeStore::new(&config.mode_file)));
    info!(
        mode = mode.mode().as_str(),
        background = mode.mode().background_color(),
        "Display mode"
    );

    if let Command::ToggleMode = command {
        let new_mode = mode.toggle();
        println!("Display mode: {}", new_mode.as_str());
        return Ok(());
    }

    let client = CatalogClient::from_config(&config).context("Failed to build catalog client")?;
    let catalog = Catalog::new(Arc::new(client));

    match command {
        Command::List => {
            catalog.refresh_list().await;
            println!("{}", render_list(catalog.list.lock().await.state(), &config));
        }
        Command::Detail(guid) => {
            catalog.open_detail(&guid).await;
            println!(
                "{}",
                render_detail(catalog.detail.lock().await.state(), &config)
            );
        }
        Command::ToggleMode => {}
    }
    Ok(())
}

fn render_list(state: &ViewState<Vec<MovieSummary>>, config: &Config) -> String {
    match state {
        ViewState::Loading => "Loading movies...".to_string(),
        ViewState::Empty => "No movies found.".to_string(),
        ViewState::Error(message) => message.clone(),
        ViewState::Ready(movies) => movies
            .iter()
            .map(|m| {
                let card = MovieCard::from_summary(m, &config.image_base);
                format!(
                    "{}  {}  [{}]  ★ {}  {}  {}",
                    m.watched_at.format("%Y-%m-%d"),
                    card.title,
                    card.year,
                    card.rating,
                    card.route,
                    card.poster.current()
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn render_detail(state: &ViewState<DetailView>, config: &Config) -> String {
    match state {
        ViewState::Loading => "Loading movie details...".to_string(),
        ViewState::Empty => "Movie not found.".to_string(),
        ViewState::Error(message) => message.clone(),
        ViewState::Ready(view) => DetailPage::from_view(view, &config.image_base).render(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_cli_commands() {
        assert!(matches!(parse_args(&args(&[])), Ok(Command::List)));
        assert!(matches!(
            parse_args(&args(&["--toggle-mode"])),
            Ok(Command::ToggleMode)
        ));
        assert!(matches!(
            parse_args(&args(&["movie-42"])),
            Ok(Command::Detail(g)) if g == "movie-42"
        ));
        assert!(parse_args(&args(&["--bogus"])).is_err());
        assert!(parse_args(&args(&["a", "b"])).is_err());
    }

    #[test]
    fn list_line_includes_route_and_poster() {
        let cfg = Config::default();
        let movie = MovieSummary {
            guid: "movie-42".to_string(),
            title: "Playtime".to_string(),
            poster_path: None,
            year: Some("1967".to_string()),
            member_rating: Some(5.0),
            watched_at: chrono::Utc
                .with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
                .single()
                .expect("valid date"),
        };
        let line = render_list(&ViewState::Ready(vec![movie]), &cfg);
        assert_eq!(
            line,
            format!(
                "2024-06-01  Playtime  [1967]  ★ 5  /movie/movie-42  {}",
                crate::image::POSTER_PLACEHOLDER
            )
        );
    }

    #[test]
    fn renders_terminal_list_states() {
        let cfg = Config::default();
        assert_eq!(render_list(&ViewState::Empty, &cfg), "No movies found.");
        assert_eq!(
            render_list(&ViewState::Error("Try later".to_string()), &cfg),
            "Try later"
        );
    }
}
