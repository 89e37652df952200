use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    Light,
    #[default]
    Dark,
}

impl DisplayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayMode::Light => "light",
            DisplayMode::Dark => "dark",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(DisplayMode::Light),
            "dark" => Some(DisplayMode::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Light => DisplayMode::Dark,
            DisplayMode::Dark => DisplayMode::Light,
        }
    }

    /// Page background, also used as the browser theme-color hint.
    pub fn background_color(&self) -> &'static str {
        match self {
            DisplayMode::Light => "#F5F5F5",
            DisplayMode::Dark => "#121212",
        }
    }
}

/// Where the display mode survives between sessions. Holds one string value.
pub trait ModeStore: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, value: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileModeStore {
    path: PathBuf,
}

impl FileModeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModeStore for FileModeStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text.trim().to_string()).filter(|s| !s.is_empty())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn save(&self, value: &str) -> Result<()> {
        fs::write(&self.path, value).with_context(|| format!("writing {}", self.path.display()))
    }
}

#[derive(Debug, Default)]
pub struct MemoryModeStore {
    value: Mutex<Option<String>>,
}

impl MemoryModeStore {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Mutex::new(Some(value.to_string())),
        }
    }

    pub fn value(&self) -> Option<String> {
        self.value.lock().ok().and_then(|v| v.clone())
    }
}

impl ModeStore for MemoryModeStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.value())
    }

    fn save(&self, value: &str) -> Result<()> {
        let mut guard = self
            .value
            .lock()
            .map_err(|_| anyhow::anyhow!("mode store lock poisoned"))?;
        *guard = Some(value.to_string());
        Ok(())
    }
}

/// Process-wide display mode. Read once at startup, changed only through [`toggle`].
///
/// [`toggle`]: DisplayModeSetting::toggle
pub struct DisplayModeSetting {
    mode: DisplayMode,
    store: Box<dyn ModeStore>,
}

impl DisplayModeSetting {
    pub fn load(store: Box<dyn ModeStore>) -> Self {
        let mode = match store.load() {
            Ok(Some(raw)) => DisplayMode::parse(&raw).unwrap_or_else(|| {
                warn!(value = %raw, "Unknown stored display mode, using dark");
                DisplayMode::default()
            }),
            Ok(None) => DisplayMode::default(),
            Err(e) => {
                warn!("Failed to read display mode, using dark: {:#}", e);
                DisplayMode::default()
            }
        };
        Self { mode, store }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Flips the mode and persists it. A failed write is logged; the new mode still applies.
    pub fn toggle(&mut self) -> DisplayMode {
        self.mode = self.mode.toggled();
        match self.store.save(self.mode.as_str()) {
            Ok(()) => info!(mode = self.mode.as_str(), "Display mode changed"),
            Err(e) => warn!("Failed to persist display mode: {:#}", e),
        }
        self.mode
    }
}
