use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{VizError, VizResult};
use crate::render::Theme;

/// Durable storage for the dark/light preference.
pub trait ThemePreferenceStore {
    /// Stored raw value, `None` when nothing was saved yet.
    fn load(&self) -> VizResult<Option<String>>;
    fn save(&self, theme: Theme) -> VizResult<()>;
}

/// Restores the saved theme, defaulting to light on missing or unreadable
/// values.
#[must_use]
pub fn restore_theme<S: ThemePreferenceStore + ?Sized>(store: &S) -> Theme {
    match store.load() {
        Ok(Some(value)) => Theme::from_stored(&value),
        Ok(None) => Theme::default(),
        Err(err) => {
            warn!(error = %err, "failed to restore theme preference; using light");
            Theme::default()
        }
    }
}

/// Flips the theme and persists the new value.
pub fn toggle_theme<S: ThemePreferenceStore + ?Sized>(
    store: &S,
    current: Theme,
) -> VizResult<Theme> {
    let next = current.toggled();
    store.save(next)?;
    Ok(next)
}

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    value: RefCell<Option<String>>,
}

impl MemoryPreferenceStore {
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: RefCell::new(Some(value.into())),
        }
    }
}

impl ThemePreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> VizResult<Option<String>> {
        Ok(self.value.borrow().clone())
    }

    fn save(&self, theme: Theme) -> VizResult<()> {
        *self.value.borrow_mut() = Some(theme.as_str().to_owned());
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreferences {
    theme: String,
}

/// Preference file holding `{"theme": "dark" | "light"}`.
#[derive(Debug, Clone)]
pub struct JsonFilePreferenceStore {
    path: PathBuf,
}

impl JsonFilePreferenceStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ThemePreferenceStore for JsonFilePreferenceStore {
    fn load(&self) -> VizResult<Option<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(VizError::Preference(format!(
                    "failed to read {}: {err}",
                    self.path.display()
                )));
            }
        };
        let stored: StoredPreferences = serde_json::from_str(&raw).map_err(|err| {
            VizError::Preference(format!("failed to parse {}: {err}", self.path.display()))
        })?;
        Ok(Some(stored.theme))
    }

    fn save(&self, theme: Theme) -> VizResult<()> {
        let payload = serde_json::to_string(&StoredPreferences {
            theme: theme.as_str().to_owned(),
        })
        .map_err(|err| VizError::Preference(format!("failed to encode preferences: {err}")))?;
        fs::write(&self.path, payload).map_err(|err| {
            VizError::Preference(format!("failed to write {}: {err}", self.path.display()))
        })
    }
}
