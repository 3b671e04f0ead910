use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use mandelzoom_core::Complex;
use mandelzoom_render::SessionSettings;

/// Persisted driver preferences.
///
/// Every field has a default, so an older or hand-edited file with missing
/// keys still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default)]
    pub session: SessionSettings,
    /// Point zoomed toward when no `--target` is given.
    #[serde(default = "default_target")]
    pub target: Complex,
    /// Zoom requests issued per run.
    #[serde(default = "default_zooms")]
    pub zooms: u32,
    /// Replay every generated frame before exiting.
    #[serde(default)]
    pub replay_at_exit: bool,
}

fn default_target() -> Complex {
    Complex::new(-0.743643887037151, 0.131825904205330)
}
fn default_zooms() -> u32 {
    3
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            session: SessionSettings::default(),
            target: default_target(),
            zooms: default_zooms(),
            replay_at_exit: false,
        }
    }
}

impl AppPreferences {
    /// Load preferences from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                    Ok(prefs) => {
                        info!("Loaded preferences from {}", path.display());
                        return prefs;
                    }
                    Err(e) => {
                        error!("Failed to parse preferences: {e}");
                    }
                },
                Err(e) => {
                    error!("Failed to read preferences file: {e}");
                }
            }
        } else {
            debug!("No preferences file at {}", path.display());
        }
        Self::default()
    }

    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences to {}", path.display());
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("mandelzoom-prefs-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let prefs = AppPreferences::load_from(&scratch("absent.json"));
        assert_eq!(prefs, AppPreferences::default());
    }

    #[test]
    fn save_then_load() {
        let path = scratch("roundtrip.json");
        let mut prefs = AppPreferences::default();
        prefs.session.frame_delay_ms = 40;
        prefs.zooms = 7;
        prefs.save_to(&path);

        assert_eq!(AppPreferences::load_from(&path), prefs);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let prefs: AppPreferences =
            serde_json::from_str(r#"{ "session": { "zoom_factor": 4.0 }, "zooms": 1 }"#).unwrap();
        assert_eq!(prefs.session.zoom_factor, 4.0);
        assert_eq!(prefs.session.frames_per_zoom, 10);
        assert_eq!(prefs.zooms, 1);
        assert_eq!(prefs.target, default_target());
    }

    #[test]
    fn corrupt_file_gives_defaults() {
        let path = scratch("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(AppPreferences::load_from(&path), AppPreferences::default());
        let _ = fs::remove_file(&path);
    }
}
