//! Deck configuration.
//!
//! Loaded from an optional TOML file with `SWIPEDECK__` environment variable
//! overrides layered on top. Every section has defaults, so an empty file
//! (or no file) yields the stock deck.

use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};
use crate::gesture::DEFAULT_THRESHOLD;
use crate::motion::SpringConfig;
use crate::presentation::PresentationStyle;
use crate::profile::{Profile, ProfileSet};

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "SWIPEDECK";

/// Release classification settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Absolute horizontal distance a release must exceed to dismiss.
    pub threshold: f64,
    /// Extra distance past the viewport edge a dismissed card travels.
    pub exit_margin: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            exit_margin: 100.0,
        }
    }
}

/// Animation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Animate releases; when false cards jump straight to their target.
    pub animate: bool,
    /// Render loop frame rate.
    pub fps: u32,
    /// Spring for cards leaving the stack.
    pub dismiss: SpringConfig,
    /// Spring for cards returning to rest.
    pub cancel: SpringConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            animate: true,
            fps: 60,
            dismiss: SpringConfig::dismiss(),
            cancel: SpringConfig::cancel(),
        }
    }
}

/// Terminal layout settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Rows reserved above the card area.
    pub header_rows: u16,
    /// Rows reserved below the card area.
    pub footer_rows: u16,
    /// Cells between the card area edge and the card border.
    pub card_padding: u16,
    /// Reference units per terminal column.
    pub units_per_column: f64,
    /// Reference units per terminal row (cells are about twice as tall as wide).
    pub units_per_row: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            header_rows: 1,
            footer_rows: 1,
            card_padding: 1,
            units_per_column: 4.0,
            units_per_row: 8.0,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    pub gesture: GestureConfig,
    pub presentation: PresentationStyle,
    pub motion: MotionConfig,
    pub layout: LayoutConfig,
    /// Profiles in stack order; empty means the bundled set.
    pub profiles: Vec<Profile>,
}

impl DeckConfig {
    /// Load configuration from `path` (if any) plus environment overrides.
    ///
    /// Environment variables use the form `SWIPEDECK__<SECTION>__<KEY>`,
    /// e.g. `SWIPEDECK__GESTURE__THRESHOLD=80`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist, its path is not UTF-8,
    /// or the merged configuration does not deserialize.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use swipedeck::config::DeckConfig;
    ///
    /// let config = DeckConfig::load(Some("deck.toml".as_ref()))?;
    /// # Ok::<(), swipedeck::error::DeckError>(())
    /// ```
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            let path_str = path
                .to_str()
                .ok_or_else(|| DeckError::InvalidPath(format!("{:?}", path)))?;
            if !path.exists() {
                return Err(DeckError::ConfigNotFound(path_str.to_string()));
            }
            builder = builder.add_source(File::new(path_str, FileFormat::Toml));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from a TOML string, without environment overrides.
    pub fn from_toml(source: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// The validated profile set this configuration describes.
    pub fn profile_set(&self) -> Result<ProfileSet> {
        if self.profiles.is_empty() {
            Ok(ProfileSet::builtin())
        } else {
            ProfileSet::new(self.profiles.clone())
        }
    }

    /// Render the effective configuration, with the profile list filled in.
    pub fn to_toml(&self) -> Result<String> {
        let mut effective = self.clone();
        effective.profiles = self.profile_set()?.iter().cloned().collect();
        Ok(toml::to_string_pretty(&effective)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DeckConfig::default();
        assert_eq!(config.gesture.threshold, 120.0);
        assert_eq!(config.gesture.exit_margin, 100.0);
        assert_eq!(config.presentation.max_rotation_deg, 10.0);
        assert!(config.motion.animate);
        assert_eq!(config.profile_set().unwrap().len(), 4);
    }

    #[test]
    fn test_partial_toml() {
        let config = DeckConfig::from_toml(
            r#"
            [presentation]
            max_rotation_deg = 15.0

            [motion]
            animate = false
            "#,
        )
        .unwrap();
        assert_eq!(config.presentation.max_rotation_deg, 15.0);
        assert_eq!(config.presentation.next_card_min_scale, 0.8);
        assert!(!config.motion.animate);
        assert_eq!(config.motion.fps, 60);
    }

    #[test]
    fn test_profiles_from_toml() {
        let config = DeckConfig::from_toml(
            r#"
            [[profiles]]
            id = 7
            image = "a.png"
            name = "Ada"

            [[profiles]]
            id = 8
            image = "b.png"
            "#,
        )
        .unwrap();
        let set = config.profile_set().unwrap();
        assert_eq!(set.first_id(), 7);
        assert_eq!(set.get(7).and_then(|p| p.name.clone()), Some("Ada".to_string()));
    }

    #[test]
    fn test_invalid_profile_ids_rejected() {
        let config = DeckConfig::from_toml(
            r#"
            [[profiles]]
            id = 1
            image = "a.png"

            [[profiles]]
            id = 3
            image = "b.png"
            "#,
        )
        .unwrap();
        assert!(matches!(config.profile_set(), Err(DeckError::Profiles(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = DeckConfig::load(Some(Path::new("/nonexistent/swipedeck.toml")));
        assert!(matches!(result, Err(DeckError::ConfigNotFound(_))));
    }

    #[test]
    fn test_load_file_with_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.toml");
        std::fs::write(&path, "[gesture]\nexit_margin = 10.0\n\n[layout]\nheader_rows = 3\n")
            .unwrap();

        std::env::set_var("SWIPEDECK__GESTURE__EXIT_MARGIN", "250");
        let result = DeckConfig::load(Some(&path));
        std::env::remove_var("SWIPEDECK__GESTURE__EXIT_MARGIN");

        let config = result.unwrap();
        assert_eq!(config.gesture.exit_margin, 250.0);
        assert_eq!(config.layout.header_rows, 3);
    }

    #[test]
    fn test_to_toml_round_trips() {
        let rendered = DeckConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[gesture]"));
        assert!(rendered.contains("[[profiles]]"));
        let parsed = DeckConfig::from_toml(&rendered).unwrap();
        assert_eq!(parsed.profile_set().unwrap(), ProfileSet::builtin());
        assert_eq!(parsed.gesture, GestureConfig::default());
    }
}
