use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::ConfigError;

/// Font and box metrics shared by the measurement surface and the renderer.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct StyleMetrics {
    pub font_size: f32,
    pub line_height: f32,
    pub content_max_width: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub padding_left: f32,
    pub padding_right: f32,
    /// Horizontal padding on each side of every word box.
    pub word_padding_x: f32,
    /// Vertical padding above and below every word box.
    pub word_padding_y: f32,
    /// Height reserved for the lesson title above the text.
    pub title_allowance: f32,
}

impl Default for StyleMetrics {
    fn default() -> Self {
        Self {
            font_size: 18.0,
            line_height: 37.8,
            content_max_width: 600.0,
            padding_top: 8.0,
            padding_bottom: 8.0,
            padding_left: 1.0,
            padding_right: 1.0,
            word_padding_x: 1.0,
            word_padding_y: 2.0,
            title_allowance: 80.0,
        }
    }
}

impl StyleMetrics {
    pub fn vertical_padding(&self) -> f32 {
        self.padding_top + self.padding_bottom
    }

    pub fn horizontal_padding(&self) -> f32 {
        self.padding_left + self.padding_right
    }
}

/// Spacing rules for the floating word toolbar.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PlacementParams {
    /// Distance between the anchor and the toolbar.
    pub gap: f32,
    /// Minimum distance to keep from every viewport edge.
    pub edge_margin: f32,
    pub max_width: f32,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self { gap: 6.0, edge_margin: 8.0, max_width: 340.0 }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct SelectionConfig {
    pub max_phrase_span: usize,
    /// Words kept in the preview of an invalid selection.
    pub preview_words: usize,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self { max_phrase_span: 9, preview_words: 9 }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct NavigationConfig {
    pub controls_hide_after_ms: u64,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self { controls_hide_after_ms: 2500 }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub lesson_path: Option<PathBuf>,
    pub translations_path: Option<PathBuf>,
    pub layout: StyleMetrics,
    pub toolbar: PlacementParams,
    pub selection: SelectionConfig,
    pub navigation: NavigationConfig,
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config, ConfigError> {
    let contents = fs::read_to_string(file_path).map_err(|source| ConfigError::Read {
        path: file_path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str::<Config>(&contents).map_err(|source| ConfigError::Parse {
        path: file_path.to_path_buf(),
        source,
    })?;
    info!(path = %file_path.display(), "loaded config");
    Ok(config)
}

/// Like [`load_config_from_file`], but a missing file yields the defaults.
pub fn load_or_default(file_path: &Path) -> Result<Config, ConfigError> {
    if !file_path.exists() {
        warn!(path = %file_path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }
    load_config_from_file(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\nfont_size = 20.0\n\n[selection]\nmax_phrase_span = 5").unwrap();

        let config = load_config_from_file(file.path()).unwrap();
        assert_eq!(config.layout.font_size, 20.0);
        assert_eq!(config.layout.line_height, 37.8);
        assert_eq!(config.selection.max_phrase_span, 5);
        assert_eq!(config.toolbar, PlacementParams::default());
        assert!(config.lesson_path.is_none());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout\nfont_size = ").unwrap();
        assert!(matches!(load_config_from_file(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert!(matches!(
            load_config_from_file(&dir.path().join("nope.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
