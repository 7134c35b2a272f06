use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::collapse::MIN_PREFIX_LEN;
use crate::geometry::Color;
use crate::surface::EditorOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "boxmark";
const APP_CONFIG_FILE: &str = "config.json";

/// Labeller settings from `config.json`. Missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabellerConfig {
    pub min_prefix_len: usize,
    pub handle_tolerance: i32,
    pub min_box_size: u32,
    pub stroke_width: f64,
    pub box_color: Color,
    pub selected_color: Color,
}

impl Default for LabellerConfig {
    fn default() -> Self {
        let editor = EditorOptions::default();
        Self {
            min_prefix_len: MIN_PREFIX_LEN,
            handle_tolerance: editor.handle_tolerance,
            min_box_size: editor.min_box_size,
            stroke_width: 2.0,
            box_color: Color::new(0x2e, 0xcc, 0x71),
            selected_color: Color::new(0xf3, 0x9c, 0x12),
        }
    }
}

impl LabellerConfig {
    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            handle_tolerance: self.handle_tolerance.max(1),
            min_box_size: self.min_box_size.max(1),
            ..EditorOptions::default()
        }
    }
}

pub fn load_labeller_config() -> LabellerConfig {
    let (xdg_config_home, home) = config_env_dirs();
    load_labeller_config_with(xdg_config_home.as_deref(), home.as_deref())
}

fn load_labeller_config_with(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> LabellerConfig {
    let path = match app_config_path(APP_DIR, APP_CONFIG_FILE, xdg_config_home, home) {
        Ok(p) => p,
        Err(_) => return LabellerConfig::default(),
    };
    if !path.exists() {
        return LabellerConfig::default();
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => parse_labeller_config(&contents).unwrap_or_else(|err| {
            tracing::warn!(?err, ?path, "failed to parse config.json; using defaults");
            LabellerConfig::default()
        }),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            LabellerConfig::default()
        }
    }
}

fn parse_labeller_config(contents: &str) -> Result<LabellerConfig, serde_json::Error> {
    serde_json::from_str(contents)
}

pub(crate) fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

pub(crate) fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_resolves_under_xdg_then_home_then_errors() {
        let config_file = |xdg: Option<&str>, home: Option<&str>| {
            app_config_path(
                APP_DIR,
                APP_CONFIG_FILE,
                xdg.map(Path::new),
                home.map(Path::new),
            )
        };

        assert_eq!(
            config_file(Some("/xdg"), Some("/home/u")),
            Ok(PathBuf::from("/xdg/boxmark/config.json"))
        );
        assert_eq!(
            config_file(Some(""), Some("/home/u")),
            Ok(PathBuf::from("/home/u/.config/boxmark/config.json"))
        );
        assert_eq!(
            config_file(None, None),
            Err(ConfigPathError::MissingHomeDirectory)
        );
    }

    #[test]
    fn partial_config_keeps_defaults_for_missing_keys() {
        let config = parse_labeller_config(
            r#"{ "min_prefix_len": 6, "box_color": { "r": 1, "g": 2, "b": 3 } }"#,
        )
        .expect("config should parse");
        assert_eq!(config.min_prefix_len, 6);
        assert_eq!(config.box_color, Color::new(1, 2, 3));
        assert_eq!(config.handle_tolerance, LabellerConfig::default().handle_tolerance);
        assert_eq!(config.stroke_width, 2.0);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let root = std::env::temp_dir().join(format!("boxmark-config-{}", std::process::id()));
        let config = load_labeller_config_with(Some(&root), None);
        assert_eq!(config, LabellerConfig::default());
    }

    #[test]
    fn malformed_config_file_yields_defaults() {
        let root = std::env::temp_dir().join(format!("boxmark-bad-config-{}", std::process::id()));
        let dir = root.join(APP_DIR);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(APP_CONFIG_FILE), "{ not json").unwrap();

        let config = load_labeller_config_with(Some(&root), None);
        assert_eq!(config, LabellerConfig::default());

        let _ = std::fs::remove_dir_all(root);
    }

    #[test]
    fn editor_options_floor_non_positive_values() {
        let config = LabellerConfig {
            handle_tolerance: 0,
            min_box_size: 0,
            ..LabellerConfig::default()
        };
        let options = config.editor_options();
        assert_eq!(options.handle_tolerance, 1);
        assert_eq!(options.min_box_size, 1);
    }
}
