//! Explorer settings loaded from `config/graph_settings.yaml`
//!
//! The YAML file is embedded at build time. Native builds may point
//! `NGO_PLAN_CONFIG_DIR` at a directory holding an override copy. Settings are
//! read through [`global_config()`], which loads once and never fails: a
//! broken override falls back to the embedded file, a broken embedded file
//! falls back to the compiled defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const EMBEDDED_SETTINGS: &str = include_str!("../config/graph_settings.yaml");
const CONFIG_DIR_ENV: &str = "NGO_PLAN_CONFIG_DIR";
const SETTINGS_FILE: &str = "graph_settings.yaml";

static SETTINGS: OnceLock<GraphSettings> = OnceLock::new();

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("unknown spring preset: {0}")]
    UnknownSpringPreset(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO",
            ConfigError::Parse(_) => "CONFIG_PARSE",
            ConfigError::UnknownSpringPreset(_) => "CONFIG_UNKNOWN_PRESET",
        }
    }
}

// =============================================================================
// SETTINGS TYPES
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub layout: LayoutSettings,
    pub interaction: InteractionSettings,
    pub edges: EdgeSettings,
    pub animation: AnimationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub row_spacing: f32,
    /// Multiplier on `row_spacing` between neighbours that are not siblings
    pub cousin_separation: f32,
    pub depth_spacing: f32,
    pub default_expanded_depth: usize,
    pub node_radius: f32,
    pub critical_node_radius: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            row_spacing: 35.0,
            cousin_separation: 2.0,
            depth_spacing: 250.0,
            default_expanded_depth: 2,
            node_radius: 6.0,
            critical_node_radius: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub highlight_clear_secs: f64,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub initial_zoom: f32,
    pub reveal_collapsed_targets: bool,
    pub hit_padding: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            highlight_clear_secs: 2.0,
            min_zoom: 0.1,
            max_zoom: 4.0,
            initial_zoom: 0.8,
            reveal_collapsed_targets: false,
            hit_padding: 6.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeSettings {
    /// Shift of the dependency curve control point towards the root, along the depth axis
    pub dependency_curve_offset: f32,
    pub dash_length: f32,
    pub gap_length: f32,
    pub arrow_size: f32,
    pub tree_stroke_width: f32,
    pub dependency_stroke_width: f32,
}

impl Default for EdgeSettings {
    fn default() -> Self {
        Self {
            dependency_curve_offset: 40.0,
            dash_length: 6.0,
            gap_length: 4.0,
            arrow_size: 8.0,
            tree_stroke_width: 1.5,
            dependency_stroke_width: 2.0,
        }
    }
}

/// Spring parameters as written in YAML
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringConfigYaml {
    pub stiffness: f32,
    pub damping: f32,
}

impl Default for SpringConfigYaml {
    fn default() -> Self {
        Self {
            stiffness: 150.0,
            damping: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    pub springs: HashMap<String, SpringConfigYaml>,
    pub exit_fade_threshold: f32,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        let springs = [
            ("fast", 300.0, 1.0),
            ("medium", 150.0, 1.0),
            ("slow", 80.0, 1.0),
            ("bouncy", 200.0, 0.5),
            ("camera", 120.0, 1.0),
            ("node", 180.0, 1.0),
        ]
        .into_iter()
        .map(|(name, stiffness, damping)| {
            (name.to_string(), SpringConfigYaml { stiffness, damping })
        })
        .collect();

        Self {
            springs,
            exit_fade_threshold: 0.02,
        }
    }
}

impl AnimationSettings {
    pub fn try_spring(&self, name: &str) -> Result<SpringConfigYaml, ConfigError> {
        self.springs
            .get(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownSpringPreset(name.to_string()))
    }

    /// Spring preset by name, falling back to the `medium` defaults
    pub fn spring(&self, name: &str) -> SpringConfigYaml {
        match self.try_spring(name) {
            Ok(spring) => spring,
            Err(err) => {
                tracing::warn!(code = err.code(), "{}, using default spring", err);
                SpringConfigYaml::default()
            }
        }
    }
}

// =============================================================================
// LOADING
// =============================================================================

impl GraphSettings {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Embedded settings, or compiled defaults if they fail to parse
    pub fn embedded() -> Self {
        Self::from_yaml_str(EMBEDDED_SETTINGS).unwrap_or_else(|err| {
            tracing::warn!(code = err.code(), "Embedded settings invalid: {}", err);
            Self::default()
        })
    }

    fn override_path() -> Option<PathBuf> {
        if cfg!(target_arch = "wasm32") {
            return None;
        }
        std::env::var(CONFIG_DIR_ENV)
            .ok()
            .map(|dir| PathBuf::from(dir).join(SETTINGS_FILE))
    }

    fn load() -> Self {
        if let Some(path) = Self::override_path() {
            match Self::load_from(&path) {
                Ok(settings) => {
                    tracing::info!(path = %path.display(), "Loaded graph settings override");
                    return settings;
                }
                Err(err) => {
                    tracing::warn!(code = err.code(), "{}, using embedded settings", err);
                }
            }
        }
        Self::embedded()
    }
}

/// Process-wide settings, loaded on first access
pub fn global_config() -> &'static GraphSettings {
    SETTINGS.get_or_init(GraphSettings::load)
}
