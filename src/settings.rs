use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::Vec3;
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaderPaths {
    pub vs: PathBuf,
    pub fs: PathBuf,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vs: PathBuf::from("assets/shaders/textured.vert"),
            fs: PathBuf::from("assets/shaders/textured.frag"),
        }
    }
}

/// Vertical gradient handed to every lit draw as `sky.top`, `sky.middle` and `sky.bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyColors {
    pub top: Vec3,
    pub middle: Vec3,
    pub bottom: Vec3,
}

impl Default for SkyColors {
    fn default() -> Self {
        Self {
            top: Vec3::new(0.3, 0.6, 1.0),
            middle: Vec3::new(0.3, 0.3, 0.3),
            bottom: Vec3::new(0.1, 0.1, 0.0),
        }
    }
}

/// Optional renderer stages. A missing `sky` or `postprocess` key disables that stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfig {
    /// Sky texture path.
    pub sky: Option<PathBuf>,
    /// Fragment stage of the post-process pass.
    pub postprocess: Option<PathBuf>,
    pub sky_shader: ShaderPaths,
    pub fullscreen_vertex: PathBuf,
    pub sky_colors: SkyColors,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            sky: None,
            postprocess: None,
            sky_shader: ShaderPaths::default(),
            fullscreen_vertex: PathBuf::from("assets/shaders/fullscreen.vert"),
            sky_colors: SkyColors::default(),
        }
    }
}

impl RendererConfig {
    /// Resolve relative paths against `base`, leaving absolute ones untouched.
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(sky) = self.sky.as_mut() {
            resolve(sky);
        }
        if let Some(postprocess) = self.postprocess.as_mut() {
            resolve(postprocess);
        }
        resolve(&mut self.sky_shader.vs);
        resolve(&mut self.sky_shader.fs);
        resolve(&mut self.fullscreen_vertex);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

impl Resolution {
    pub fn size(&self) -> glam::UVec2 {
        glam::UVec2::new(self.width, self.height)
    }
}

/// Application configuration: window resolution plus named scene documents.
///
/// Window section of the app config. Only `size` affects headless runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub size: Option<Resolution>,
    pub fullscreen: bool,
}

/// Every top-level key other than `resolution`, `window` and `start-scene` is kept as a
/// raw scene document and parsed when that scene is loaded. `window.size`, when given,
/// takes precedence over `resolution`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub resolution: Resolution,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default = "AppConfig::default_start_scene", rename = "start-scene")]
    pub start_scene: String,
    #[serde(flatten)]
    pub scenes: BTreeMap<String, serde_json::Value>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            window: WindowConfig::default(),
            start_scene: Self::default_start_scene(),
            scenes: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    fn default_start_scene() -> String {
        "menu-scene".to_string()
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str::<AppConfig>(&contents).map_err(|source| {
            ConfigError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
        info!(
            "Loaded app config from {:?} ({} scenes)",
            path,
            config.scenes.len()
        );
        Ok(config.validate())
    }

    pub fn scene(&self, key: &str) -> Option<&serde_json::Value> {
        self.scenes.get(key)
    }

    fn validate(mut self) -> Self {
        if let Some(size) = self.window.size {
            self.resolution = size;
        }
        if self.resolution.width == 0 || self.resolution.height == 0 {
            warn!("Resolution must be greater than zero. Using default resolution.");
            self.resolution = Resolution::default();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_replaces_invalid_resolution() {
        let config = AppConfig {
            resolution: Resolution {
                width: 0,
                height: 480,
            },
            ..AppConfig::default()
        };
        assert_eq!(config.validate().resolution, Resolution::default());
    }

    #[test]
    fn validate_preserves_valid_values() {
        let config = AppConfig {
            resolution: Resolution {
                width: 1920,
                height: 1080,
            },
            ..AppConfig::default()
        };
        assert_eq!(config.validate().resolution.width, 1920);
    }

    #[test]
    fn renderer_config_keys_are_optional() {
        let config: RendererConfig = serde_json::from_str("{}").unwrap();
        assert!(config.sky.is_none());
        assert!(config.postprocess.is_none());
        assert_eq!(config.sky_shader, ShaderPaths::default());
        assert_eq!(
            config.fullscreen_vertex,
            PathBuf::from("assets/shaders/fullscreen.vert")
        );
        assert_eq!(config.sky_colors, SkyColors::default());
    }

    #[test]
    fn renderer_config_reads_camel_case() {
        let config: RendererConfig = serde_json::from_str(
            r#"{
                "sky": "assets/textures/sky.jpg",
                "postprocess": "assets/shaders/postprocess/vignette.frag",
                "skyColors": { "top": [0.0, 0.0, 1.0] }
            }"#,
        )
        .unwrap();
        assert_eq!(config.sky, Some(PathBuf::from("assets/textures/sky.jpg")));
        assert_eq!(config.sky_colors.top, Vec3::Z);
        assert_eq!(config.sky_colors.bottom, SkyColors::default().bottom);
    }

    #[test]
    fn relative_paths_resolve_against_base() {
        let config = RendererConfig {
            sky: Some(PathBuf::from("sky.png")),
            ..RendererConfig::default()
        }
        .resolve_paths(Path::new("/game"));
        assert_eq!(config.sky, Some(PathBuf::from("/game/sky.png")));
        assert_eq!(
            config.sky_shader.vs,
            PathBuf::from("/game/assets/shaders/textured.vert")
        );
    }

    #[test]
    fn app_config_collects_scene_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(
            &path,
            r#"{
                "window": {
                    "title": "Road Rush",
                    "size": { "width": 800, "height": 600 },
                    "fullscreen": false
                },
                "start-scene": "scene",
                "scene": { "world": [] },
                "menu-scene": { "world": [] }
            }"#,
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.resolution.width, 800);
        assert_eq!(config.start_scene, "scene");
        assert!(config.scene("menu-scene").is_some());
        assert!(config.scene("gameover-scene").is_none());
        assert!(!config.scenes.contains_key("window"));
        assert_eq!(config.window.title, "Road Rush");
    }

    #[test]
    fn resolution_key_applies_without_window_size() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "resolution": { "width": 640, "height": 360 }, "window": { "title": "t" } }"#,
        )
        .unwrap();
        let config = config.validate();
        assert_eq!(config.resolution.size(), glam::UVec2::new(640, 360));
        assert!(config.window.size.is_none());
    }

    #[test]
    fn missing_app_config_is_an_error() {
        let result = AppConfig::load_from_path("definitely/missing.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
