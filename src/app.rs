// app.rs - headless scene runner: load a scene, render frames, verify GPU teardown
use std::path::{Path, PathBuf};

use crate::asset::Assets;
use crate::gfx::{GraphicsContext, RecordingContext};
use crate::renderer::{ForwardRenderer, FrameStats, RenderError};
use crate::scene::{Scene, SceneError, SceneLoader};
use crate::settings::{AppConfig, ConfigError};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("no scene named {0:?} in the app config")]
    MissingScene(String),
    #[error("{live} GPU objects still alive after shutdown ({invalid} invalid releases)")]
    Leak { live: usize, invalid: usize },
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Scene key; `None` uses the config's start scene.
    pub scene: Option<String>,
    pub frames: u32,
    /// Seconds advanced per frame.
    pub dt: f32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scene: None,
            frames: 1,
            dt: 1.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub scene: String,
    pub frames: Vec<FrameStats>,
    pub entities: u32,
}

impl RunReport {
    pub fn total_draw_calls(&self) -> usize {
        self.frames.iter().map(FrameStats::draw_calls).sum()
    }
}

pub struct App {
    config: AppConfig,
    base: PathBuf,
}

impl App {
    /// `base` is the directory relative asset paths resolve against.
    pub fn new(config: AppConfig, base: impl Into<PathBuf>) -> Self {
        Self {
            config,
            base: base.into(),
        }
    }

    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let config = AppConfig::load_from_path(path)?;
        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(config, base))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run against the recording backend and check that teardown released every
    /// GPU object that was created.
    pub fn dry_run(&self, options: &RunOptions) -> Result<RunReport, AppError> {
        let mut gl = RecordingContext::new();
        let report = self.run(&mut gl, options)?;

        let live = gl.live_total();
        let invalid = gl.invalid_releases();
        if live != 0 || invalid != 0 {
            return Err(AppError::Leak { live, invalid });
        }
        Ok(report)
    }

    /// Load the selected scene, render `options.frames` frames and tear everything down.
    pub fn run(
        &self,
        gl: &mut dyn GraphicsContext,
        options: &RunOptions,
    ) -> Result<RunReport, AppError> {
        let key = options
            .scene
            .clone()
            .unwrap_or_else(|| self.config.start_scene.clone());
        let value = self
            .config
            .scene(&key)
            .ok_or_else(|| AppError::MissingScene(key.clone()))?;

        // A string entry names a scene file next to the app config.
        let (document, base) = match value.as_str() {
            Some(file) => {
                let path = self.base.join(file);
                let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
                (SceneLoader::from_path(&path)?, base)
            }
            None => (SceneLoader::from_value(value)?, self.base.clone()),
        };

        let mut assets = Assets::new();
        let mut scene = Scene::new();
        let renderer_config =
            match SceneLoader::load(gl, &document, &base, &mut assets, &mut scene) {
                Ok(config) => config,
                Err(err) => {
                    assets.clear_all(gl);
                    return Err(err.into());
                }
            };

        let mut renderer =
            match ForwardRenderer::initialize(gl, self.config.resolution.size(), &renderer_config)
            {
                Ok(renderer) => renderer,
                Err(err) => {
                    assets.clear_all(gl);
                    return Err(err.into());
                }
            };

        let mut report = RunReport {
            scene: key,
            frames: Vec::with_capacity(options.frames as usize),
            entities: scene.world.len(),
        };
        for frame in 0..options.frames {
            scene.update(options.dt);
            renderer.render(gl, &scene, &assets);
            let stats = renderer.last_frame_stats();
            log::debug!("Frame {}: {:?}", frame, stats);
            report.frames.push(stats);
        }

        renderer.destroy(gl);
        assets.clear_all(gl);
        scene.clear();

        log::info!(
            "Rendered {} frames of {:?}: {} draw calls",
            report.frames.len(),
            report.scene,
            report.total_draw_calls()
        );
        Ok(report)
    }
}
