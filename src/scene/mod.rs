// scene/mod.rs

pub mod camera;
pub mod components;
pub mod loader;
pub mod scene;
pub mod transform;

use std::path::PathBuf;

pub use camera::{Camera, Projection};
pub use loader::{SceneDocument, SceneLoader};
pub use scene::{CameraPose, Scene, WorldLight};
pub use transform::Transform;

// Re-export all components
pub use components::{
    Light,
    LightType,
    LocalTransform,
    MeshRenderer,
    Movement,
    Name,
    Parent,
};

use crate::renderer::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read scene {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scene document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown {kind} {name:?}")]
    UnknownAsset { kind: &'static str, name: String },
    #[error("mesh {name:?} refers to model file {path:?}, which cannot be loaded")]
    UnsupportedMesh { name: String, path: PathBuf },
    #[error("material {name:?}: {reason}")]
    InvalidMaterial { name: String, reason: String },
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl SceneError {
    pub(crate) fn unknown(kind: &'static str, name: &str) -> Self {
        SceneError::UnknownAsset {
            kind,
            name: name.to_string(),
        }
    }
}
