// renderer/material.rs - shader + textures + fixed-function state

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::asset::{Assets, Handle};
use crate::gfx::GraphicsContext;

use super::{PipelineState, Sampler, ShaderProgram, Texture};

/// Sampler uniforms of a lit material, in texture-unit order.
pub const LIT_TEXTURE_UNIFORMS: [&str; 5] = [
    "material.albedo",
    "material.specular",
    "material.roughness",
    "material.ambient_occlusion",
    "material.emissive",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    /// Flat `tint` only.
    #[default]
    Tinted,
    /// `tint` times one texture on unit 0, discarded below `alphaThreshold`.
    Textured,
    /// Up to five texture maps (see [`LIT_TEXTURE_UNIFORMS`]) shaded by the scene lights.
    Lit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureBinding {
    pub texture: Handle<Texture>,
    pub sampler: Option<Handle<Sampler>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub shader: Handle<ShaderProgram>,
    pub pipeline_state: PipelineState,
    pub transparent: bool,
    pub tint: Vec4,
    pub alpha_threshold: f32,
    pub textures: Vec<TextureBinding>,
}

impl Material {
    pub fn new(kind: MaterialKind, shader: Handle<ShaderProgram>) -> Self {
        Self {
            kind,
            shader,
            pipeline_state: PipelineState::default(),
            transparent: false,
            tint: Vec4::ONE,
            alpha_threshold: 0.0,
            textures: Vec::new(),
        }
    }

    pub fn tinted(shader: Handle<ShaderProgram>, tint: Vec4) -> Self {
        Self {
            tint,
            ..Self::new(MaterialKind::Tinted, shader)
        }
    }

    pub fn textured(
        shader: Handle<ShaderProgram>,
        texture: Handle<Texture>,
        sampler: Option<Handle<Sampler>>,
    ) -> Self {
        Self {
            textures: vec![TextureBinding { texture, sampler }],
            ..Self::new(MaterialKind::Textured, shader)
        }
    }

    pub fn with_pipeline_state(mut self, state: PipelineState) -> Self {
        self.pipeline_state = state;
        self
    }

    pub fn with_transparency(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_alpha_threshold(mut self, threshold: f32) -> Self {
        self.alpha_threshold = threshold;
        self
    }

    /// Make this material current: pipeline state, program, material uniforms and
    /// textures. Returns the program so per-draw uniforms can follow, or `None` if
    /// the shader handle no longer resolves.
    pub fn setup<'a>(
        &self,
        gl: &mut dyn GraphicsContext,
        assets: &'a Assets,
    ) -> Option<&'a ShaderProgram> {
        let Some(shader) = assets.shaders.get(self.shader) else {
            log::warn!("Material shader {:?} is no longer loaded", self.shader);
            return None;
        };

        self.pipeline_state.apply(gl);
        shader.use_program(gl);
        shader.set(gl, "tint", self.tint);

        match self.kind {
            MaterialKind::Tinted => {}
            MaterialKind::Textured => {
                shader.set(gl, "alphaThreshold", self.alpha_threshold);
                if let Some(binding) = self.textures.first() {
                    bind_texture(gl, assets, shader, binding, 0, "tex");
                }
            }
            MaterialKind::Lit => {
                shader.set(gl, "alphaThreshold", self.alpha_threshold);
                for (unit, (binding, name)) in
                    self.textures.iter().zip(LIT_TEXTURE_UNIFORMS).enumerate()
                {
                    bind_texture(gl, assets, shader, binding, unit as u32, name);
                }
            }
        }

        Some(shader)
    }
}

fn bind_texture(
    gl: &mut dyn GraphicsContext,
    assets: &Assets,
    shader: &ShaderProgram,
    binding: &TextureBinding,
    unit: u32,
    uniform: &str,
) {
    let Some(texture) = assets.textures.get(binding.texture) else {
        log::warn!("Material texture {:?} is no longer loaded", binding.texture);
        return;
    };
    texture.bind(gl, unit);
    match binding.sampler.and_then(|handle| assets.samplers.get(handle)) {
        Some(sampler) => sampler.bind(gl, unit),
        None => Sampler::unbind(gl, unit),
    }
    shader.set(gl, uniform, unit as i32);
}
