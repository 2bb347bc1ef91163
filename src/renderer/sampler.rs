use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::asset::GpuResource;
use crate::gfx::{Filter, GraphicsContext, GraphicsError, SamplerId, SamplerParameter, Wrap};

/// Sampling state as it appears in scene files.
///
/// Keys accept both the snake_case names and the upper-case `MIN_FILTER` style,
/// values accept both `linear` and `GL_LINEAR`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    #[serde(alias = "MIN_FILTER")]
    pub min_filter: Filter,
    #[serde(alias = "MAG_FILTER")]
    pub mag_filter: Filter,
    #[serde(alias = "WRAP_S")]
    pub wrap_s: Wrap,
    #[serde(alias = "WRAP_T")]
    pub wrap_t: Wrap,
    #[serde(alias = "MAX_ANISOTROPY")]
    pub max_anisotropy: f32,
    #[serde(alias = "BORDER_COLOR")]
    pub border_color: Vec4,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_filter: Filter::LinearMipmapLinear,
            mag_filter: Filter::Linear,
            wrap_s: Wrap::Repeat,
            wrap_t: Wrap::Repeat,
            max_anisotropy: 1.0,
            border_color: Vec4::ZERO,
        }
    }
}

impl SamplerConfig {
    pub fn linear_clamp() -> Self {
        Self {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            wrap_s: Wrap::ClampToEdge,
            wrap_t: Wrap::ClampToEdge,
            ..Self::default()
        }
    }

    pub fn parameters(&self) -> [SamplerParameter; 6] {
        [
            SamplerParameter::MinFilter(self.min_filter),
            SamplerParameter::MagFilter(self.mag_filter),
            SamplerParameter::WrapS(self.wrap_s),
            SamplerParameter::WrapT(self.wrap_t),
            SamplerParameter::MaxAnisotropy(self.max_anisotropy),
            SamplerParameter::BorderColor(self.border_color),
        ]
    }
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Sampler {
    id: SamplerId,
}

impl Sampler {
    pub fn new(gl: &mut dyn GraphicsContext) -> Result<Self, GraphicsError> {
        Ok(Self {
            id: gl.create_sampler()?,
        })
    }

    pub fn from_config(
        gl: &mut dyn GraphicsContext,
        config: &SamplerConfig,
    ) -> Result<Self, GraphicsError> {
        let sampler = Self::new(gl)?;
        for parameter in config.parameters() {
            sampler.set(gl, parameter);
        }
        Ok(sampler)
    }

    pub fn set(&self, gl: &mut dyn GraphicsContext, parameter: SamplerParameter) {
        gl.sampler_parameter(self.id, parameter);
    }

    pub fn bind(&self, gl: &mut dyn GraphicsContext, unit: u32) {
        gl.bind_sampler(unit, Some(self.id));
    }

    pub fn unbind(gl: &mut dyn GraphicsContext, unit: u32) {
        gl.bind_sampler(unit, None);
    }

    pub fn id(&self) -> SamplerId {
        self.id
    }
}

impl GpuResource for Sampler {
    fn release(self, gl: &mut dyn GraphicsContext) {
        gl.delete_sampler(self.id);
    }
}
