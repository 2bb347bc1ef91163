pub mod cache;
pub mod handle;
pub mod mesh;

pub use cache::AssetCache;
pub use handle::Handle;
pub use mesh::Mesh;

use crate::gfx::GraphicsContext;
use crate::renderer::{Material, Sampler, ShaderProgram, Texture};

/// Something that owns graphics-API objects.
///
/// Releasing consumes the value, so a resource can be released at most once.
pub trait GpuResource {
    fn release(self, gl: &mut dyn GraphicsContext);
}

fn release_all<T: GpuResource>(cache: &mut AssetCache<T>, gl: &mut dyn GraphicsContext) -> usize {
    let mut released = 0;
    for item in cache.drain() {
        item.release(gl);
        released += 1;
    }
    released
}

/// Every loaded asset, by kind.
#[derive(Default)]
pub struct Assets {
    pub shaders: AssetCache<ShaderProgram>,
    pub textures: AssetCache<Texture>,
    pub samplers: AssetCache<Sampler>,
    pub meshes: AssetCache<Mesh>,
    pub materials: AssetCache<Material>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.shaders.is_empty()
            && self.textures.is_empty()
            && self.samplers.is_empty()
            && self.meshes.is_empty()
            && self.materials.is_empty()
    }

    /// Release every GPU resource and forget every material.
    pub fn clear_all(&mut self, gl: &mut dyn GraphicsContext) {
        let materials = self.materials.len();
        self.materials.drain().for_each(drop);
        let meshes = release_all(&mut self.meshes, gl);
        let samplers = release_all(&mut self.samplers, gl);
        let textures = release_all(&mut self.textures, gl);
        let shaders = release_all(&mut self.shaders, gl);
        log::debug!(
            "Released assets: {} meshes, {} samplers, {} textures, {} shaders, {} materials",
            meshes,
            samplers,
            textures,
            shaders,
            materials
        );
    }
}
