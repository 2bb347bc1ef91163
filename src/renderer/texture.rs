// renderer/texture.rs - 2D textures and render targets

use std::path::Path;

use glam::UVec2;

use crate::asset::GpuResource;
use crate::gfx::{GraphicsContext, GraphicsError, TextureFormat, TextureId};

use super::RenderError;

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Texture {
    id: TextureId,
    size: UVec2,
    format: TextureFormat,
}

impl Texture {
    /// Number of mip levels a full chain for `size` would have.
    pub fn mip_levels(size: UVec2) -> u32 {
        let max_dimension = size.x.max(size.y).max(1);
        u32::BITS - max_dimension.leading_zeros()
    }

    /// Load an image file as an RGBA8 texture.
    ///
    /// Rows are flipped so that texture coordinate `v = 0` addresses the bottom of the image.
    pub fn from_path(
        gl: &mut dyn GraphicsContext,
        path: impl AsRef<Path>,
        mipmaps: bool,
    ) -> Result<Self, RenderError> {
        let path = path.as_ref();
        log::info!("Loading texture: {:?}", path);

        let img = image::open(path).map_err(|source| RenderError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = img.flipv().to_rgba8();
        let (width, height) = rgba.dimensions();

        let texture = Self::from_rgba8(gl, UVec2::new(width, height), &rgba, mipmaps)?;
        log::debug!(
            "Texture {:?}: {}x{} ({} mip levels)",
            path,
            width,
            height,
            if mipmaps { Self::mip_levels(texture.size) } else { 1 }
        );
        Ok(texture)
    }

    /// Upload tightly packed RGBA8 rows. `pixels` must hold exactly `size.x * size.y * 4` bytes.
    pub fn from_rgba8(
        gl: &mut dyn GraphicsContext,
        size: UVec2,
        pixels: &[u8],
        mipmaps: bool,
    ) -> Result<Self, GraphicsError> {
        let expected = TextureFormat::Rgba8.byte_len(size);
        if pixels.len() != expected {
            return Err(GraphicsError::PixelDataSize {
                format: TextureFormat::Rgba8,
                size,
                expected,
                actual: pixels.len(),
            });
        }
        let id = gl.create_texture()?;
        gl.bind_texture(Some(id));
        gl.tex_image_2d(TextureFormat::Rgba8, size, Some(pixels));
        if mipmaps {
            gl.generate_mipmap();
        }
        gl.bind_texture(None);
        Ok(Self {
            id,
            size,
            format: TextureFormat::Rgba8,
        })
    }

    /// Allocate storage without uploading pixels, for use as a render target.
    pub fn empty(
        gl: &mut dyn GraphicsContext,
        format: TextureFormat,
        size: UVec2,
    ) -> Result<Self, GraphicsError> {
        let id = gl.create_texture()?;
        gl.bind_texture(Some(id));
        gl.tex_image_2d(format, size, None);
        gl.bind_texture(None);
        Ok(Self { id, size, format })
    }

    pub fn bind(&self, gl: &mut dyn GraphicsContext, unit: u32) {
        gl.active_texture(unit);
        gl.bind_texture(Some(self.id));
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn size(&self) -> UVec2 {
        self.size
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }
}

impl GpuResource for Texture {
    fn release(self, gl: &mut dyn GraphicsContext) {
        gl.delete_texture(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{GlCall, RecordingContext};

    #[test]
    fn mip_levels_cover_largest_dimension() {
        assert_eq!(Texture::mip_levels(UVec2::new(1, 1)), 1);
        assert_eq!(Texture::mip_levels(UVec2::new(256, 64)), 9);
        assert_eq!(Texture::mip_levels(UVec2::new(0, 0)), 1);
    }

    #[test]
    fn empty_target_has_no_pixels() {
        let mut gl = RecordingContext::new();
        let texture = Texture::empty(&mut gl, TextureFormat::Depth24, UVec2::new(64, 32)).unwrap();
        assert!(gl.calls().contains(&GlCall::TexImage2d {
            format: TextureFormat::Depth24,
            size: UVec2::new(64, 32),
            has_pixels: false,
        }));
        assert!(!gl.calls().contains(&GlCall::GenerateMipmap));
        texture.release(&mut gl);
        assert_eq!(gl.live_total(), 0);
    }

    #[test]
    fn short_pixel_slice_is_rejected_before_upload() {
        let mut gl = RecordingContext::new();
        let result = Texture::from_rgba8(&mut gl, UVec2::new(64, 64), &[0; 4], false);
        assert!(matches!(
            result,
            Err(GraphicsError::PixelDataSize {
                expected: 16384,
                actual: 4,
                ..
            })
        ));
        assert!(gl.calls().is_empty());
        assert_eq!(gl.live_total(), 0);
    }

    #[test]
    fn exact_pixel_slice_is_uploaded() {
        let mut gl = RecordingContext::new();
        let texture = Texture::from_rgba8(&mut gl, UVec2::new(2, 3), &[7; 24], false).unwrap();
        assert!(gl.calls().contains(&GlCall::TexImage2d {
            format: TextureFormat::Rgba8,
            size: UVec2::new(2, 3),
            has_pixels: true,
        }));
        texture.release(&mut gl);
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let mut gl = RecordingContext::new();
        let result = Texture::from_path(&mut gl, "does/not/exist.png", true);
        assert!(matches!(result, Err(RenderError::TextureLoad { .. })));
        assert_eq!(gl.live_total(), 0);
    }

    #[test]
    fn png_is_uploaded_with_mipmaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let mut gl = RecordingContext::new();
        let texture = Texture::from_path(&mut gl, &path, true).unwrap();
        assert_eq!(texture.size(), UVec2::new(4, 2));
        assert!(gl.calls().contains(&GlCall::GenerateMipmap));
        texture.release(&mut gl);
    }
}
