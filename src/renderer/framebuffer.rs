use crate::asset::GpuResource;
use crate::gfx::{Attachment, FramebufferId, GraphicsContext, GraphicsError};

use super::Texture;

/// Offscreen render target. Attachments are borrowed textures owned elsewhere.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Framebuffer {
    id: FramebufferId,
}

impl Framebuffer {
    pub fn new(gl: &mut dyn GraphicsContext) -> Result<Self, GraphicsError> {
        Ok(Self {
            id: gl.create_framebuffer()?,
        })
    }

    pub fn bind(&self, gl: &mut dyn GraphicsContext) {
        gl.bind_framebuffer(Some(self.id));
    }

    /// Bind the presentation target.
    pub fn bind_default(gl: &mut dyn GraphicsContext) {
        gl.bind_framebuffer(None);
    }

    /// Attach `texture` to this framebuffer. Leaves this framebuffer bound.
    pub fn attach(&self, gl: &mut dyn GraphicsContext, attachment: Attachment, texture: &Texture) {
        self.bind(gl);
        gl.framebuffer_texture(attachment, texture.id());
    }

    /// Completeness check of this framebuffer. Leaves this framebuffer bound.
    pub fn is_complete(&self, gl: &mut dyn GraphicsContext) -> bool {
        self.bind(gl);
        gl.framebuffer_complete()
    }

    pub fn id(&self) -> FramebufferId {
        self.id
    }
}

impl GpuResource for Framebuffer {
    fn release(self, gl: &mut dyn GraphicsContext) {
        gl.delete_framebuffer(self.id);
    }
}
