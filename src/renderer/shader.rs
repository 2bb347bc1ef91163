// renderer/shader.rs - GLSL program objects

use std::path::Path;

use crate::asset::GpuResource;
use crate::gfx::{GraphicsContext, ProgramId, ShaderStage, UniformValue};

use super::RenderError;

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ShaderProgram {
    program: ProgramId,
}

impl ShaderProgram {
    pub fn new(gl: &mut dyn GraphicsContext) -> Result<Self, RenderError> {
        Ok(Self {
            program: gl.create_program()?,
        })
    }

    /// Compile and link a vertex/fragment pair read from disk.
    ///
    /// The program is released again if any step fails.
    pub fn from_files(
        gl: &mut dyn GraphicsContext,
        vertex: impl AsRef<Path>,
        fragment: impl AsRef<Path>,
    ) -> Result<Self, RenderError> {
        let program = Self::new(gl)?;
        if let Err(err) = program.build(gl, vertex.as_ref(), fragment.as_ref()) {
            program.release(gl);
            return Err(err);
        }
        Ok(program)
    }

    fn build(
        &self,
        gl: &mut dyn GraphicsContext,
        vertex: &Path,
        fragment: &Path,
    ) -> Result<(), RenderError> {
        self.attach_file(gl, vertex, ShaderStage::Vertex)?;
        self.attach_file(gl, fragment, ShaderStage::Fragment)?;
        self.link(gl)
    }

    pub fn attach_file(
        &self,
        gl: &mut dyn GraphicsContext,
        path: &Path,
        stage: ShaderStage,
    ) -> Result<(), RenderError> {
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::ShaderIo {
            path: path.to_path_buf(),
            source,
        })?;
        self.attach_source(gl, &source, stage, &path.display().to_string())
    }

    /// Compile `source` as one stage and attach it. The stage object is deleted right
    /// away; the program keeps it alive until it is released itself.
    pub fn attach_source(
        &self,
        gl: &mut dyn GraphicsContext,
        source: &str,
        stage: ShaderStage,
        origin: &str,
    ) -> Result<(), RenderError> {
        let shader = gl.create_shader(stage)?;
        let compiled = gl.compile_shader(shader, source);
        if compiled.is_ok() {
            gl.attach_shader(self.program, shader);
        }
        gl.delete_shader(shader);
        compiled.map_err(|log| RenderError::ShaderCompile {
            stage,
            origin: origin.to_string(),
            log,
        })
    }

    pub fn link(&self, gl: &mut dyn GraphicsContext) -> Result<(), RenderError> {
        gl.link_program(self.program)
            .map_err(|log| RenderError::ShaderLink { log })
    }

    pub fn use_program(&self, gl: &mut dyn GraphicsContext) {
        gl.use_program(Some(self.program));
    }

    /// Upload to the uniform called `name`. Names the program does not expose are
    /// ignored, as the driver drops unused uniforms.
    pub fn set<U: Into<UniformValue>>(&self, gl: &mut dyn GraphicsContext, name: &str, value: U) {
        match gl.uniform_location(self.program, name) {
            Some(location) => gl.set_uniform(location, value.into()),
            None => log::trace!("Uniform {} not found in program {}", name, self.program.get()),
        }
    }

    pub fn id(&self) -> ProgramId {
        self.program
    }
}

impl GpuResource for ShaderProgram {
    fn release(self, gl: &mut dyn GraphicsContext) {
        gl.delete_program(self.program);
    }
}
