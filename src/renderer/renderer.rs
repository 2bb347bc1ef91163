// renderer/renderer.rs - forward renderer: opaque, sky, transparent, post-process
use std::path::Path;

use glam::{BVec4, Mat4, UVec2, Vec3, Vec4};

use crate::asset::{Assets, GpuResource, Handle, Mesh};
use crate::gfx::{
    Attachment, ClearMask, CompareFunction, Face, Filter, GraphicsContext, PrimitiveMode,
    TextureFormat, VertexArrayId, Wrap,
};
use crate::scene::{MeshRenderer, Scene, WorldLight};
use crate::settings::{RendererConfig, SkyColors};

use super::commands::{sort_back_to_front, RenderCommand};
use super::primitives::sphere_mesh;
use super::{
    Framebuffer, Material, PipelineState, RenderError, Sampler, SamplerConfig, ShaderProgram,
    Texture,
};

/// Collapses clip-space depth onto the far plane: `z' = w' = w`, so after the
/// perspective divide every vertex sits at depth 1.0.
pub const ALWAYS_BEHIND: Mat4 = Mat4::from_cols(
    Vec4::new(1.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 1.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 0.0, 0.0),
    Vec4::new(0.0, 0.0, 1.0, 1.0),
);

const SKY_SPHERE_SEGMENTS: u32 = 16;

/// What the last [`ForwardRenderer::render`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub camera_found: bool,
    pub opaque_draws: usize,
    pub transparent_draws: usize,
    pub skipped_commands: usize,
    pub light_count: usize,
    pub sky_drawn: bool,
    pub postprocess_applied: bool,
}

impl FrameStats {
    pub fn draw_calls(&self) -> usize {
        self.opaque_draws
            + self.transparent_draws
            + usize::from(self.sky_drawn)
            + usize::from(self.postprocess_applied)
    }
}

struct SkyStage {
    mesh: Handle<Mesh>,
    material: Handle<Material>,
}

struct PostProcessStage {
    framebuffer: Framebuffer,
    vertex_array: VertexArrayId,
    material: Handle<Material>,
}

/// Per-frame values shared by every draw.
struct FrameUniforms<'a> {
    eye: Vec3,
    view_projection: Mat4,
    lights: &'a [WorldLight],
    sky_colors: SkyColors,
}

pub struct ForwardRenderer {
    window_size: UVec2,
    /// Sky and post-process resources, released in [`ForwardRenderer::destroy`].
    owned: Assets,
    sky: Option<SkyStage>,
    postprocess: Option<PostProcessStage>,
    sky_colors: SkyColors,
    opaque_commands: Vec<RenderCommand>,
    transparent_commands: Vec<RenderCommand>,
    stats: FrameStats,
}

impl ForwardRenderer {
    /// Allocate the optional stages named in `config`.
    ///
    /// On error everything allocated so far has been released again.
    pub fn initialize(
        gl: &mut dyn GraphicsContext,
        window_size: UVec2,
        config: &RendererConfig,
    ) -> Result<Self, RenderError> {
        let mut renderer = Self {
            window_size,
            owned: Assets::new(),
            sky: None,
            postprocess: None,
            sky_colors: config.sky_colors,
            opaque_commands: Vec::new(),
            transparent_commands: Vec::new(),
            stats: FrameStats::default(),
        };

        if let Err(err) = renderer.allocate_stages(gl, config) {
            log::warn!("Forward renderer initialization failed: {}", err);
            renderer.destroy(gl);
            return Err(err);
        }

        log::info!(
            "Forward renderer initialized at {}x{} (sky: {}, post-process: {})",
            window_size.x,
            window_size.y,
            renderer.sky.is_some(),
            renderer.postprocess.is_some()
        );
        Ok(renderer)
    }

    fn allocate_stages(
        &mut self,
        gl: &mut dyn GraphicsContext,
        config: &RendererConfig,
    ) -> Result<(), RenderError> {
        if let Some(sky_texture) = &config.sky {
            self.sky = Some(self.create_sky(gl, sky_texture, config)?);
        }
        if let Some(fragment) = &config.postprocess {
            self.postprocess = Some(self.create_postprocess(gl, fragment, config)?);
        }
        Ok(())
    }

    fn create_sky(
        &mut self,
        gl: &mut dyn GraphicsContext,
        texture_path: &Path,
        config: &RendererConfig,
    ) -> Result<SkyStage, RenderError> {
        let (vertices, indices) = sphere_mesh(SKY_SPHERE_SEGMENTS, SKY_SPHERE_SEGMENTS);
        let mesh = self
            .owned
            .meshes
            .insert(Mesh::from_vertices(gl, &vertices, &indices)?);

        let texture = self
            .owned
            .textures
            .insert(Texture::from_path(gl, texture_path, false)?);

        let sampler_config = SamplerConfig {
            min_filter: Filter::Linear,
            mag_filter: Filter::Linear,
            wrap_s: Wrap::Repeat,
            wrap_t: Wrap::ClampToEdge,
            ..SamplerConfig::default()
        };
        let sampler = self
            .owned
            .samplers
            .insert(Sampler::from_config(gl, &sampler_config)?);

        let shader = self.owned.shaders.insert(ShaderProgram::from_files(
            gl,
            &config.sky_shader.vs,
            &config.sky_shader.fs,
        )?);

        // Seen from inside: keep the inward faces, draw wherever nothing closer is.
        let mut state = PipelineState::default();
        state.depth_testing.enabled = true;
        state.depth_testing.function = CompareFunction::LessEqual;
        state.face_culling.enabled = true;
        state.face_culling.culled_face = Face::Front;

        let material = Material::textured(shader, texture, Some(sampler))
            .with_pipeline_state(state)
            .with_alpha_threshold(1.0);
        let material = self.owned.materials.insert(material);

        Ok(SkyStage { mesh, material })
    }

    fn create_postprocess(
        &mut self,
        gl: &mut dyn GraphicsContext,
        fragment: &Path,
        config: &RendererConfig,
    ) -> Result<PostProcessStage, RenderError> {
        let framebuffer = Framebuffer::new(gl)?;
        let vertex_array = match gl.create_vertex_array() {
            Ok(vertex_array) => vertex_array,
            Err(err) => {
                framebuffer.release(gl);
                return Err(err.into());
            }
        };

        match self.create_postprocess_material(gl, &framebuffer, fragment, config) {
            Ok(material) => Ok(PostProcessStage {
                framebuffer,
                vertex_array,
                material,
            }),
            Err(err) => {
                framebuffer.release(gl);
                gl.delete_vertex_array(vertex_array);
                Err(err)
            }
        }
    }

    fn create_postprocess_material(
        &mut self,
        gl: &mut dyn GraphicsContext,
        framebuffer: &Framebuffer,
        fragment: &Path,
        config: &RendererConfig,
    ) -> Result<Handle<Material>, RenderError> {
        let color = Texture::empty(gl, TextureFormat::Rgba8, self.window_size)?;
        framebuffer.attach(gl, Attachment::Color0, &color);
        let color_target = self.owned.textures.insert(color);

        let depth = Texture::empty(gl, TextureFormat::Depth24, self.window_size)?;
        framebuffer.attach(gl, Attachment::Depth, &depth);
        self.owned.textures.insert(depth);

        let complete = framebuffer.is_complete(gl);
        Framebuffer::bind_default(gl);
        if !complete {
            return Err(RenderError::IncompleteFramebuffer);
        }

        let sampler = self
            .owned
            .samplers
            .insert(Sampler::from_config(gl, &SamplerConfig::linear_clamp())?);

        let shader = self.owned.shaders.insert(ShaderProgram::from_files(
            gl,
            &config.fullscreen_vertex,
            fragment,
        )?);

        let mut state = PipelineState::default();
        state.depth_mask = false;

        let material =
            Material::textured(shader, color_target, Some(sampler)).with_pipeline_state(state);
        Ok(self.owned.materials.insert(material))
    }

    pub fn window_size(&self) -> UVec2 {
        self.window_size
    }

    pub fn has_sky(&self) -> bool {
        self.sky.is_some()
    }

    pub fn has_postprocess(&self) -> bool {
        self.postprocess.is_some()
    }

    pub fn last_frame_stats(&self) -> FrameStats {
        self.stats
    }

    /// Render one frame of `scene` with meshes and materials from `assets`.
    ///
    /// A scene without a camera produces no graphics calls at all.
    pub fn render(&mut self, gl: &mut dyn GraphicsContext, scene: &Scene, assets: &Assets) {
        let mut stats = FrameStats::default();
        self.opaque_commands.clear();
        self.transparent_commands.clear();

        for (entity, mesh_renderer) in scene.world.query::<&MeshRenderer>().iter() {
            let Some(material) = assets.materials.get(mesh_renderer.material) else {
                log::warn!(
                    "Skipping {:?}: material {:?} is not loaded",
                    entity,
                    mesh_renderer.material
                );
                stats.skipped_commands += 1;
                continue;
            };
            if !assets.meshes.contains(mesh_renderer.mesh) {
                log::warn!(
                    "Skipping {:?}: mesh {:?} is not loaded",
                    entity,
                    mesh_renderer.mesh
                );
                stats.skipped_commands += 1;
                continue;
            }

            let command = RenderCommand::new(
                mesh_renderer.mesh,
                mesh_renderer.material,
                scene.local_to_world(entity),
            );
            if material.transparent {
                self.transparent_commands.push(command);
            } else {
                self.opaque_commands.push(command);
            }
        }

        let Some((camera_entity, camera)) = scene.first_camera() else {
            log::debug!("No camera in scene; nothing rendered");
            self.stats = stats;
            return;
        };
        stats.camera_found = true;

        let pose = scene.camera_pose(camera_entity);
        sort_back_to_front(&mut self.transparent_commands, pose.forward());

        let view_projection = camera.projection_matrix(self.window_size) * pose.view();
        let lights = scene.world_lights();
        stats.light_count = lights.len();
        let frame = FrameUniforms {
            eye: pose.eye,
            view_projection,
            lights: &lights,
            sky_colors: self.sky_colors,
        };

        gl.viewport(0, 0, self.window_size.x as i32, self.window_size.y as i32);
        gl.clear_color(Vec4::new(0.0, 0.0, 0.0, 1.0));
        gl.clear_depth(1.0);
        gl.color_mask(BVec4::TRUE);
        gl.depth_mask(true);

        match &self.postprocess {
            Some(postprocess) => postprocess.framebuffer.bind(gl),
            None => Framebuffer::bind_default(gl),
        }
        gl.clear(ClearMask::COLOR | ClearMask::DEPTH);

        for command in &self.opaque_commands {
            if draw_command(gl, assets, command, &frame) {
                stats.opaque_draws += 1;
            } else {
                stats.skipped_commands += 1;
            }
        }

        if let Some(sky) = &self.sky {
            stats.sky_drawn = self.draw_sky(gl, sky, &frame);
        }

        for command in &self.transparent_commands {
            if draw_command(gl, assets, command, &frame) {
                stats.transparent_draws += 1;
            } else {
                stats.skipped_commands += 1;
            }
        }

        if let Some(postprocess) = &self.postprocess {
            Framebuffer::bind_default(gl);
            if let Some(material) = self.owned.materials.get(postprocess.material) {
                if material.setup(gl, &self.owned).is_some() {
                    gl.bind_vertex_array(Some(postprocess.vertex_array));
                    gl.draw_arrays(PrimitiveMode::Triangles, 0, 3);
                    stats.postprocess_applied = true;
                }
            }
        }

        log::trace!("{:?}", stats);
        self.stats = stats;
    }

    fn draw_sky(&self, gl: &mut dyn GraphicsContext, sky: &SkyStage, frame: &FrameUniforms) -> bool {
        let (Some(material), Some(mesh)) = (
            self.owned.materials.get(sky.material),
            self.owned.meshes.get(sky.mesh),
        ) else {
            return false;
        };
        let Some(shader) = material.setup(gl, &self.owned) else {
            return false;
        };
        let model = Mat4::from_translation(frame.eye);
        shader.set(gl, "transform", ALWAYS_BEHIND * frame.view_projection * model);
        mesh.draw(gl);
        true
    }

    /// Release everything the renderer allocated.
    pub fn destroy(mut self, gl: &mut dyn GraphicsContext) {
        if let Some(postprocess) = self.postprocess.take() {
            postprocess.framebuffer.release(gl);
            gl.delete_vertex_array(postprocess.vertex_array);
        }
        self.owned.clear_all(gl);
        log::info!("Forward renderer destroyed");
    }
}

fn draw_command(
    gl: &mut dyn GraphicsContext,
    assets: &Assets,
    command: &RenderCommand,
    frame: &FrameUniforms,
) -> bool {
    let (Some(material), Some(mesh)) = (
        assets.materials.get(command.material),
        assets.meshes.get(command.mesh),
    ) else {
        return false;
    };
    let Some(shader) = material.setup(gl, assets) else {
        return false;
    };

    let model = command.local_to_world;
    shader.set(gl, "eye", frame.eye);
    shader.set(gl, "M", model);
    shader.set(gl, "MIT", model.inverse().transpose());
    shader.set(gl, "VP", frame.view_projection);
    shader.set(gl, "transform", frame.view_projection * model);
    upload_lights(gl, shader, frame.lights);
    shader.set(gl, "sky.top", frame.sky_colors.top);
    shader.set(gl, "sky.middle", frame.sky_colors.middle);
    shader.set(gl, "sky.bottom", frame.sky_colors.bottom);

    log::trace!("Draw {:?} at {:?}", command.mesh, command.center);
    mesh.draw(gl);
    true
}

fn upload_lights(gl: &mut dyn GraphicsContext, shader: &ShaderProgram, lights: &[WorldLight]) {
    shader.set(gl, "light_count", lights.len() as i32);
    for (i, light) in lights.iter().enumerate() {
        let prefix = format!("lights[{}]", i);
        shader.set(gl, &format!("{prefix}.type"), light.kind.shader_index());
        shader.set(gl, &format!("{prefix}.diffuse"), light.diffuse);
        shader.set(gl, &format!("{prefix}.specular"), light.specular);
        shader.set(gl, &format!("{prefix}.attenuation"), light.attenuation);
        shader.set(gl, &format!("{prefix}.cone_angles"), light.cone_angles);
        shader.set(gl, &format!("{prefix}.position"), light.position);
        shader.set(gl, &format!("{prefix}.direction"), light.direction);
    }
}
