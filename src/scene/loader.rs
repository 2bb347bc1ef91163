// scene/loader.rs - JSON scene documents: asset declarations, entity tree, renderer keys
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glam::{Vec2, Vec3, Vec4};
use hecs::Entity;
use serde::Deserialize;

use super::components::*;
use super::{Camera, Projection, Scene, SceneError, Transform};
use crate::asset::{Assets, GpuResource, Mesh};
use crate::gfx::GraphicsContext;
use crate::renderer::{
    cube_mesh, plane_mesh, sphere_mesh, Material, MaterialKind, PipelineState, RenderError,
    Sampler, SamplerConfig, ShaderProgram, Texture, TextureBinding,
};
use crate::settings::{RendererConfig, ShaderPaths};

// ============================================================================
// Document model
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneDocument {
    pub assets: AssetsConfig,
    pub world: Vec<EntityConfig>,
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub shaders: BTreeMap<String, ShaderPaths>,
    pub textures: BTreeMap<String, PathBuf>,
    pub samplers: BTreeMap<String, SamplerConfig>,
    pub meshes: BTreeMap<String, MeshSource>,
    pub materials: BTreeMap<String, MaterialConfig>,
}

/// A procedural primitive, or a model file path. Model files are only accepted when
/// a mesh of the same name was registered before loading.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MeshSource {
    Primitive(PrimitiveMesh),
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "primitive", rename_all = "snake_case")]
pub enum PrimitiveMesh {
    Cube,
    Sphere {
        #[serde(default = "default_segments")]
        segments: u32,
        #[serde(default = "default_segments")]
        rings: u32,
    },
    Plane {
        #[serde(default = "default_uv_scale", rename = "uvScale")]
        uv_scale: [f32; 2],
    },
}

fn default_segments() -> u32 {
    16
}

fn default_uv_scale() -> [f32; 2] {
    [1.0, 1.0]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialConfig {
    #[serde(rename = "type", default)]
    pub kind: MaterialKind,
    pub shader: String,
    #[serde(default)]
    pub pipeline_state: PipelineState,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default = "default_tint")]
    pub tint: Vec4,
    #[serde(default)]
    pub alpha_threshold: f32,
    #[serde(default)]
    pub texture: Option<String>,
    #[serde(default)]
    pub sampler: Option<String>,
    #[serde(default)]
    pub albedo: Option<String>,
    #[serde(default)]
    pub specular: Option<String>,
    #[serde(default)]
    pub roughness: Option<String>,
    #[serde(default, alias = "ambient_occlusion")]
    pub ambient_occlusion: Option<String>,
    #[serde(default)]
    pub emissive: Option<String>,
}

fn default_tint() -> Vec4 {
    Vec4::ONE
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    pub name: String,
    pub position: Vec3,
    /// Degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub components: Vec<ComponentConfig>,
    pub children: Vec<EntityConfig>,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            components: Vec::new(),
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentConfig {
    Camera(CameraConfig),
    #[serde(rename = "Mesh Renderer")]
    MeshRenderer(MeshRendererConfig),
    Light(LightConfig),
    Movement(MovementConfig),
    /// Components handled outside the engine (input controllers, game rules).
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    pub camera_type: Projection,
    pub near: f32,
    pub far: f32,
    /// Degrees.
    pub fov_y: f32,
    pub ortho_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            camera_type: camera.projection,
            near: camera.near,
            far: camera.far,
            fov_y: camera.fov_y_radians.to_degrees(),
            ortho_height: camera.ortho_height,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeshRendererConfig {
    pub mesh: String,
    pub material: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LightConfig {
    pub light_type: LightType,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Vec3,
    #[serde(alias = "cone_angles")]
    pub cone_angles: Vec2,
    pub position: Vec3,
    pub direction: Vec3,
}

impl Default for LightConfig {
    fn default() -> Self {
        let light = Light::default();
        Self {
            light_type: light.kind,
            diffuse: light.diffuse,
            specular: light.specular,
            attenuation: light.attenuation,
            cone_angles: light.cone_angles,
            position: light.position,
            direction: light.direction,
        }
    }
}

impl From<&LightConfig> for Light {
    fn from(config: &LightConfig) -> Self {
        Light {
            kind: config.light_type,
            diffuse: config.diffuse,
            specular: config.specular,
            attenuation: config.attenuation,
            cone_angles: config.cone_angles,
            position: config.position,
            direction: config.direction,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MovementConfig {
    pub linear_velocity: Vec3,
    /// Degrees per second.
    pub angular_velocity: Vec3,
}

// ============================================================================
// Loading
// ============================================================================

pub struct SceneLoader;

impl SceneLoader {
    pub fn from_value(value: &serde_json::Value) -> Result<SceneDocument, SceneError> {
        Ok(SceneDocument::deserialize(value)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SceneDocument, SceneError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load assets and entities of `document`, returning its renderer configuration
    /// with paths resolved against `base`.
    pub fn load(
        gl: &mut dyn GraphicsContext,
        document: &SceneDocument,
        base: &Path,
        assets: &mut Assets,
        scene: &mut Scene,
    ) -> Result<RendererConfig, SceneError> {
        Self::load_assets(gl, &document.assets, base, assets)?;
        let roots = Self::load_world(&document.world, scene, assets)?;
        log::info!(
            "Loaded scene: {} root entities, {} entities total",
            roots.len(),
            scene.world.len()
        );
        Ok(document.renderer.clone().resolve_paths(base))
    }

    /// Create every declared asset, replacing (and releasing) same-named ones.
    ///
    /// On error, assets created before the failing one stay in `assets`.
    pub fn load_assets(
        gl: &mut dyn GraphicsContext,
        config: &AssetsConfig,
        base: &Path,
        assets: &mut Assets,
    ) -> Result<(), SceneError> {
        for (name, paths) in &config.shaders {
            let shader = ShaderProgram::from_files(gl, base.join(&paths.vs), base.join(&paths.fs))?;
            if let (_, Some(old)) = assets.shaders.insert_named(name.as_str(), shader) {
                old.release(gl);
            }
        }

        for (name, path) in &config.textures {
            let texture = Texture::from_path(gl, base.join(path), true)?;
            if let (_, Some(old)) = assets.textures.insert_named(name.as_str(), texture) {
                old.release(gl);
            }
        }

        for (name, sampler_config) in &config.samplers {
            let sampler = Sampler::from_config(gl, sampler_config).map_err(RenderError::from)?;
            if let (_, Some(old)) = assets.samplers.insert_named(name.as_str(), sampler) {
                old.release(gl);
            }
        }

        for (name, source) in &config.meshes {
            let (vertices, indices) = match source {
                MeshSource::Primitive(PrimitiveMesh::Cube) => cube_mesh(),
                MeshSource::Primitive(PrimitiveMesh::Sphere { segments, rings }) => {
                    sphere_mesh(*segments, *rings)
                }
                MeshSource::Primitive(PrimitiveMesh::Plane { uv_scale }) => plane_mesh(*uv_scale),
                MeshSource::File(path) => {
                    if assets.meshes.handle_by_name(name).is_some() {
                        log::debug!("Mesh {:?} already registered; skipping {:?}", name, path);
                        continue;
                    }
                    return Err(SceneError::UnsupportedMesh {
                        name: name.clone(),
                        path: path.clone(),
                    });
                }
            };
            let mesh =
                Mesh::from_vertices(gl, &vertices, &indices).map_err(RenderError::from)?;
            if let (_, Some(old)) = assets.meshes.insert_named(name.as_str(), mesh) {
                old.release(gl);
            }
        }

        for (name, material_config) in &config.materials {
            let material = Self::build_material(name, material_config, assets)?;
            assets.materials.insert_named(name.as_str(), material);
        }

        log::info!(
            "Loaded assets: {} shaders, {} textures, {} samplers, {} meshes, {} materials",
            assets.shaders.len(),
            assets.textures.len(),
            assets.samplers.len(),
            assets.meshes.len(),
            assets.materials.len()
        );
        Ok(())
    }

    fn build_material(
        name: &str,
        config: &MaterialConfig,
        assets: &Assets,
    ) -> Result<Material, SceneError> {
        let shader = assets
            .shaders
            .handle_by_name(&config.shader)
            .ok_or_else(|| SceneError::unknown("shader", &config.shader))?;

        let sampler = match &config.sampler {
            Some(sampler) => Some(
                assets
                    .samplers
                    .handle_by_name(sampler)
                    .ok_or_else(|| SceneError::unknown("sampler", sampler))?,
            ),
            None => None,
        };

        let texture_names: Vec<Option<&String>> = match config.kind {
            MaterialKind::Tinted => Vec::new(),
            MaterialKind::Textured => vec![config.texture.as_ref()],
            MaterialKind::Lit => vec![
                config.albedo.as_ref(),
                config.specular.as_ref(),
                config.roughness.as_ref(),
                config.ambient_occlusion.as_ref(),
                config.emissive.as_ref(),
            ],
        };

        // Maps bind to consecutive units, so a missing map may only be followed by missing maps.
        let present = texture_names.iter().take_while(|t| t.is_some()).count();
        if texture_names[present..].iter().any(Option::is_some) {
            return Err(SceneError::InvalidMaterial {
                name: name.to_string(),
                reason: "texture maps must be given in order without gaps".to_string(),
            });
        }

        let mut textures = Vec::with_capacity(present);
        for texture_name in texture_names.into_iter().flatten() {
            let texture = assets
                .textures
                .handle_by_name(texture_name)
                .ok_or_else(|| SceneError::unknown("texture", texture_name))?;
            textures.push(TextureBinding { texture, sampler });
        }

        Ok(Material {
            kind: config.kind,
            shader,
            pipeline_state: config.pipeline_state,
            transparent: config.transparent,
            tint: config.tint,
            alpha_threshold: config.alpha_threshold,
            textures,
        })
    }

    /// Spawn the entity tree. Returns the root entities in document order.
    pub fn load_world(
        entities: &[EntityConfig],
        scene: &mut Scene,
        assets: &Assets,
    ) -> Result<Vec<Entity>, SceneError> {
        entities
            .iter()
            .map(|config| Self::spawn_entity(config, None, scene, assets))
            .collect()
    }

    fn spawn_entity(
        config: &EntityConfig,
        parent: Option<Entity>,
        scene: &mut Scene,
        assets: &Assets,
    ) -> Result<Entity, SceneError> {
        let mut builder = hecs::EntityBuilder::new();
        builder.add(Name::new(config.name.clone()));
        builder.add(LocalTransform(Transform::from_degrees(
            config.position,
            config.rotation,
            config.scale,
        )));
        if let Some(parent) = parent {
            builder.add(Parent(parent));
        }

        for component in &config.components {
            match component {
                ComponentConfig::Camera(camera) => {
                    builder.add(Camera {
                        projection: camera.camera_type,
                        fov_y_radians: camera.fov_y.to_radians(),
                        ortho_height: camera.ortho_height,
                        near: camera.near,
                        far: camera.far,
                    });
                }
                ComponentConfig::MeshRenderer(renderer) => {
                    let mesh = assets
                        .meshes
                        .handle_by_name(&renderer.mesh)
                        .ok_or_else(|| SceneError::unknown("mesh", &renderer.mesh))?;
                    let material = assets
                        .materials
                        .handle_by_name(&renderer.material)
                        .ok_or_else(|| SceneError::unknown("material", &renderer.material))?;
                    builder.add(MeshRenderer { mesh, material });
                }
                ComponentConfig::Light(light) => {
                    builder.add(Light::from(light));
                }
                ComponentConfig::Movement(movement) => {
                    builder.add(Movement {
                        linear_velocity: movement.linear_velocity,
                        angular_velocity: Vec3::new(
                            movement.angular_velocity.x.to_radians(),
                            movement.angular_velocity.y.to_radians(),
                            movement.angular_velocity.z.to_radians(),
                        ),
                    });
                }
                ComponentConfig::Unsupported => {
                    log::warn!("Ignoring unsupported component on entity {:?}", config.name);
                }
            }
        }

        let entity = scene.world.spawn(builder.build());
        for child in &config.children {
            Self::spawn_entity(child, Some(entity), scene, assets)?;
        }
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{ObjectKind, RecordingContext};
    use std::fs;

    fn write_shaders(dir: &Path) {
        fs::create_dir_all(dir.join("shaders")).unwrap();
        fs::write(dir.join("shaders/tinted.vert"), "void main() {}").unwrap();
        fs::write(dir.join("shaders/tinted.frag"), "void main() {}").unwrap();
    }

    const DOCUMENT: &str = r#"{
        "assets": {
            "shaders": { "tinted": { "vs": "shaders/tinted.vert", "fs": "shaders/tinted.frag" } },
            "samplers": { "default": { "MIN_FILTER": "GL_LINEAR" } },
            "meshes": {
                "cube": { "primitive": "cube" },
                "road": { "primitive": "plane", "uvScale": [1.0, 20.0] }
            },
            "materials": {
                "red": { "type": "tinted", "shader": "tinted", "tint": [1, 0, 0, 1] },
                "glass": {
                    "type": "tinted", "shader": "tinted", "transparent": true,
                    "pipelineState": { "blending": { "enabled": true } }
                }
            }
        },
        "world": [
            {
                "name": "camera",
                "position": [0, 2, 10],
                "components": [ { "type": "Camera", "fovY": 60 } ]
            },
            {
                "name": "car",
                "rotation": [0, 90, 0],
                "components": [
                    { "type": "Mesh Renderer", "mesh": "cube", "material": "red" },
                    { "type": "Movement", "linearVelocity": [0, 0, -5], "angularVelocity": [0, 180, 0] },
                    { "type": "Free Camera Controller" }
                ],
                "children": [
                    {
                        "name": "headlight",
                        "position": [0, 0, -1],
                        "components": [
                            { "type": "Light", "lightType": "SPOT", "diffuse": [1, 1, 0.8], "cone_angles": [10, 20] }
                        ]
                    }
                ]
            }
        ],
        "renderer": { "postprocess": "shaders/vignette.frag" }
    }"#;

    #[test]
    fn loads_assets_and_world() {
        let dir = tempfile::tempdir().unwrap();
        write_shaders(dir.path());
        let document: SceneDocument = serde_json::from_str(DOCUMENT).unwrap();

        let mut gl = RecordingContext::new();
        let mut assets = Assets::new();
        let mut scene = Scene::new();
        let renderer = SceneLoader::load(&mut gl, &document, dir.path(), &mut assets, &mut scene)
            .unwrap();

        assert_eq!(
            renderer.postprocess,
            Some(dir.path().join("shaders/vignette.frag"))
        );
        assert!(renderer.sky.is_none());
        assert_eq!(assets.meshes.len(), 2);
        assert_eq!(assets.materials.len(), 2);
        assert!(assets.materials.get_by_name("glass").unwrap().transparent);
        assert_eq!(scene.world.len(), 3);

        let car = scene.find_by_name("car").unwrap();
        let renderer_component = *scene.world.get::<&MeshRenderer>(car).unwrap();
        assert_eq!(
            Some(renderer_component.material),
            assets.materials.handle_by_name("red")
        );
        let movement = *scene.world.get::<&Movement>(car).unwrap();
        assert!((movement.angular_velocity.y - std::f32::consts::PI).abs() < 1e-6);

        let headlight = scene.find_by_name("headlight").unwrap();
        assert_eq!(scene.world.get::<&Parent>(headlight).unwrap().0, car);
        let light = *scene.world.get::<&Light>(headlight).unwrap();
        assert_eq!(light.kind, LightType::Spot);
        assert_eq!(light.cone_angles, Vec2::new(10.0, 20.0));

        let (_, camera) = scene.first_camera().unwrap();
        assert!((camera.fov_y_radians - 60f32.to_radians()).abs() < 1e-6);

        assets.clear_all(&mut gl);
        assert_eq!(gl.live_total(), 0);
    }

    #[test]
    fn unknown_material_reference_is_an_error() {
        let document: SceneDocument = serde_json::from_str(
            r#"{
                "assets": { "meshes": { "cube": { "primitive": "cube" } } },
                "world": [ { "components": [ { "type": "Mesh Renderer", "mesh": "cube", "material": "nope" } ] } ]
            }"#,
        )
        .unwrap();
        let mut gl = RecordingContext::new();
        let mut assets = Assets::new();
        let mut scene = Scene::new();
        let result = SceneLoader::load(&mut gl, &document, Path::new("."), &mut assets, &mut scene);
        assert!(matches!(
            result,
            Err(SceneError::UnknownAsset { kind: "material", .. })
        ));
        assets.clear_all(&mut gl);
    }

    #[test]
    fn mesh_files_need_preregistered_meshes() {
        let document: SceneDocument = serde_json::from_str(
            r#"{ "assets": { "meshes": { "car": "assets/models/car.obj" } } }"#,
        )
        .unwrap();
        let mut gl = RecordingContext::new();
        let mut assets = Assets::new();

        let result = SceneLoader::load_assets(&mut gl, &document.assets, Path::new("."), &mut assets);
        assert!(matches!(result, Err(SceneError::UnsupportedMesh { .. })));

        let (vertices, indices) = cube_mesh();
        assets.meshes.insert_named(
            "car",
            Mesh::from_vertices(&mut gl, &vertices, &indices).unwrap(),
        );
        SceneLoader::load_assets(&mut gl, &document.assets, Path::new("."), &mut assets).unwrap();
        assert_eq!(gl.created_count(ObjectKind::VertexArray), 1);
        assets.clear_all(&mut gl);
    }

    #[test]
    fn reloading_replaces_and_releases_named_assets() {
        let dir = tempfile::tempdir().unwrap();
        write_shaders(dir.path());
        let document: SceneDocument = serde_json::from_str(DOCUMENT).unwrap();
        let mut gl = RecordingContext::new();
        let mut assets = Assets::new();

        SceneLoader::load_assets(&mut gl, &document.assets, dir.path(), &mut assets).unwrap();
        let live = gl.live_total();
        SceneLoader::load_assets(&mut gl, &document.assets, dir.path(), &mut assets).unwrap();
        assert_eq!(gl.live_total(), live);
        assert_eq!(gl.invalid_releases(), 0);
        assets.clear_all(&mut gl);
    }

    #[test]
    fn lit_material_maps_must_not_have_gaps() {
        let config: MaterialConfig = serde_json::from_str(
            r#"{ "type": "lit", "shader": "s", "albedo": "a", "roughness": "r" }"#,
        )
        .unwrap();
        let mut gl = RecordingContext::new();
        let mut assets = Assets::new();
        assets
            .shaders
            .insert_named("s", ShaderProgram::new(&mut gl).unwrap());
        let result = SceneLoader::build_material("lit", &config, &assets);
        assert!(matches!(result, Err(SceneError::InvalidMaterial { .. })));
        assets.clear_all(&mut gl);
    }

    #[test]
    fn missing_scene_file_is_an_io_error() {
        let result = SceneLoader::from_path("no/such/scene.json");
        assert!(matches!(result, Err(SceneError::Io { .. })));
    }
}
