// scene/scene.rs - hecs world plus the queries and systems the game runs on it
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use hecs::{Entity, World};

use super::components::*;
use super::transform::euler_quat;
use super::Camera;

/// A light resolved to world space, ready for upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldLight {
    pub kind: LightType,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Vec3,
    /// Inner and outer cone half-angles in radians.
    pub cone_angles: Vec2,
    pub position: Vec3,
    pub direction: Vec3,
}

/// Eye, target and up derived from a camera owner's world matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl CameraPose {
    pub fn from_world(world: Mat4) -> Self {
        Self {
            eye: (world * Vec4::new(0.0, 0.0, 0.0, 1.0)).truncate(),
            center: (world * Vec4::new(0.0, 0.0, -1.0, 1.0)).truncate(),
            up: (world * Vec4::new(0.0, 1.0, 0.0, 0.0)).truncate(),
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }

    /// Unit direction the camera looks along.
    pub fn forward(&self) -> Vec3 {
        (self.center - self.eye).normalize_or_zero()
    }
}

#[derive(Default)]
pub struct Scene {
    pub world: World,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.world
            .query::<&Name>()
            .iter()
            .find(|(_, n)| n.0 == name)
            .map(|(entity, _)| entity)
    }

    /// Product of local matrices from the root down to `entity`.
    ///
    /// Entities without a [`LocalTransform`] contribute the identity. A parent chain
    /// that loops back on itself is cut after visiting every entity once.
    pub fn local_to_world(&self, entity: Entity) -> Mat4 {
        self.lineage(entity)
            .into_iter()
            .fold(Mat4::IDENTITY, |matrix, e| self.local_matrix(e) * matrix)
    }

    /// Composition of local rotations from the root down to `entity`, ignoring scale.
    pub fn world_rotation(&self, entity: Entity) -> Quat {
        self.lineage(entity)
            .into_iter()
            .fold(Quat::IDENTITY, |rotation, e| self.local_rotation(e) * rotation)
    }

    /// `entity` followed by its ancestors, nearest first.
    fn lineage(&self, entity: Entity) -> Vec<Entity> {
        let mut chain = vec![entity];
        let mut current = entity;
        let mut remaining = self.world.len();
        while let Ok(parent) = self.world.get::<&Parent>(current) {
            if remaining == 0 {
                log::warn!("Parent chain of {:?} contains a cycle", entity);
                break;
            }
            remaining -= 1;
            current = parent.0;
            chain.push(current);
        }
        chain
    }

    fn local_rotation(&self, entity: Entity) -> Quat {
        self.world
            .get::<&LocalTransform>(entity)
            .map(|local| local.0.quat())
            .unwrap_or(Quat::IDENTITY)
    }

    fn local_matrix(&self, entity: Entity) -> Mat4 {
        self.world
            .get::<&LocalTransform>(entity)
            .map(|local| local.0.matrix())
            .unwrap_or(Mat4::IDENTITY)
    }

    /// The [`Camera`] entity with the lowest entity id.
    ///
    /// In a freshly loaded scene ids follow spawn order, so this is the first camera in
    /// the document regardless of which other components each camera carries.
    pub fn first_camera(&self) -> Option<(Entity, Camera)> {
        self.world
            .query::<&Camera>()
            .iter()
            .min_by_key(|(entity, _)| entity.id())
            .map(|(entity, camera)| (entity, *camera))
    }

    pub fn camera_pose(&self, entity: Entity) -> CameraPose {
        CameraPose::from_world(self.local_to_world(entity))
    }

    pub fn camera_view(&self, entity: Entity) -> Mat4 {
        self.camera_pose(entity).view()
    }

    /// Every light in world space.
    pub fn world_lights(&self) -> Vec<WorldLight> {
        let lights: Vec<(Entity, Light)> = self
            .world
            .query::<&Light>()
            .iter()
            .map(|(entity, light)| (entity, *light))
            .collect();

        lights
            .into_iter()
            .map(|(entity, light)| {
                let translation = self.local_to_world(entity).w_axis.truncate();
                let rotation = self.world_rotation(entity) * euler_quat(light.direction);
                let direction = rotation * Vec3::NEG_Y;
                WorldLight {
                    kind: light.kind,
                    diffuse: light.diffuse,
                    specular: light.specular,
                    attenuation: light.attenuation,
                    cone_angles: Vec2::new(
                        light.cone_angles.x.to_radians(),
                        light.cone_angles.y.to_radians(),
                    ),
                    position: translation + light.position,
                    direction,
                }
            })
            .collect()
    }

    /// Movement system: integrate velocities over `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        for (_entity, (local, movement)) in self
            .world
            .query_mut::<(&mut LocalTransform, &Movement)>()
        {
            local.0.position += movement.linear_velocity * dt;
            local.0.rotation += movement.angular_velocity * dt;
        }
    }

    pub fn clear(&mut self) {
        let count = self.world.len();
        self.world.clear();
        log::debug!("Cleared scene ({} entities)", count);
    }
}
