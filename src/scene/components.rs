// scene/components.rs
// Plain hecs components

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::asset::{Handle, Mesh};
use crate::renderer::Material;
use crate::scene::Transform;

// ============================================================================
// Hierarchy
// ============================================================================

/// Placement relative to [`Parent`], or to the world for root entities.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalTransform(pub Transform);

/// Parent entity reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub hecs::Entity);

/// Name component for debugging and lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

// ============================================================================
// Rendering
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshRenderer {
    pub mesh: Handle<Mesh>,
    pub material: Handle<Material>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightType {
    #[default]
    Directional,
    Point,
    Spot,
}

impl LightType {
    /// Value of the `lights[i].type` uniform.
    pub fn shader_index(self) -> i32 {
        match self {
            LightType::Directional => 0,
            LightType::Point => 1,
            LightType::Spot => 2,
        }
    }
}

/// Light component.
///
/// `position` is an offset from the owning entity; `direction` is an Euler rotation
/// offset (radians, pitch/yaw/roll) applied on top of the owner's rotation to the
/// base direction `(0, -1, 0)`. Cone half-angles are in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightType,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub attenuation: Vec3,
    pub cone_angles: Vec2,
    pub position: Vec3,
    pub direction: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightType::Directional,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            attenuation: Vec3::ZERO,
            cone_angles: Vec2::new(45.0, 90.0),
            position: Vec3::ZERO,
            direction: Vec3::ZERO,
        }
    }
}

// ============================================================================
// Motion
// ============================================================================

/// Constant linear and angular velocity (units and radians per second).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Movement {
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}
