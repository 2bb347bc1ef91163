use glam::{EulerRot, Mat4, Quat, Vec3};

/// Local placement relative to the parent entity.
///
/// `rotation` holds Euler angles in radians: `x` is pitch, `y` is yaw and `z` is
/// roll, applied as yaw, then pitch, then roll (`Ry * Rx * Rz`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Build from a position, rotation in degrees, and scale.
    pub fn from_degrees(position: Vec3, rotation_degrees: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::new(
                rotation_degrees.x.to_radians(),
                rotation_degrees.y.to_radians(),
                rotation_degrees.z.to_radians(),
            ),
            scale,
        }
    }

    pub fn quat(&self) -> Quat {
        euler_quat(self.rotation)
    }

    /// `T * R * S`
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_quat(self.quat()) * Mat4::from_scale(self.scale)
    }
}

/// Rotation for Euler angles laid out as (pitch, yaw, roll).
pub fn euler_quat(rotation: Vec3) -> Quat {
    Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z)
}
