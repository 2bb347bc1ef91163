use glam::{Mat4, UVec2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    #[default]
    Perspective,
    Orthographic,
}

/// Camera component. The view comes from the owning entity's world transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    pub fov_y_radians: f32,
    pub ortho_height: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective,
            fov_y_radians: 90f32.to_radians(),
            ortho_height: 1.0,
            near: 0.01,
            far: 100.0,
        }
    }
}

impl Camera {
    /// Projection matrix for a target of `size` pixels (OpenGL clip space).
    pub fn projection_matrix(&self, size: UVec2) -> Mat4 {
        let aspect = size.x.max(1) as f32 / size.y.max(1) as f32;
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh_gl(self.fov_y_radians, aspect, self.near, self.far)
            }
            Projection::Orthographic => {
                let half_height = self.ortho_height * 0.5;
                let half_width = half_height * aspect;
                Mat4::orthographic_rh_gl(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn projection_is_invertible() {
        let cam = Camera::default();
        let proj = cam.projection_matrix(UVec2::new(1280, 720));
        let id = proj * proj.inverse();
        assert!(id.abs_diff_eq(Mat4::IDENTITY, 1e-4));
    }

    #[test]
    fn near_plane_maps_to_minus_one() {
        let cam = Camera::default();
        let clip = cam.projection_matrix(UVec2::new(100, 100)) * Vec4::new(0.0, 0.0, -cam.near, 1.0);
        assert!((clip.z / clip.w + 1.0).abs() < 1e-4);
    }

    #[test]
    fn orthographic_spans_height() {
        let cam = Camera {
            projection: Projection::Orthographic,
            ortho_height: 4.0,
            ..Camera::default()
        };
        let clip = cam.projection_matrix(UVec2::new(200, 100)) * Vec4::new(4.0, 2.0, -1.0, 1.0);
        assert!((clip.x - 1.0).abs() < 1e-5);
        assert!((clip.y - 1.0).abs() < 1e-5);
    }
}
