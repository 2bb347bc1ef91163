use glam::{Mat4, Vec3};

use crate::asset::{Handle, Mesh};

use super::Material;

/// One draw for the current frame. Holds handles only; rebuilt every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCommand {
    pub mesh: Handle<Mesh>,
    pub material: Handle<Material>,
    pub local_to_world: Mat4,
    /// World-space position of the mesh origin, used for depth sorting.
    pub center: Vec3,
}

impl RenderCommand {
    pub fn new(mesh: Handle<Mesh>, material: Handle<Material>, local_to_world: Mat4) -> Self {
        Self {
            mesh,
            material,
            local_to_world,
            center: local_to_world.transform_point3(Vec3::ZERO),
        }
    }
}

/// Stable back-to-front sort: larger distance along `forward` draws first.
pub fn sort_back_to_front(commands: &mut [RenderCommand], forward: Vec3) {
    commands.sort_by(|a, b| {
        let da = a.center.dot(forward);
        let db = b.center.dot(forward);
        db.total_cmp(&da)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    // x carries a tag to identify the command after sorting
    fn at(z: f32, tag: f32) -> RenderCommand {
        RenderCommand::new(
            Handle::null(),
            Handle::null(),
            Mat4::from_translation(Vec3::new(tag, 0.0, z)),
        )
    }

    #[test]
    fn center_is_transformed_origin() {
        let command = at(-3.0, 1.0);
        assert_eq!(command.center, Vec3::new(1.0, 0.0, -3.0));
    }

    #[test]
    fn farther_commands_come_first() {
        let mut commands = vec![at(-1.0, 0.0), at(-10.0, 1.0), at(-5.0, 2.0)];
        sort_back_to_front(&mut commands, Vec3::NEG_Z);
        let order: Vec<f32> = commands.iter().map(|c| c.center.x).collect();
        assert_eq!(order, vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn sort_is_idempotent() {
        let mut commands = vec![at(-4.0, 0.0), at(-2.0, 1.0), at(-8.0, 2.0), at(-6.0, 3.0)];
        sort_back_to_front(&mut commands, Vec3::NEG_Z);
        let once = commands.clone();
        sort_back_to_front(&mut commands, Vec3::NEG_Z);
        assert_eq!(once, commands);
    }

    #[test]
    fn equal_depths_keep_collection_order() {
        let mut commands = vec![at(-2.0, 0.0), at(-2.0, 1.0), at(-9.0, 2.0), at(-2.0, 3.0)];
        sort_back_to_front(&mut commands, Vec3::NEG_Z);
        let order: Vec<f32> = commands.iter().map(|c| c.center.x).collect();
        assert_eq!(order, vec![2.0, 0.0, 1.0, 3.0]);
    }

    #[test]
    fn nan_centers_do_not_break_ordering() {
        let mut commands = vec![at(-1.0, 0.0), at(-3.0, 1.0)];
        commands[0].center.z = f32::NAN;
        sort_back_to_front(&mut commands, Vec3::NEG_Z);
        assert_eq!(commands.len(), 2);
    }
}
