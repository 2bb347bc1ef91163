use super::vertex::{v, Vertex};
use std::f32::consts::PI;

/// Unit sphere centred on the origin, counter-clockwise when seen from outside.
pub fn sphere_mesh(segments: u32, rings: u32) -> (Vec<Vertex>, Vec<u32>) {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for segment in 0..=segments {
            let theta = 2.0 * PI * segment as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            // For unit sphere, position = normal
            let u = segment as f32 / segments as f32;
            let tex_v = ring as f32 / rings as f32;
            vertices.push(v([x, y, z], [u, tex_v], [x, y, z]));
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;

            indices.extend_from_slice(&[current, current + 1, next]);
            indices.extend_from_slice(&[current + 1, next + 1, next]);
        }
    }

    (vertices, indices)
}

pub fn cube_mesh() -> (Vec<Vertex>, Vec<u32>) {
    let p = |x, y, z| [x, y, z];

    let verts = vec![
        // Right face (+X)
        v(p(0.5, -0.5, -0.5), [0.0, 1.0], [1.0, 0.0, 0.0]),
        v(p(0.5, 0.5, -0.5), [0.0, 0.0], [1.0, 0.0, 0.0]),
        v(p(0.5, 0.5, 0.5), [1.0, 0.0], [1.0, 0.0, 0.0]),
        v(p(0.5, -0.5, 0.5), [1.0, 1.0], [1.0, 0.0, 0.0]),
        // Left face (-X)
        v(p(-0.5, -0.5, 0.5), [0.0, 1.0], [-1.0, 0.0, 0.0]),
        v(p(-0.5, 0.5, 0.5), [0.0, 0.0], [-1.0, 0.0, 0.0]),
        v(p(-0.5, 0.5, -0.5), [1.0, 0.0], [-1.0, 0.0, 0.0]),
        v(p(-0.5, -0.5, -0.5), [1.0, 1.0], [-1.0, 0.0, 0.0]),
        // Top face (+Y)
        v(p(-0.5, 0.5, -0.5), [0.0, 1.0], [0.0, 1.0, 0.0]),
        v(p(-0.5, 0.5, 0.5), [0.0, 0.0], [0.0, 1.0, 0.0]),
        v(p(0.5, 0.5, 0.5), [1.0, 0.0], [0.0, 1.0, 0.0]),
        v(p(0.5, 0.5, -0.5), [1.0, 1.0], [0.0, 1.0, 0.0]),
        // Bottom face (-Y)
        v(p(-0.5, -0.5, 0.5), [0.0, 1.0], [0.0, -1.0, 0.0]),
        v(p(-0.5, -0.5, -0.5), [0.0, 0.0], [0.0, -1.0, 0.0]),
        v(p(0.5, -0.5, -0.5), [1.0, 0.0], [0.0, -1.0, 0.0]),
        v(p(0.5, -0.5, 0.5), [1.0, 1.0], [0.0, -1.0, 0.0]),
        // Front face (+Z)
        v(p(0.5, -0.5, 0.5), [0.0, 1.0], [0.0, 0.0, 1.0]),
        v(p(0.5, 0.5, 0.5), [0.0, 0.0], [0.0, 0.0, 1.0]),
        v(p(-0.5, 0.5, 0.5), [1.0, 0.0], [0.0, 0.0, 1.0]),
        v(p(-0.5, -0.5, 0.5), [1.0, 1.0], [0.0, 0.0, 1.0]),
        // Back face (-Z)
        v(p(-0.5, -0.5, -0.5), [0.0, 1.0], [0.0, 0.0, -1.0]),
        v(p(-0.5, 0.5, -0.5), [0.0, 0.0], [0.0, 0.0, -1.0]),
        v(p(0.5, 0.5, -0.5), [1.0, 0.0], [0.0, 0.0, -1.0]),
        v(p(0.5, -0.5, -0.5), [1.0, 1.0], [0.0, 0.0, -1.0]),
    ];

    let idx = (0..6u32)
        .flat_map(|f| {
            let o = f * 4;
            [o, o + 1, o + 2, o, o + 2, o + 3]
        })
        .collect::<Vec<_>>();

    (verts, idx)
}

/// Unit quad in the XZ plane facing +Y. `uv_scale` repeats the texture across it.
pub fn plane_mesh(uv_scale: [f32; 2]) -> (Vec<Vertex>, Vec<u32>) {
    let [su, sv] = uv_scale;
    let up = [0.0, 1.0, 0.0];
    let verts = vec![
        v([-0.5, 0.0, -0.5], [0.0, 0.0], up),
        v([-0.5, 0.0, 0.5], [0.0, sv], up),
        v([0.5, 0.0, 0.5], [su, sv], up),
        v([0.5, 0.0, -0.5], [su, 0.0], up),
    ];
    (verts, vec![0, 1, 2, 0, 2, 3])
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn face_normal(vertices: &[Vertex], tri: &[u32]) -> Vec3 {
        let a = Vec3::from(vertices[tri[0] as usize].position);
        let b = Vec3::from(vertices[tri[1] as usize].position);
        let c = Vec3::from(vertices[tri[2] as usize].position);
        (b - a).cross(c - a)
    }

    #[test]
    fn cube_counts_look_right() {
        let (v, i) = cube_mesh();
        assert_eq!(v.len(), 24);
        assert_eq!(i.len(), 36);
    }

    #[test]
    fn cube_faces_wind_counter_clockwise_outward() {
        let (v, i) = cube_mesh();
        for tri in i.chunks(3) {
            let normal = Vec3::from(v[tri[0] as usize].normal);
            assert!(face_normal(&v, tri).dot(normal) > 0.0);
        }
    }

    #[test]
    fn sphere_counts_and_winding() {
        let (v, i) = sphere_mesh(16, 16);
        assert_eq!(v.len(), 17 * 17);
        assert_eq!(i.len(), 16 * 16 * 6);
        // Skip the degenerate triangles touching the poles.
        for tri in i.chunks(3).skip(16 * 2).take(16 * 2) {
            let centroid = tri
                .iter()
                .map(|&k| Vec3::from(v[k as usize].position))
                .sum::<Vec3>();
            assert!(face_normal(&v, tri).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn plane_faces_up() {
        let (v, i) = plane_mesh([4.0, 1.0]);
        assert!(face_normal(&v, &i[0..3]).y > 0.0);
        assert_eq!(v[2].tex_coord, [4.0, 1.0]);
    }
}
