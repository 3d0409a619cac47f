use std::f32::consts::{PI, TAU};

use cgmath::{InnerSpace, Vector3};

use crate::mesh::MeshData;

/// Latitude/longitude tessellation: bands of quads swept over the polar
/// angles. The loop bounds back off by `0.95 * step` so accumulated float
/// error cannot emit a duplicate seam band.
pub fn lat_long(radius: f32, step: f32) -> MeshData {
    let mut mesh = MeshData::new();

    let mut theta = 0.0;
    while theta <= TAU - step * 0.95 {
        let mut phi = 0.0;
        while phi <= PI - step * 0.95 {
            let v0 = point_on_sphere(radius, theta, phi);
            let v1 = point_on_sphere(radius, theta + step, phi);
            let v2 = point_on_sphere(radius, theta + step, phi + step);
            let v3 = point_on_sphere(radius, theta, phi + step);

            mesh.add_quad_face(v0, v1, v2, v3);

            phi += step;
        }
        theta += step;
    }

    mesh
}

fn point_on_sphere(radius: f32, theta: f32, phi: f32) -> Vector3<f32> {
    Vector3::new(
        radius * phi.sin() * theta.sin(),
        radius * phi.cos(),
        radius * phi.sin() * theta.cos(),
    )
}

/// Patched sphere: each face of a cube is split into `m x m` quads whose
/// corners are normalized onto the unit sphere.
pub fn patched(subdivisions: u32) -> MeshData {
    let m = subdivisions as f32;
    let mut mesh = MeshData::new();

    for i in 0..subdivisions {
        for j in 0..subdivisions {
            let sa = -1.0 + 2.0 * (i as f32 / m);
            let sb = -1.0 + 2.0 * ((i + 1) as f32 / m);
            let ta = -1.0 + 2.0 * (j as f32 / m);
            let tb = -1.0 + 2.0 * ((j + 1) as f32 / m);

            // Front and back
            mesh.add_quad_face(
                Vector3::new(sa, tb, 1.0).normalize(),
                Vector3::new(sb, tb, 1.0).normalize(),
                Vector3::new(sb, ta, 1.0).normalize(),
                Vector3::new(sa, ta, 1.0).normalize(),
            );
            mesh.add_quad_face(
                Vector3::new(sa, ta, -1.0).normalize(),
                Vector3::new(sb, ta, -1.0).normalize(),
                Vector3::new(sb, tb, -1.0).normalize(),
                Vector3::new(sa, tb, -1.0).normalize(),
            );

            // Top and bottom
            mesh.add_quad_face(
                Vector3::new(sa, 1.0, ta).normalize(),
                Vector3::new(sb, 1.0, ta).normalize(),
                Vector3::new(sb, 1.0, tb).normalize(),
                Vector3::new(sa, 1.0, tb).normalize(),
            );
            mesh.add_quad_face(
                Vector3::new(sa, -1.0, tb).normalize(),
                Vector3::new(sb, -1.0, tb).normalize(),
                Vector3::new(sb, -1.0, ta).normalize(),
                Vector3::new(sa, -1.0, ta).normalize(),
            );

            // Left and right
            mesh.add_quad_face(
                Vector3::new(-1.0, sa, ta).normalize(),
                Vector3::new(-1.0, sb, ta).normalize(),
                Vector3::new(-1.0, sb, tb).normalize(),
                Vector3::new(-1.0, sa, tb).normalize(),
            );
            mesh.add_quad_face(
                Vector3::new(1.0, sa, tb).normalize(),
                Vector3::new(1.0, sb, tb).normalize(),
                Vector3::new(1.0, sb, ta).normalize(),
                Vector3::new(1.0, sa, ta).normalize(),
            );
        }
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lat_long_vertices_sit_on_the_sphere() {
        let mesh = lat_long(2.0, PI / 8.0);

        assert!(!mesh.positions.is_empty());
        for p in &mesh.positions {
            assert!((p.magnitude() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn lat_long_band_count() {
        let mesh = lat_long(2.0, PI / 8.0);

        // 16 longitude steps times 8 latitude steps, one quad each.
        assert_eq!(mesh.positions.len(), 16 * 8 * 4);
        assert_eq!(mesh.indices.len(), 16 * 8 * 6);
    }

    #[test]
    fn patched_counts_and_radius() {
        let m = 5;
        let mesh = patched(m);

        assert_eq!(mesh.positions.len(), (6 * m * m * 4) as usize);
        assert_eq!(mesh.indices.len(), (6 * m * m * 6) as usize);
        for p in &mesh.positions {
            assert!((p.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn patched_indices_are_valid() {
        let mesh = patched(3);

        let count = mesh.positions.len() as u32;
        assert!(mesh.indices.iter().all(|i| *i < count));
    }
}
