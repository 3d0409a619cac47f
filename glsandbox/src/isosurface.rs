use cgmath::Vector3;
use rayon::prelude::*;

use crate::mesh::MeshData;

/// The implicit surfaces known to the isosurface demo, approximated as the
/// level set `f(x, y, z) = 0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Surface {
    /// Nordstrand's weird surface.
    Nordstrand,
    Quartic,
    Sphere,
    Paraboloid,
    Sextic,
}

impl Surface {
    #[rustfmt::skip]
    pub fn eval(&self, x: f32, y: f32, z: f32) -> f32 {
        match self {
            Surface::Nordstrand => {
                25.0 * (x.powi(3) * (y + z) + y.powi(3) * (x + z) + z.powi(3) * (x + y))
                    + 50.0 * (x * x * y * y + x * x * z * z + y * y * z * z)
                    - 125.0 * (x * x * y * z + y * y * x * z + z * z * x * y)
                    + 60.0 * x * y * z
                    - 4.0 * (x * y + x * z + y * z)
            }
            Surface::Quartic => {
                x.powi(4) + y.powi(4) + z.powi(4) - 1.4 * (x * x + y * y + z * z) + 0.55
            }
            Surface::Sphere => x * x + y * y + z * z - 1.0,
            Surface::Paraboloid => y - x * x - z * z,
            Surface::Sextic => x.powi(6) + y.powi(6) + z.powi(6) - 1.0,
        }
    }
}

/// Brute-force voxel polygonizer. The field is sampled on a cubical grid;
/// voxels where `|f| <= epsilon` are solid, and only faces whose neighbor
/// voxel is empty are emitted, as clockwise quads.
#[derive(Debug, Copy, Clone)]
pub struct Polygonizer {
    pub resolution: u32,
    pub epsilon: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for Polygonizer {
    fn default() -> Self {
        Self {
            resolution: 128,
            epsilon: 0.3,
            min: -1.5,
            max: 1.5,
        }
    }
}

impl Polygonizer {
    pub fn polygonize(&self, surface: Surface) -> MeshData {
        let resolution = self.resolution;

        // Each x-slab is scanned independently; the slab meshes are merged
        // in grid order, so the output is deterministic.
        let slabs: Vec<MeshData> = (0..=resolution)
            .into_par_iter()
            .map(|gx| self.scan_slab(surface, gx))
            .collect();

        let mut mesh = MeshData::new();
        for slab in slabs {
            let base = mesh.positions.len() as u32;
            mesh.positions.extend_from_slice(&slab.positions);
            mesh.indices.extend(slab.indices.iter().map(|i| i + base));
        }

        mesh
    }

    fn scan_slab(&self, surface: Surface, gx: u32) -> MeshData {
        let span = self.max - self.min;
        let block = span / self.resolution as f32;
        let h = block / 2.0;

        let mut mesh = MeshData::new();

        let x = self.min + span * (gx as f32 / self.resolution as f32);

        for gy in 0..=self.resolution {
            let y = self.min + span * (gy as f32 / self.resolution as f32);

            for gz in 0..=self.resolution {
                let z = self.min + span * (gz as f32 / self.resolution as f32);

                if surface.eval(x, y, z).abs() > self.epsilon {
                    continue;
                }

                let empty = |x: f32, y: f32, z: f32| surface.eval(x, y, z).abs() > self.epsilon;

                // Front and back
                if empty(x, y, z + block) {
                    mesh.add_quad_face(
                        Vector3::new(x - h, y - h, z + h),
                        Vector3::new(x - h, y + h, z + h),
                        Vector3::new(x + h, y + h, z + h),
                        Vector3::new(x + h, y - h, z + h),
                    );
                }
                if empty(x, y, z - block) {
                    mesh.add_quad_face(
                        Vector3::new(x - h, y - h, z - h),
                        Vector3::new(x + h, y - h, z - h),
                        Vector3::new(x + h, y + h, z - h),
                        Vector3::new(x - h, y + h, z - h),
                    );
                }

                // Top and bottom
                if empty(x, y + block, z) {
                    mesh.add_quad_face(
                        Vector3::new(x - h, y + h, z + h),
                        Vector3::new(x - h, y + h, z - h),
                        Vector3::new(x + h, y + h, z - h),
                        Vector3::new(x + h, y + h, z + h),
                    );
                }
                if empty(x, y - block, z) {
                    mesh.add_quad_face(
                        Vector3::new(x - h, y - h, z + h),
                        Vector3::new(x + h, y - h, z + h),
                        Vector3::new(x + h, y - h, z - h),
                        Vector3::new(x - h, y - h, z - h),
                    );
                }

                // Left and right
                if empty(x - block, y, z) {
                    mesh.add_quad_face(
                        Vector3::new(x - h, y - h, z - h),
                        Vector3::new(x - h, y + h, z - h),
                        Vector3::new(x - h, y + h, z + h),
                        Vector3::new(x - h, y - h, z + h),
                    );
                }
                if empty(x + block, y, z) {
                    mesh.add_quad_face(
                        Vector3::new(x + h, y - h, z + h),
                        Vector3::new(x + h, y + h, z + h),
                        Vector3::new(x + h, y + h, z - h),
                        Vector3::new(x + h, y - h, z - h),
                    );
                }
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygonizer(resolution: u32) -> Polygonizer {
        Polygonizer {
            resolution,
            epsilon: 0.3,
            min: -1.5,
            max: 1.5,
        }
    }

    #[test]
    fn sphere_shell_is_nonempty_and_within_bounds() {
        let mesh = polygonizer(16).polygonize(Surface::Sphere);

        assert!(!mesh.positions.is_empty());
        assert_eq!(mesh.indices.len() % 6, 0);

        let half_block = (3.0 / 16.0) / 2.0;
        for p in &mesh.positions {
            assert!(p.x.abs() <= 1.5 + half_block);
            assert!(p.y.abs() <= 1.5 + half_block);
            assert!(p.z.abs() <= 1.5 + half_block);
        }
    }

    #[test]
    fn sphere_faces_sit_near_the_unit_radius() {
        let mesh = polygonizer(24).polygonize(Surface::Sphere);

        // |x^2 + y^2 + z^2 - 1| <= 0.3 puts solid voxel centers in a band
        // around radius 1; emitted corners stay within a block of it.
        let block = 3.0 / 24.0;
        for p in &mesh.positions {
            let r = (p.x * p.x + p.y * p.y + p.z * p.z).sqrt();
            assert!(r > (0.7f32).sqrt() - 2.0 * block && r < (1.3f32).sqrt() + 2.0 * block);
        }
    }

    #[test]
    fn indices_reference_valid_vertices() {
        let mesh = polygonizer(12).polygonize(Surface::Quartic);

        let count = mesh.positions.len() as u32;
        assert!(mesh.indices.iter().all(|i| *i < count));
    }

    #[test]
    fn interior_voxels_emit_no_faces() {
        // A huge epsilon makes every voxel solid, so no face has an empty
        // neighbor inside the grid.
        let poly = Polygonizer {
            resolution: 8,
            epsilon: f32::INFINITY,
            min: -1.0,
            max: 1.0,
        };

        let mesh = poly.polygonize(Surface::Sphere);
        assert!(mesh.positions.is_empty());
    }

    #[test]
    fn scan_is_deterministic() {
        let a = polygonizer(10).polygonize(Surface::Nordstrand);
        let b = polygonizer(10).polygonize(Surface::Nordstrand);

        assert_eq!(a.positions.len(), b.positions.len());
        assert_eq!(a.indices, b.indices);
        assert!(a
            .positions
            .iter()
            .zip(&b.positions)
            .all(|(p, q)| p == q));
    }
}
