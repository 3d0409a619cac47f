use cgmath::{InnerSpace, Vector2, Vector3, Zero};

/// Growable indexed vertex array, the CPU-side staging area every mesh
/// generator in this crate writes into.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub positions: Vec<Vector3<f32>>,
    pub normals: Vec<Vector3<f32>>,
    pub texels: Vec<Vector2<f32>>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32, u: f32, v: f32) {
        self.positions.push(Vector3::new(x, y, z));
        self.normals.push(Vector3::new(nx, ny, nz));
        self.texels.push(Vector2::new(u, v));
    }

    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    pub fn add_quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        self.add_triangle(i0, i1, i2);
        self.add_triangle(i2, i3, i0);
    }

    /// Appends a clockwise oriented quad as four fresh positions plus six
    /// indices. Normals and texels are left untouched.
    pub fn add_quad_face(
        &mut self,
        v0: Vector3<f32>,
        v1: Vector3<f32>,
        v2: Vector3<f32>,
        v3: Vector3<f32>,
    ) {
        let i = self.positions.len() as u32;
        self.positions.push(v0);
        self.positions.push(v1);
        self.positions.push(v2);
        self.positions.push(v3);
        self.add_quad(i, i + 1, i + 2, i + 3);
    }

    pub fn last_vertex_index(&self) -> u32 {
        self.positions.len() as u32 - 1
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.normals.clear();
        self.texels.clear();
        self.indices.clear();
    }

    /// Flat face normals: each triangle's normal, from the cross product of
    /// two edges, is written to all three of its vertices.
    pub fn compute_surface_normals(&mut self, flip: bool) {
        self.normals = vec![Vector3::zero(); self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let (j0, j1, j2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let v0 = self.positions[j0];
            let v1 = self.positions[j1];
            let v2 = self.positions[j2];

            let mut n = (v1 - v0).cross(v2 - v0).normalize();
            if flip {
                n = -n;
            }

            self.normals[j0] = n;
            self.normals[j1] = n;
            self.normals[j2] = n;
        }
    }

    /// Interleaves to `[pos3 normal3]` per vertex.
    pub fn interleaved_pn(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.positions.len() * 6);

        for (p, n) in self.positions.iter().zip(&self.normals) {
            data.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z]);
        }

        data
    }

    /// Interleaves to `[pos3 normal3 uv2]` per vertex.
    pub fn interleaved_pnt(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.positions.len() * 8);

        for ((p, n), t) in self.positions.iter().zip(&self.normals).zip(&self.texels) {
            data.extend_from_slice(&[p.x, p.y, p.z, n.x, n.y, n.z, t.x, t.y]);
        }

        data
    }

    /// Interleaves to `[pos3 normal3 uv2 tangent3 bitangent3]` per vertex.
    pub fn interleaved_with_tangents(&self, basis: &TangentBasis) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.positions.len() * 14);

        for i in 0..self.positions.len() {
            let p = self.positions[i];
            let n = self.normals[i];
            let t = self.texels[i];
            let tan = basis.tangents[i];
            let bit = basis.bitangents[i];

            data.extend_from_slice(&[
                p.x, p.y, p.z, n.x, n.y, n.z, t.x, t.y, tan.x, tan.y, tan.z, bit.x, bit.y, bit.z,
            ]);
        }

        data
    }
}

#[derive(Debug, Clone, Default)]
pub struct TangentBasis {
    pub tangents: Vec<Vector3<f32>>,
    pub bitangents: Vec<Vector3<f32>>,
}

/// Per-triangle tangent space from position and UV deltas, the tangent
/// Gram-Schmidt-orthogonalized against each vertex normal. Vertices are
/// consumed as consecutive triangles, so the mesh must be laid out
/// triangle-by-triangle (the way `add_vertex` is used by the callers).
///
/// Triangles with a degenerate UV mapping fall back to an axis-aligned
/// tangent instead of dividing by a zero determinant.
pub fn compute_tangent_basis(mesh: &MeshData) -> TangentBasis {
    let mut basis = TangentBasis::default();

    let vertex_count = mesh.positions.len() - mesh.positions.len() % 3;

    for i in (0..vertex_count).step_by(3) {
        let v0 = mesh.positions[i];
        let v1 = mesh.positions[i + 1];
        let v2 = mesh.positions[i + 2];

        let uv0 = mesh.texels[i];
        let uv1 = mesh.texels[i + 1];
        let uv2 = mesh.texels[i + 2];

        let delta_pos1 = v1 - v0;
        let delta_pos2 = v2 - v0;

        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;

        let (tangent, bitangent) = if det.abs() > 1e-8 {
            let r = 1.0 / det;
            (
                (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r,
                (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * r,
            )
        } else {
            (Vector3::unit_x(), Vector3::unit_y())
        };

        // Push the tangent to be orthogonal to each vertex normal.
        for j in 0..3 {
            let n = mesh.normals[i + j];
            let t = (tangent - n * tangent.dot(n)).normalize();

            basis.tangents.push(t);
            basis.bitangents.push(bitangent);
        }
    }

    basis
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> MeshData {
        let mut mesh = MeshData::new();
        mesh.add_vertex(-0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0);
        mesh.add_vertex(-0.5, 0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 1.0);
        mesh.add_vertex(0.5, 0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 1.0);
        mesh.add_triangle(0, 1, 2);
        mesh.add_vertex(0.5, 0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 1.0);
        mesh.add_vertex(0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 1.0, 0.0);
        mesh.add_vertex(-0.5, -0.5, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0);
        mesh.add_triangle(3, 4, 5);

        mesh
    }

    #[test]
    fn quad_face_appends_two_triangles() {
        let mut mesh = MeshData::new();
        mesh.add_quad_face(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        );

        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(mesh.last_vertex_index(), 3);
    }

    #[test]
    fn surface_normals_follow_winding() {
        let mut mesh = MeshData::new();
        mesh.add_quad_face(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
        );

        mesh.compute_surface_normals(false);
        for n in &mesh.normals {
            assert!((n.z + 1.0).abs() < 1e-6);
        }

        mesh.compute_surface_normals(true);
        for n in &mesh.normals {
            assert!((n.z - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn tangents_align_with_uv_axes() {
        let mesh = unit_quad();
        let basis = compute_tangent_basis(&mesh);

        assert_eq!(basis.tangents.len(), 6);
        assert_eq!(basis.bitangents.len(), 6);

        // With u growing along +x and v along +y, the tangent is +x and the
        // bitangent +y.
        for t in &basis.tangents {
            assert!((*t - Vector3::unit_x()).magnitude() < 1e-5);
        }
        for b in &basis.bitangents {
            assert!((*b - Vector3::unit_y()).magnitude() < 1e-5);
        }
    }

    #[test]
    fn tangents_are_orthogonal_to_normals() {
        let mesh = unit_quad();
        let basis = compute_tangent_basis(&mesh);

        for (t, n) in basis.tangents.iter().zip(&mesh.normals) {
            assert!(t.dot(*n).abs() < 1e-5);
            assert!((t.magnitude() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn degenerate_uvs_do_not_produce_nan() {
        let mut mesh = MeshData::new();
        mesh.add_vertex(0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5);
        mesh.add_vertex(1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5);
        mesh.add_vertex(0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.5, 0.5);
        mesh.add_triangle(0, 1, 2);

        let basis = compute_tangent_basis(&mesh);

        for t in &basis.tangents {
            assert!(t.x.is_finite() && t.y.is_finite() && t.z.is_finite());
        }
    }

    #[test]
    fn interleaving_strides() {
        let mesh = unit_quad();
        let basis = compute_tangent_basis(&mesh);

        assert_eq!(mesh.interleaved_pn().len(), 6 * 6);
        assert_eq!(mesh.interleaved_pnt().len(), 6 * 8);
        assert_eq!(mesh.interleaved_with_tangents(&basis).len(), 6 * 14);
    }
}
