//! Mesh geometry representation.
//!
//! A renderer-agnostic triangle mesh populated by the face/vertex text
//! loader and turned into intersectable triangles by the renderer.

use ember_math::Vec3;

/// A mesh consisting of vertex positions, optional normals, and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Normals referenced by `normal_indices` (not necessarily one per vertex)
    pub normals: Vec<Vec3>,

    /// Triangle indices into `positions` (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Triangle indices into `normals`, parallel to `indices` when present
    pub normal_indices: Option<Vec<u32>>,

}

impl Mesh {
    /// Create a new mesh from positions and indices without normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals: Vec::new(),
            indices,
            normal_indices: None,
        }
    }

    /// Create a mesh whose faces also reference a normal list.
    pub fn with_normals(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Vec<Vec3>,
        normal_indices: Vec<u32>,
    ) -> Self {
        Self {
            positions,
            normals,
            indices,
            normal_indices: Some(normal_indices),
        }
    }

    /// Check if the faces carry normals.
    pub fn has_normals(&self) -> bool {
        self.normal_indices.is_some()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Vertices of triangle `face`.
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        let i = &self.indices[face * 3..face * 3 + 3];
        [
            self.positions[i[0] as usize],
            self.positions[i[1] as usize],
            self.positions[i[2] as usize],
        ]
    }

    /// The single shading normal of triangle `face`.
    ///
    /// Triangles are flat-shaded: the normals a face references are averaged
    /// and oriented to agree with the winding. Without normals (or when they
    /// cancel out, or an index is out of range) the geometric normal is used.
    pub fn face_normal(&self, face: usize) -> Vec3 {
        let [v0, v1, v2] = self.triangle(face);
        let geometric = (v1 - v0).cross(v2 - v0);

        let referenced = self
            .normal_indices
            .as_ref()
            .and_then(|ni| ni.get(face * 3..face * 3 + 3))
            .and_then(|corners| {
                corners
                    .iter()
                    .map(|&n| self.normals.get(n as usize).copied())
                    .sum::<Option<Vec3>>()
            });

        let Some(sum) = referenced else {
            return geometric.normalize_or_zero();
        };
        if sum.length_squared() < 1e-12 {
            return geometric.normalize_or_zero();
        }
        let shading = sum.normalize();
        if geometric.dot(shading) < 0.0 {
            -shading
        } else {
            shading
        }
    }
}
