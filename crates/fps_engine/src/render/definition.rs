//! Custom geometry definitions
//!
//! A definition is a named vertex/normal table the renderer owns once it is
//! registered. Objects of type [`Custom`](super::ObjectType::Custom) refer to
//! one by [`DefinitionId`].

use super::backend::Topology;
use super::RenderError;

/// Application-chosen definition identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DefinitionId(pub u32);

impl std::fmt::Display for DefinitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "def#{}", self.0)
    }
}

/// Unindexed geometry with per-vertex normals
#[derive(Debug, Clone, PartialEq)]
pub struct RenderDefinition {
    id: DefinitionId,
    vertices: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    topology: Topology,
}

impl RenderDefinition {
    /// Build a definition
    ///
    /// Fails if `normals` and `vertices` differ in length, or if the vertex
    /// count leaves a partial primitive for `topology`.
    pub fn new(
        id: DefinitionId,
        vertices: Vec<[f32; 3]>,
        normals: Vec<[f32; 3]>,
        topology: Topology,
    ) -> Result<Self, RenderError> {
        if vertices.len() != normals.len() {
            return Err(RenderError::InvalidDefinition {
                id,
                reason: format!(
                    "{} vertices but {} normals",
                    vertices.len(),
                    normals.len()
                ),
            });
        }
        let per_primitive = topology.vertices_per_primitive();
        if vertices.len() % per_primitive != 0 {
            return Err(RenderError::InvalidDefinition {
                id,
                reason: format!(
                    "{} vertices do not form whole {topology:?} ({per_primitive} per primitive)",
                    vertices.len()
                ),
            });
        }
        Ok(Self {
            id,
            vertices,
            normals,
            topology,
        })
    }

    /// Build a triangle-list definition whose normals are the face normals
    ///
    /// A trailing partial triangle is dropped.
    pub fn from_triangles(id: DefinitionId, vertices: Vec<[f32; 3]>) -> Result<Self, RenderError> {
        let per_triangle = Topology::Triangles.vertices_per_primitive();
        let whole = vertices.len() - vertices.len() % per_triangle;
        let vertices: Vec<[f32; 3]> = vertices.into_iter().take(whole).collect();
        let normals = vertices
            .chunks_exact(per_triangle)
            .flat_map(|tri| {
                let normal = face_normal(tri[0], tri[1], tri[2]);
                [normal; 3]
            })
            .collect();
        Self::new(id, vertices, normals, Topology::Triangles)
    }

    /// Identifier
    pub const fn id(&self) -> DefinitionId {
        self.id
    }

    /// Vertex positions
    pub fn vertices(&self) -> &[[f32; 3]] {
        &self.vertices
    }

    /// Vertex normals, one per vertex
    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    /// Primitive topology
    pub const fn topology(&self) -> Topology {
        self.topology
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

fn face_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    use crate::foundation::math::Vec3;

    let a = Vec3::from(a);
    let n = (Vec3::from(b) - a).cross(&(Vec3::from(c) - a));
    n.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mismatched_normals_rejected() {
        let err = RenderDefinition::new(
            DefinitionId(1),
            vec![[0.0; 3]; 3],
            vec![[0.0; 3]; 2],
            Topology::Triangles,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidDefinition { id: DefinitionId(1), .. }));
    }

    #[test]
    fn test_partial_primitive_rejected() {
        let err = RenderDefinition::new(
            DefinitionId(4),
            vec![[0.0; 3]; 6],
            vec![[0.0, 1.0, 0.0]; 6],
            Topology::Quads,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::InvalidDefinition { id: DefinitionId(4), .. }));

        assert!(RenderDefinition::new(
            DefinitionId(5),
            vec![[0.0; 3]; 6],
            vec![[0.0, 1.0, 0.0]; 6],
            Topology::Lines,
        )
        .is_ok());
    }

    #[test]
    fn test_vertex_count_is_derived() {
        let def = RenderDefinition::new(
            DefinitionId(2),
            vec![[0.0; 3]; 4],
            vec![[0.0, 1.0, 0.0]; 4],
            Topology::Quads,
        )
        .unwrap();
        assert_eq!(def.vertex_count(), 4);
        assert_eq!(def.topology(), Topology::Quads);
    }

    #[test]
    fn test_from_triangles_computes_face_normals() {
        let def = RenderDefinition::from_triangles(
            DefinitionId(3),
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [9.0, 9.0, 9.0]],
        )
        .unwrap();
        assert_eq!(def.vertex_count(), 3);
        assert_eq!(def.normals(), &[[0.0, 0.0, 1.0]; 3]);
    }
}
