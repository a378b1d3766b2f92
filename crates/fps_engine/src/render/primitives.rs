//! Built-in geometry
//!
//! ```text
//!    v6----- v5
//!   /|      /|
//!  v1------v0|
//!  | |     | |
//!  | |v7---|-|v4
//!  |/      |/
//!  v2------v3
//! ```
//!
//! The unit cube is centered on the origin with half-extent 0.5: six faces,
//! two triangles per face, 36 unindexed vertices with flat per-face normals.

/// Vertices in the built-in cube
pub const CUBE_VERTEX_COUNT: usize = 36;

/// Unit cube positions, counter-clockwise triangles
#[rustfmt::skip]
pub const CUBE_VERTICES: [[f32; 3]; CUBE_VERTEX_COUNT] = [
    // front: v0-v1-v2, v2-v3-v0
    [0.5, 0.5, 0.5], [-0.5, 0.5, 0.5], [-0.5, -0.5, 0.5],
    [-0.5, -0.5, 0.5], [0.5, -0.5, 0.5], [0.5, 0.5, 0.5],
    // right: v0-v3-v4, v4-v5-v0
    [0.5, 0.5, 0.5], [0.5, -0.5, 0.5], [0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5], [0.5, 0.5, -0.5], [0.5, 0.5, 0.5],
    // top: v0-v5-v6, v6-v1-v0
    [0.5, 0.5, 0.5], [0.5, 0.5, -0.5], [-0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5], [-0.5, 0.5, 0.5], [0.5, 0.5, 0.5],
    // left: v1-v6-v7, v7-v2-v1
    [-0.5, 0.5, 0.5], [-0.5, 0.5, -0.5], [-0.5, -0.5, -0.5],
    [-0.5, -0.5, -0.5], [-0.5, -0.5, 0.5], [-0.5, 0.5, 0.5],
    // bottom: v7-v4-v3, v3-v2-v7
    [-0.5, -0.5, -0.5], [0.5, -0.5, -0.5], [0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5], [-0.5, -0.5, 0.5], [-0.5, -0.5, -0.5],
    // back: v4-v7-v6, v6-v5-v4
    [0.5, -0.5, -0.5], [-0.5, -0.5, -0.5], [-0.5, 0.5, -0.5],
    [-0.5, 0.5, -0.5], [0.5, 0.5, -0.5], [0.5, -0.5, -0.5],
];

/// Per-vertex face normals matching [`CUBE_VERTICES`]
#[rustfmt::skip]
pub const CUBE_NORMALS: [[f32; 3]; CUBE_VERTEX_COUNT] = [
    [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
    [0.0, 0.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0],
    [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
    [0.0, 1.0, 0.0], [0.0, 1.0, 0.0], [0.0, 1.0, 0.0],
    [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], [-1.0, 0.0, 0.0],
    [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
    [0.0, -1.0, 0.0], [0.0, -1.0, 0.0], [0.0, -1.0, 0.0],
    [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
    [0.0, 0.0, -1.0], [0.0, 0.0, -1.0], [0.0, 0.0, -1.0],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_normals_face_outward() {
        for (triangle, normals) in CUBE_VERTICES.chunks(3).zip(CUBE_NORMALS.chunks(3)) {
            for (vertex, normal) in triangle.iter().zip(normals) {
                let along: f32 = vertex.iter().zip(normal).map(|(v, n)| v * n).sum();
                assert!((along - 0.5).abs() < f32::EPSILON, "{vertex:?} vs {normal:?}");
            }
        }
    }
}
