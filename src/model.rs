//! Polygonal model: vertex, texture-coordinate and normal pools plus faces
//! that reference them by index.
//!
//! A [`Model`] is built once by the [`loader`](crate::loader) and is immutable
//! afterwards. Faces are arbitrary polygons with at least three corners; the
//! renderer splits them into triangle fans anchored at the first corner.

use std::io::BufRead;
use std::path::Path;

use crate::loader::{self, LoadError};
use crate::math::vec2::Vec2;
use crate::math::vec3::Vec3;

/// One polygon of a model.
///
/// The three index lists always have the same length: corner `i` of the face
/// uses `vertex_indices[i]`, `tex_coord_indices[i]` and `normal_indices[i]`.
/// Indices are 0-based and in range for the owning model's pools.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Face {
    vertex_indices: Vec<usize>,
    tex_coord_indices: Vec<usize>,
    normal_indices: Vec<usize>,
}

impl Face {
    /// Build a face from per-corner index lists. Returns None if the lists
    /// have different lengths.
    pub fn new(
        vertex_indices: Vec<usize>,
        tex_coord_indices: Vec<usize>,
        normal_indices: Vec<usize>,
    ) -> Option<Self> {
        let len = vertex_indices.len();
        if tex_coord_indices.len() != len || normal_indices.len() != len {
            return None;
        }
        Some(Self {
            vertex_indices,
            tex_coord_indices,
            normal_indices,
        })
    }

    /// Number of corners.
    pub fn len(&self) -> usize {
        self.vertex_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_indices.is_empty()
    }

    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }

    pub fn tex_coord_indices(&self) -> &[usize] {
        &self.tex_coord_indices
    }

    pub fn normal_indices(&self) -> &[usize] {
        &self.normal_indices
    }

    /// Fan triangulation as corner positions within this face:
    /// `[0, j, j + 1]` for `j` in `1..len - 1`.
    ///
    /// ```text
    ///   3 ______ 2
    ///    |    /|
    ///    |  /  |     quad 0 1 2 3  ->  (0, 1, 2), (0, 2, 3)
    ///    |/____|
    ///   0       1
    /// ```
    pub fn fan(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (1..self.len().saturating_sub(1)).map(|j| [0, j, j + 1])
    }

    /// Fan triangles as indices into the model's vertex pool.
    pub fn fan_vertex_indices(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.fan()
            .map(move |corners| corners.map(|corner| self.vertex_indices[corner]))
    }
}

/// A 3D model loaded from a geometry file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Model {
    vertices: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec3>,
    faces: Vec<Face>,
}

impl Model {
    /// Assemble a model from already validated pools.
    pub(crate) fn from_parts(
        vertices: Vec<Vec3>,
        tex_coords: Vec<Vec2>,
        normals: Vec<Vec3>,
        faces: Vec<Face>,
    ) -> Self {
        Self {
            vertices,
            tex_coords,
            normals,
            faces,
        }
    }

    /// Load a model from a file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        loader::load(path)
    }

    /// Parse a model from any buffered reader. `source_name` is used in
    /// diagnostics and errors.
    pub fn parse<R: BufRead>(reader: R, source_name: &str) -> Result<Self, LoadError> {
        loader::parse(reader, source_name)
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn tex_coords(&self) -> &[Vec2] {
        &self.tex_coords
    }

    /// Unit-length normals.
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Total number of triangles after fan triangulation.
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len().saturating_sub(2)).sum()
    }
}
