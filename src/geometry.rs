//! Engine-owned geometry: the shared vertex arena and the faces indexing it.

use crate::error::{LoadError, LoadResult};
use crate::math::vec3::Vec3;
use crate::sorting;
use crate::transform::Transform;
use crate::triangle::Face;

/// Summary of one loaded object. Its faces live in the shared face list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectInfo {
    pub id: u32,
    pub name: String,
    pub triangle_count: usize,
}

/// Vertex positions plus the faces referencing them.
///
/// Built once per scene load and sized exactly to the loaded counts. The
/// vertex array is only mutated through [`GeometryStore::apply_transform`]
/// and the face order only through [`GeometryStore::sort_by_depth`].
#[derive(Clone, Debug, Default)]
pub struct GeometryStore {
    name: String,
    vertices: Vec<Vec3>,
    faces: Vec<Face>,
    objects: Vec<ObjectInfo>,
}

impl GeometryStore {
    /// Creates an anonymous store from raw parts, validating every index.
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face>) -> LoadResult<Self> {
        let vertex_count = vertices.len();
        for (i, face) in faces.iter().enumerate() {
            for (slot, index) in [face.a, face.b, face.c].into_iter().enumerate() {
                if index as usize >= vertex_count {
                    return Err(LoadError::IndexOutOfRange {
                        field: format!("faces[{i}][{slot}]"),
                        index: index as i64,
                        vertex_count,
                    });
                }
            }
        }
        let objects = vec![ObjectInfo {
            id: 0,
            name: String::new(),
            triangle_count: faces.len(),
        }];
        Ok(Self::from_validated("default".to_string(), vertices, faces, objects))
    }

    /// Assembles a store whose faces are already known to be in range.
    pub(crate) fn from_validated(
        name: String,
        vertices: Vec<Vec3>,
        faces: Vec<Face>,
        objects: Vec<ObjectInfo>,
    ) -> Self {
        Self {
            name,
            vertices,
            faces,
            objects,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn objects(&self) -> &[ObjectInfo] {
        &self.objects
    }

    /// Transforms every vertex in place, once. Calling this twice compounds.
    pub fn apply_transform(&mut self, transform: &Transform) {
        transform.apply(&mut self.vertices);
    }

    /// Reorders faces back to front. Must run after any vertex change.
    pub fn sort_by_depth(&mut self) {
        sorting::sort_by_depth(&mut self.faces, &self.vertices);
    }
}
