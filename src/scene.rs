//! JSON scene descriptions.
//!
//! A scene document lists a flat vertex array and either a set of objects,
//! each holding an index list into that array:
//!
//! ```json
//! {
//!     "name": "quad",
//!     "vertexCount": 4,
//!     "objectCount": 1,
//!     "vertices": [0, 0, -5,  1, 0, -5,  1, 1, -5,  0, 1, -5],
//!     "objects": [
//!         { "name": "quad", "vertexCount": 4, "indexCount": 6, "triangleCount": 2,
//!           "indices": [0, 1, 2,  0, 2, 3] }
//!     ]
//! }
//! ```
//!
//! or the older flat form with `triangleCount` and a `triangles` index
//! array. Every count is checked against its array and every index against
//! the vertex count before a [`Scene`] is produced; a failed load leaves
//! nothing behind.

use std::path::Path;

use serde::Deserialize;

use crate::error::{LoadError, LoadResult};
use crate::geometry::{GeometryStore, ObjectInfo};
use crate::math::vec3::Vec3;
use crate::triangle::Face;

const DEFAULT_SCENE_NAME: &str = "default";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneDocument {
    name: Option<String>,
    vertex_count: Option<i64>,
    object_count: Option<i64>,
    triangle_count: Option<i64>,
    vertices: Option<Vec<f32>>,
    objects: Option<Vec<ObjectDocument>>,
    triangles: Option<Vec<i64>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ObjectDocument {
    #[serde(default)]
    name: String,
    vertex_count: Option<i64>,
    index_count: Option<i64>,
    triangle_count: Option<i64>,
    indices: Option<Vec<i64>>,
}

/// Index-buffered triangle list of one object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mesh {
    /// Declared number of distinct vertices the mesh uses, if given.
    pub vertex_count: Option<usize>,
    indices: Vec<u32>,
}

impl Mesh {
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn faces(&self) -> impl Iterator<Item = Face> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| Face::new(tri[0], tri[1], tri[2]))
    }
}

/// A named entity owning exactly one mesh.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    pub id: u32,
    pub name: String,
    pub mesh: Mesh,
}

/// A validated, load-time scene. Consumed by [`Scene::into_geometry`].
#[derive(Clone, Debug)]
pub struct Scene {
    name: String,
    vertices: Vec<Vec3>,
    objects: Vec<Object>,
}

impl Scene {
    /// Reads and validates a scene file.
    pub fn load(path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        log::info!("Loading scene: {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses and validates a scene document.
    pub fn from_json_str(json: &str) -> LoadResult<Self> {
        let document: SceneDocument = serde_json::from_str(json)?;
        let scene = Self::from_document(document)?;

        log::info!(
            "Scene '{}' loaded: {} vertices, {} objects, {} triangles",
            scene.name,
            scene.vertex_count(),
            scene.object_count(),
            scene.triangle_count()
        );
        Ok(scene)
    }

    fn from_document(document: SceneDocument) -> LoadResult<Self> {
        let vertex_count = positive("vertexCount", document.vertex_count)?;
        let raw_vertices = document
            .vertices
            .ok_or_else(|| LoadError::MissingField("vertices".to_string()))?;
        expect_len(
            "vertices",
            times_three("vertexCount", vertex_count)?,
            raw_vertices.len(),
        )?;

        let vertices: Vec<Vec3> = raw_vertices
            .chunks_exact(3)
            .map(|v| Vec3::new(v[0], v[1], v[2]))
            .collect();
        // Indices are checked against the vertices actually present.
        let vertex_count = vertices.len();

        let objects = match (document.objects, document.triangles) {
            (Some(objects), _) => {
                let object_count = positive("objectCount", document.object_count)?;
                expect_len("objects", object_count, objects.len())?;
                objects
                    .into_iter()
                    .enumerate()
                    .map(|(i, object)| parse_object(i, object, vertex_count))
                    .collect::<LoadResult<Vec<_>>>()?
            }
            (None, Some(triangles)) => {
                let triangle_count = positive("triangleCount", document.triangle_count)?;
                expect_len(
                    "triangles",
                    times_three("triangleCount", triangle_count)?,
                    triangles.len(),
                )?;
                let indices = parse_indices("triangles", &triangles, vertex_count)?;
                vec![Object {
                    id: 0,
                    name: String::new(),
                    mesh: Mesh {
                        vertex_count: None,
                        indices,
                    },
                }]
            }
            (None, None) => return Err(LoadError::MissingField("objects".to_string())),
        };

        Ok(Self {
            name: document
                .name
                .unwrap_or_else(|| DEFAULT_SCENE_NAME.to_string()),
            vertices,
            objects,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.objects.iter().map(|o| o.mesh.triangle_count()).sum()
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Hands the vertex array over to a [`GeometryStore`] and builds one
    /// referencing face per three indices, for every object in order.
    pub fn into_geometry(self) -> GeometryStore {
        let mut faces = Vec::with_capacity(self.triangle_count());
        let mut objects = Vec::with_capacity(self.objects.len());

        for object in self.objects {
            faces.extend(object.mesh.faces());
            objects.push(ObjectInfo {
                id: object.id,
                name: object.name,
                triangle_count: object.mesh.triangle_count(),
            });
        }

        GeometryStore::from_validated(self.name, self.vertices, faces, objects)
    }
}

fn parse_object(index: usize, object: ObjectDocument, vertex_count: usize) -> LoadResult<Object> {
    let field = |name: &str| format!("objects[{index}].{name}");
    log::debug!("Loading object '{}'", object.name);

    let declared_vertices = object
        .vertex_count
        .map(|count| positive(&field("vertexCount"), Some(count)))
        .transpose()?;
    let declared_indices = object
        .index_count
        .map(|count| positive(&field("indexCount"), Some(count)))
        .transpose()?;
    let declared_triangles = object
        .triangle_count
        .map(|count| positive(&field("triangleCount"), Some(count)))
        .transpose()?;

    let index_count = match (declared_indices, declared_triangles) {
        (Some(indices), Some(triangles)) => {
            expect_len(
                &field("indexCount"),
                times_three(&field("triangleCount"), triangles)?,
                indices,
            )?;
            indices
        }
        (Some(indices), None) => {
            if indices % 3 != 0 {
                return Err(LoadError::PartialTriangle {
                    field: field("indexCount"),
                    count: indices as i64,
                });
            }
            indices
        }
        (None, Some(triangles)) => times_three(&field("triangleCount"), triangles)?,
        (None, None) => return Err(LoadError::MissingField(field("indexCount"))),
    };

    let raw_indices = object
        .indices
        .ok_or_else(|| LoadError::MissingField(field("indices")))?;
    expect_len(&field("indices"), index_count, raw_indices.len())?;
    let indices = parse_indices(&field("indices"), &raw_indices, vertex_count)?;

    log::debug!(
        "  '{}': {} indices, {} triangles",
        object.name,
        index_count,
        index_count / 3
    );

    Ok(Object {
        id: index as u32,
        name: object.name,
        mesh: Mesh {
            vertex_count: declared_vertices,
            indices,
        },
    })
}

fn positive(field: &str, value: Option<i64>) -> LoadResult<usize> {
    match value {
        None => Err(LoadError::MissingField(field.to_string())),
        Some(v) if v <= 0 => Err(LoadError::NonPositiveCount {
            field: field.to_string(),
            value: v,
        }),
        Some(v) => usize::try_from(v).map_err(|_| LoadError::CountTooLarge {
            field: field.to_string(),
            value: v,
        }),
    }
}

/// Index or component count for `count` triples.
fn times_three(field: &str, count: usize) -> LoadResult<usize> {
    count.checked_mul(3).ok_or_else(|| LoadError::CountTooLarge {
        field: field.to_string(),
        value: count as i64,
    })
}

fn expect_len(field: &str, expected: usize, actual: usize) -> LoadResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(LoadError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual,
        })
    }
}

fn parse_indices(field: &str, raw: &[i64], vertex_count: usize) -> LoadResult<Vec<u32>> {
    raw.iter()
        .enumerate()
        .map(|(i, &index)| {
            if index < 0 || index as u64 >= vertex_count as u64 {
                Err(LoadError::IndexOutOfRange {
                    field: format!("{field}[{i}]"),
                    index,
                    vertex_count,
                })
            } else {
                Ok(index as u32)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = r#"{
        "name": "pair",
        "vertexCount": 4,
        "objectCount": 2,
        "vertices": [0, 0, -5,  1, 0, -5,  0, 1, -5,  1, 1, -6],
        "objects": [
            { "name": "first", "vertexCount": 3, "indexCount": 3, "triangleCount": 1,
              "indices": [0, 1, 2] },
            { "name": "second", "vertexCount": 3, "indexCount": 3, "triangleCount": 1,
              "indices": [1, 3, 2] }
        ]
    }"#;

    fn field_of(err: LoadError) -> String {
        match err {
            LoadError::MissingField(field) => field,
            LoadError::NonPositiveCount { field, .. }
            | LoadError::LengthMismatch { field, .. }
            | LoadError::PartialTriangle { field, .. }
            | LoadError::CountTooLarge { field, .. }
            | LoadError::IndexOutOfRange { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn loads_object_scene() {
        let scene = Scene::from_json_str(TWO_OBJECTS).unwrap();
        assert_eq!(scene.name(), "pair");
        assert_eq!(scene.vertex_count(), 4);
        assert_eq!(scene.object_count(), 2);
        assert_eq!(scene.triangle_count(), 2);
        assert_eq!(scene.objects()[1].id, 1);
        assert_eq!(scene.objects()[1].mesh.vertex_count, Some(3));
        assert_eq!(scene.vertices()[3], Vec3::new(1.0, 1.0, -6.0));
    }

    #[test]
    fn geometry_keeps_faces_of_every_object() {
        let store = Scene::from_json_str(TWO_OBJECTS).unwrap().into_geometry();
        assert_eq!(store.vertex_count(), 4);
        assert_eq!(store.faces(), &[Face::new(0, 1, 2), Face::new(1, 3, 2)]);
        assert_eq!(store.objects()[0].name, "first");
        assert_eq!(store.objects()[1].triangle_count, 1);
        for face in store.faces() {
            for index in [face.a, face.b, face.c] {
                assert!((index as usize) < store.vertex_count());
            }
        }
    }

    #[test]
    fn loads_flat_triangle_scene() {
        let json = r#"{
            "vertexCount": 3,
            "triangleCount": 1,
            "vertices": [0, 0, -5, 1, 0, -5, 0, 1, -5],
            "triangles": [0, 1, 2]
        }"#;
        let scene = Scene::from_json_str(json).unwrap();
        assert_eq!(scene.name(), "default");
        assert_eq!(scene.triangle_count(), 1);
        assert_eq!(scene.objects()[0].mesh.indices(), &[0, 1, 2]);
    }

    #[test]
    fn rejects_non_positive_vertex_count() {
        let json = r#"{ "vertexCount": 0, "objectCount": 1, "vertices": [], "objects": [] }"#;
        let err = Scene::from_json_str(json).unwrap_err();
        assert!(matches!(err, LoadError::NonPositiveCount { value: 0, .. }));
    }

    #[test]
    fn rejects_vertex_array_length_mismatch() {
        let json = r#"{
            "vertexCount": 2, "objectCount": 1,
            "vertices": [0, 0, 0, 1, 1],
            "objects": [{ "name": "a", "indexCount": 3, "indices": [0, 1, 1] }]
        }"#;
        let err = Scene::from_json_str(json).unwrap_err();
        assert!(matches!(
            err,
            LoadError::LengthMismatch { expected: 6, actual: 5, .. }
        ));
    }

    #[test]
    fn rejects_object_count_mismatch() {
        let json = r#"{
            "vertexCount": 3, "objectCount": 2,
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "objects": [{ "name": "a", "indexCount": 3, "indices": [0, 1, 2] }]
        }"#;
        assert_eq!(field_of(Scene::from_json_str(json).unwrap_err()), "objects");
    }

    #[test]
    fn rejects_index_count_mismatch() {
        let json = r#"{
            "vertexCount": 3, "objectCount": 1,
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "objects": [{ "name": "a", "indexCount": 6, "triangleCount": 2, "indices": [0, 1, 2] }]
        }"#;
        assert_eq!(
            field_of(Scene::from_json_str(json).unwrap_err()),
            "objects[0].indices"
        );
    }

    #[test]
    fn rejects_inconsistent_index_and_triangle_counts() {
        let json = r#"{
            "vertexCount": 3, "objectCount": 1,
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "objects": [{ "name": "a", "indexCount": 3, "triangleCount": 2, "indices": [0, 1, 2] }]
        }"#;
        assert_eq!(
            field_of(Scene::from_json_str(json).unwrap_err()),
            "objects[0].indexCount"
        );
    }

    #[test]
    fn rejects_out_of_range_index_with_location() {
        let json = r#"{
            "vertexCount": 3, "objectCount": 1,
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "objects": [{ "name": "a", "indexCount": 3, "indices": [0, 3, 2] }]
        }"#;
        match Scene::from_json_str(json).unwrap_err() {
            LoadError::IndexOutOfRange {
                field,
                index,
                vertex_count,
            } => {
                assert_eq!(field, "objects[0].indices[1]");
                assert_eq!(index, 3);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_negative_index() {
        let json = r#"{
            "vertexCount": 3, "triangleCount": 1,
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "triangles": [0, -1, 2]
        }"#;
        assert_eq!(
            field_of(Scene::from_json_str(json).unwrap_err()),
            "triangles[1]"
        );
    }

    #[test]
    fn rejects_partial_triangle() {
        let json = r#"{
            "vertexCount": 3, "objectCount": 1,
            "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
            "objects": [{ "name": "a", "indexCount": 4, "indices": [0, 1, 2, 0] }]
        }"#;
        assert!(matches!(
            Scene::from_json_str(json).unwrap_err(),
            LoadError::PartialTriangle { count: 4, .. }
        ));
    }

    // 3 * 6148914691236517206 wraps to 2 in 64-bit arithmetic.
    const WRAPPING_COUNT: &str = "6148914691236517206";

    #[test]
    fn rejects_vertex_count_that_overflows() {
        let json = format!(
            r#"{{
                "vertexCount": {WRAPPING_COUNT}, "objectCount": 1,
                "vertices": [0, 0],
                "objects": [{{ "name": "a", "indexCount": 3, "indices": [0, 1, 2] }}]
            }}"#
        );
        match Scene::from_json_str(&json).unwrap_err() {
            LoadError::CountTooLarge { field, .. } => assert_eq!(field, "vertexCount"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_flat_triangle_count_that_overflows() {
        let json = format!(
            r#"{{
                "vertexCount": 3, "triangleCount": {WRAPPING_COUNT},
                "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "triangles": [0, 1]
            }}"#
        );
        assert!(matches!(
            Scene::from_json_str(&json).unwrap_err(),
            LoadError::CountTooLarge { .. }
        ));
    }

    #[test]
    fn rejects_object_triangle_count_that_overflows() {
        let json = format!(
            r#"{{
                "vertexCount": 3, "objectCount": 1,
                "vertices": [0, 0, 0, 1, 0, 0, 0, 1, 0],
                "objects": [{{ "name": "a", "triangleCount": {WRAPPING_COUNT}, "indices": [0, 1] }}]
            }}"#
        );
        assert_eq!(
            field_of(Scene::from_json_str(&json).unwrap_err()),
            "objects[0].triangleCount"
        );
    }

    #[test]
    fn rejects_scene_without_topology() {
        let json = r#"{ "vertexCount": 1, "vertices": [0, 0, 0] }"#;
        assert_eq!(field_of(Scene::from_json_str(json).unwrap_err()), "objects");
    }

    #[test]
    fn reports_malformed_json() {
        let err = Scene::from_json_str(r#"{ "vertexCount": "three" }"#).unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn reports_missing_file() {
        let err = Scene::load("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
