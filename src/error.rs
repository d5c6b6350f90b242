//! Error types for scene loading, configuration, and output.

use std::path::PathBuf;

use thiserror::Error;

/// A scene description could not be turned into geometry.
///
/// `field` strings point at the offending JSON location, for example
/// `objects[1].indices[4]`.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to open scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("scene is missing required field `{0}`")]
    MissingField(String),
    #[error("`{field}` must be positive, got {value}")]
    NonPositiveCount { field: String, value: i64 },
    #[error("`{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },
    #[error("`{field}` is {count}, which is not a whole number of triangles")]
    PartialTriangle { field: String, count: i64 },
    #[error("`{field}` of {value} is too large to address")]
    CountTooLarge { field: String, value: i64 },
    #[error("`{field}` references vertex {index}, but the scene has {vertex_count} vertices")]
    IndexOutOfRange {
        field: String,
        index: i64,
        vertex_count: usize,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Settings could not be read, written, or validated.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Presentation or export failed.
#[derive(Error, Debug)]
pub enum RenderError {
    /// SDL reports its failures as plain strings.
    #[error("display error: {0}")]
    Display(String),
    #[error("failed to export image: {0}")]
    Export(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
