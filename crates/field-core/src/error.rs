use thiserror::Error;

/// Failures that stop a field from mounting. There is no retry.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("mount root is missing or not in the document")]
    RootMissing,

    #[error("2D drawing context unavailable: {0}")]
    SurfaceUnavailable(String),
}
