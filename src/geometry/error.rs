use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Geometry string is empty")]
    Empty,

    #[error("Failed to parse WKT geometry: {message}")]
    Parse { message: String },

    #[error("Geometry has no representative point")]
    NoRepresentativePoint,
}
