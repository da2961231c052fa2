use crate::http::error::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmenityError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Unexpected Overpass response")]
    UnexpectedResponse(#[source] serde_json::Error),
}
