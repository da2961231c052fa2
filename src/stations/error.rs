use crate::http::error::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateStationError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Unexpected station search response")]
    UnexpectedResponse(#[source] serde_json::Error),
}
