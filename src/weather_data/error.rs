use crate::http::error::HttpError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherDataError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("Unexpected observation response")]
    UnexpectedResponse(#[source] serde_json::Error),
}
