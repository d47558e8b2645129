use crate::model::GraphError;
use annomap_client::ApiError;
use thiserror::Error;

/// Everything that can stop a report from being built.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Could not build the mind map: {0}")]
    Graph(#[from] GraphError),

    #[error("Could not read settings: {0}")]
    Settings(#[from] rusqlite::Error),
}

impl ReportError {
    pub fn missing_token() -> Self {
        ReportError::MissingConfiguration(
            "no API token saved, run `annomap config set-token <TOKEN>`".to_string(),
        )
    }

    pub fn missing_reference() -> Self {
        ReportError::MissingConfiguration(
            "no reference selected, pass --reference or run `annomap locate <URL>`".to_string(),
        )
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
