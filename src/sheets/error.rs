use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Sheet endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid sheet payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}
