use thiserror::Error;

/// Failures while producing the HTML page or the PNG snapshot
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to serialize map data: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Nothing to render: {0}")]
    Empty(String),
}
