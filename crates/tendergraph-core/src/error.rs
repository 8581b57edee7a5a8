use thiserror::Error;

#[derive(Error, Debug)]
pub enum TenderGraphError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Tender not found: {0}")]
    TenderNotFound(String),

    #[error("Company not found: {0}")]
    CompanyNotFound(String),
}

pub type Result<T> = std::result::Result<T, TenderGraphError>;
