use thiserror::Error;

#[derive(Error, Debug)]
pub enum BibError {
    #[error("Failed to parse BibTeX: {0}")]
    ParseFailed(String),
}
