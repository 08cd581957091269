use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarlogError {
    #[error("Frame store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, StarlogError>;
