use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Roster has no header row")]
    MissingHeader,
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Font error: {0}")]
    Font(String),
    #[error(transparent)]
    Engine(#[from] nametag_engine::NametagError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
