use thiserror::Error;

/// Failure taxonomy for the library. Tauri commands convert these to their
/// display strings at the boundary; nothing is retried and nothing is fatal.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No file selected.")]
    NoFileSelected,

    #[error("Could not import: {0}")]
    Import(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No inventory loaded. Upload a spreadsheet first.")]
    EmptyInventory,

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
