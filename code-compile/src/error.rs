use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Invalid command line: {0}")]
    InvalidCommand(String),

    #[error("Work directory does not exist: {}", .0.display())]
    WorkDirMissing(PathBuf),

    #[error("Failed to write source file {}: {source}", path.display())]
    SourceWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An operation was called in the wrong lifecycle state. Always a caller bug.
    #[error("Provider misuse: {0}")]
    Misuse(&'static str),

    #[error("System error: {0}")]
    System(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
