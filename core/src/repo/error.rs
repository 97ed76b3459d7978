use std::path::PathBuf;

use thiserror::Error;

use crate::object::{Id, Kind, ParseIdError};

/// Describes the potential error conditions that might arise from `Repo` operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    ParseIdError(#[from] ParseIdError),

    #[error("work dir doesn't exist `{}`", .0.display())]
    WorkDirDoesntExist(PathBuf),

    #[error("git dir doesn't exist `{}`", .0.display())]
    GitDirDoesntExist(PathBuf),

    #[error("git dir shouldn't exist `{}`", .0.display())]
    GitDirShouldntExist(PathBuf),

    #[error("invalid ref name `{0}`")]
    InvalidRefName(String),

    #[error("corrupt ref `{name}`: {reason}")]
    CorruptRef { name: String, reason: String },

    #[error("corrupt {kind} {id}")]
    CorruptObject { kind: Kind, id: Id },

    /// A peer declared an ID that does not match the object's content.
    #[error("{kind} declared as {declared} hashes to {computed}")]
    IdMismatch {
        kind: Kind,
        declared: Id,
        computed: Id,
    },

    #[error(transparent)]
    OtherError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// A specialized `Result` type for `Repo` operations.
pub type Result<T> = std::result::Result<T, Error>;
