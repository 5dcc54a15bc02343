use std::path::PathBuf;

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, InstallerError>;

/// Error type for `modloader-installer`.
#[derive(thiserror::Error, Debug)]
pub enum InstallerError {
    /// A required section (e.g. `Apps`, `CompatToolMapping`) is missing from the document.
    #[error("required section \"{section}\" not found in document")]
    MissingSection {
        /// Name of the missing section.
        section: String,
    },

    /// The document is not structurally valid (unbalanced braces, truncated string).
    #[error("malformed document: {message}")]
    Malformed {
        /// Human-readable message.
        message: String,
    },

    /// The document could not be read.
    #[error("failed reading {path}: {source}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The pre-edit backup copy could not be written. The original is untouched.
    #[error("failed writing backup {path}: {source}")]
    Backup {
        /// Backup path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The patched document could not be written.
    #[error("failed writing {path}: {source}")]
    Write {
        /// File that failed to write.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// UTF-8 conversion failed.
    #[error("utf-8 conversion error")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Steam installation could not be detected.
    #[error("steam installation could not be detected")]
    SteamNotFound,

    /// No Steam library contains the requested app.
    #[error("app {app_id} is not installed in any steam library")]
    GameNotFound {
        /// Steam app id that was searched for.
        app_id: String,
    },

    /// Application identifiers are decimal numbers.
    #[error("invalid app id: {value:?}")]
    InvalidAppId {
        /// The rejected input.
        value: String,
    },

    /// Interactive input ended or could not be read.
    #[error("prompt failed: {message}")]
    Prompt {
        /// Human-readable message.
        message: String,
    },
}

impl InstallerError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}
