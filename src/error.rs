use std::path::PathBuf;

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error when a file that must exist cannot be read
    #[error("failed to read '{}': {source}", .path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Error during JSON serialization or deserialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Error when a git config file is missing
    #[error("git config not found: '{}'", .0.display())]
    ConfigRead(PathBuf),
    /// Error when a git config file cannot be parsed
    #[error("failed to parse git config '{}': {}", .path.display(), .source.message())]
    ConfigParse {
        path: PathBuf,
        source: git2::Error,
    },
    /// Error when a remote, or its private key path, is not configured
    #[error("remote '{0}' has no gtPrivateKeyPath configured")]
    MissingRemote(String),
    /// Error when a required config key is not set
    #[error("git config key '{0}' is not set")]
    MissingKey(String),
    /// Error when `git config` fails to write a key
    #[error("failed to set git config '{key}': {message}")]
    ConfigWrite { key: String, message: String },
    /// Error when a wrapped command cannot be spawned or exits non-zero
    #[error("command failed: {0}")]
    Subprocess(String),
    /// Error when the target directory is not a Git repository
    #[error("not in git repository: '{}'", .0.display())]
    NotInGitRepository(PathBuf),
    /// Error when user input fails.
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error during input validation.
    #[error("validation error: {0}")]
    Validation(String),
    /// Error when specific profile id is not found.
    #[error("profile not found: '{0}'")]
    UserNotFound(String),
    /// Error when a profile id is already stored.
    #[error("profile already exists: '{0}'")]
    DuplicateProfile(String),
    /// Error when the home directory cannot be determined
    #[error("failed to find the home directory")]
    HomeDirNotFound,
    /// Error during UTF-8 conversion.
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
}
