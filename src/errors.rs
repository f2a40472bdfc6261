//! Error types for the audit and upgrade entry points
//!
//! Only invalid inputs are fatal. Parse failures inside a project tree are
//! recovered locally (a malformed config file reads as "absent"), and
//! per-step migration failures are collected on the `UpgradeResult` rather
//! than raised.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by `audit_project` for invalid inputs
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors rejected at `ProjectConfig` construction
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "Invalid project name '{0}'. Names must start with a letter and contain \
         only letters, numbers, hyphens, and underscores."
    )]
    InvalidName(String),

    #[error("'{0}' is a Python reserved word and cannot be used as a project name.")]
    ReservedName(String),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("{feature} is not applicable for single-file scripts.")]
    FeatureNotApplicable { feature: &'static str },
}
