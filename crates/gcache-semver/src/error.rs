//! Error type for the hard-failing parts of the API

use thiserror::Error;

use crate::grammar::{MAX_LENGTH, MAX_SAFE_INTEGER};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SemverError {
    #[error("version is longer than {} characters", MAX_LENGTH)]
    TooLong,
    #[error("Invalid Version: {0}")]
    InvalidVersion(String),
    #[error("Invalid {component} version: must be at most {}", MAX_SAFE_INTEGER)]
    ComponentTooLarge { component: &'static str },
    #[error("Invalid comparator: {0}")]
    InvalidComparator(String),
    #[error("Invalid SemVer Range: {0}")]
    InvalidRange(String),
    #[error("invalid increment argument: {0}")]
    InvalidRelease(String),
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("invalid increment argument: identifier is empty")]
    EmptyIdentifier,
    #[error("invalid increment argument: identifier already exists")]
    DuplicateIdentifier,
    #[error("version {0} is not a prerelease")]
    NotAPrerelease(String),
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),
    #[error("Must provide a hilo val of \"<\" or \">\"")]
    InvalidHilo,
}
