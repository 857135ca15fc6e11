//! Error taxonomy shared by every container in the crate.

use core::fmt;
use thiserror::Error;

/// Returned by `Behavior::copy` when an element could not be duplicated.
///
/// Containers treat this as an allocation failure: the operation in flight
/// is rolled back and the error is handed to the caller unchanged.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Error)]
#[error("element copy failed")]
pub struct CopyError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error("key or value not found")]
    NotFound,
    #[error("key already present")]
    DuplicateKey,
    #[error("print failed: {0}")]
    Print(#[from] fmt::Error),
}

impl Error {
    /// `NotFound` is an expected outcome rather than a fault; callers that
    /// only care about faults can filter on this.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

pub type Result<T> = core::result::Result<T, Error>;
