//! Release metadata from the pypi json api: which versions exist, and where the source
//! distribution for each of them lives.

pub use index::{pip_data, DEFAULT_INDEX_URL};
pub use metadata::{Digests, PackageType, PipData, PypiProject, PypiRelease};
use std::io;
use thiserror::Error;

mod index;
mod metadata;

/// Exit code when the index couldn't be reached or doesn't know the package
pub const EXIT_RETRIEVAL_FAILURE: i32 = 7;
/// Exit code when the package exists but the requested version has no source metadata
pub const EXIT_NO_VERSION_INFO: i32 = 15;

#[derive(Error, Debug)]
pub enum Error {
    /// Http error status or connection failure
    #[error("Failed to retrieve information for {name}")]
    Retrieval {
        name: String,
        #[source]
        source: Box<ureq::Error>,
    },
    #[error("No version information for {name} {version}")]
    NoVersionInfo { name: String, version: String },
    /// The index answered, but not with the json we expected
    #[error("Invalid api response for {name}")]
    InvalidResponse {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid distribution name: {0:?}")]
    InvalidName(String),
}

impl Error {
    /// The process exit code for this failure class
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Retrieval { .. } => EXIT_RETRIEVAL_FAILURE,
            Error::NoVersionInfo { .. } => EXIT_NO_VERSION_INFO,
            Error::InvalidResponse { .. } => 1,
            // Same as clap for bad arguments
            Error::InvalidName(_) => 2,
        }
    }
}
