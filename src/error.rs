#![allow(non_shorthand_field_patterns)]
#![doc = "Fatal error conditions of a clir run."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! `non_shorthand_field_patterns` is silenced because the [`masterror::Error`]
//! derive writes `field: field` patterns in its generated `Display` code.
//!
//! Only conditions that end a run are represented here. Problems limited to
//! one repository or one commit are logged by the pipeline and swallowed.

use std::path::{Path, PathBuf};

/// Everything that can stop a run before both artifacts are written.
///
/// Messages never include the forge credential.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// A requirement that must hold before any network call is missing.
    #[error("precondition failed: {message}")]
    Precondition {
        /// What is missing.
        message: String
    },
    /// The accessible repositories could not be listed.
    #[error("repository discovery failed: {message}")]
    Discovery {
        /// Why listing failed.
        message: String
    },
    /// The run configuration file could not be read.
    #[error("cannot read run configuration {path:?}: {source}")]
    Io {
        /// Configuration file path.
        path:   PathBuf,
        /// Operating system error.
        source: std::io::Error
    },
    /// The run configuration is not a valid YAML document.
    #[error("malformed run configuration: {source}")]
    Parse {
        /// YAML decoder error.
        source: serde_yaml::Error
    },
    /// A configuration value is outside its allowed range.
    #[error("invalid run configuration: {message}")]
    Validation {
        /// Which value is wrong and why.
        message: String
    },
    /// The statistics record could not be encoded as JSON.
    #[error("cannot encode statistics record: {source}")]
    Serialize {
        /// JSON encoder error.
        source: serde_json::Error
    },
    /// An output directory or artifact file could not be written.
    #[error("cannot write artifact {path:?}: {source}")]
    ArtifactIo {
        /// Directory or file that failed.
        path:   PathBuf,
        /// Operating system error.
        source: std::io::Error
    },
    /// The forge client failed outside of discovery.
    #[error("forge request failed: {message}")]
    Service {
        /// Description reported by the forge client.
        message: String
    }
}

impl Error {
    /// Builds an [`Error::Precondition`].
    ///
    /// # Parameters
    ///
    /// * `message` - Description of the unmet requirement.
    pub fn precondition<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Precondition {
            message: message.into()
        }
    }

    /// Builds an [`Error::Discovery`].
    ///
    /// # Parameters
    ///
    /// * `message` - Description of the listing failure.
    pub fn discovery<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Discovery {
            message: message.into()
        }
    }

    /// Builds an [`Error::Validation`].
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Builds an [`Error::Service`].
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Message printed by the binary before exiting with status 1.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<masterror::AppError> for Error {
    fn from(failure: masterror::AppError) -> Self {
        Self::Service {
            message: failure.to_string()
        }
    }
}

/// Wraps a failed configuration read into [`Error::Io`].
///
/// # Parameters
///
/// * `path` - Configuration file that could not be read.
/// * `source` - Operating system error.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Wraps a failed artifact write into [`Error::ArtifactIo`].
pub fn artifact_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ArtifactIo {
        path: path.to_path_buf(),
        source
    }
}
