#![allow(non_shorthand_field_patterns)]
#![doc = "Error taxonomy shared by the fetchers, the batch loader and the CLI."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.
//!
//! The first five variants form the fetch taxonomy surfaced to callers of
//! [`fetch_stats`](crate::fetch_stats) and
//! [`fetch_top_languages`](crate::fetch_top_languages). The remaining variants
//! cover decoding and the batch configuration loader.

use std::path::{Path, PathBuf};

/// Unified error type returned by the fetchers, the batch loader and the CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// A required input was absent. Raised before any network call.
    #[error("missing required parameter: {parameter}")]
    MissingParameter {
        /// Name of the absent parameter.
        parameter: String
    },
    /// The upstream API reported that the requested account does not exist.
    #[error("{message}")]
    UserNotFound {
        /// Upstream message, or a default when the API supplied none.
        message: String
    },
    /// The upstream API reported a descriptive error without a recognized
    /// type. The message is already wrapped for display.
    #[error("{message}")]
    UpstreamMessage {
        /// Wrapped upstream message.
        message: String
    },
    /// The upstream API failed without an actionable message.
    #[error("{message}")]
    GraphQlUnspecified {
        /// Generic description of the failed operation.
        message: String
    },
    /// Network or HTTP layer failure reported by the query executor.
    #[error("transport failure: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String
    },
    /// The API answered with a payload that does not match the expected shape.
    #[error("failed to decode GraphQL response: {source}")]
    Decode {
        /// Underlying decoding error.
        source: serde_json::Error
    },
    /// Wraps I/O errors that occur while reading batch request files.
    #[error("failed to read batch requests from {path:?}: {source}")]
    Io {
        /// Location of the request file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse batch requests: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when a batch request violates invariants.
    #[error("invalid request: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing results.
    #[error("failed to serialize results: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    }
}

impl Error {
    /// Constructs a missing-parameter error for the named input.
    pub fn missing_parameter<P>(parameter: P) -> Self
    where
        P: Into<String>
    {
        Self::MissingParameter {
            parameter: parameter.into()
        }
    }

    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a transport error from the provided displayable value.
    pub fn transport<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Transport {
            message: message.into()
        }
    }

    /// Wraps a decoding failure of an upstream payload.
    pub fn decode(source: serde_json::Error) -> Self {
        Self::Decode {
            source
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation.
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
    fn from(error: masterror::AppError) -> Self {
        Self::Transport {
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the request file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}
