//! Error taxonomy for podman queries.
//!
//! Display strings are fixed so callers can match on them; diagnostic detail
//! (argument lists, stderr, io errors) is carried in fields and logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PodmanError {
    /// `podman container exists` (or `rm`) reported no such container.
    #[error("failed to find container {name}")]
    NotFound { name: String },

    /// `podman image exists` (or `rmi`) reported no such image.
    #[error("failed to find image {name}")]
    ImageNotFound { name: String },

    #[error("container {name} is running")]
    ContainerRunning { name: String },

    #[error("image {name} has dependent children")]
    ImageInUse { name: String },

    /// The process could not be spawned or exited with an unexpected status.
    #[error("failed to invoke podman(1)")]
    Invocation {
        /// Arguments passed to the executable.
        args: Vec<String>,
        /// Captured stderr, or the spawn error.
        stderr: String,
    },

    /// Output from podman did not have the expected shape.
    #[error("failed to parse {what}: {message}")]
    Parse { what: &'static str, message: String },
}

impl PodmanError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ImageNotFound { .. })
    }

    pub(crate) fn parse(what: &'static str, message: impl ToString) -> Self {
        Self::Parse {
            what,
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PodmanError>;
