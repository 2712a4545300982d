pub mod domain;
pub mod error;
pub mod infra;

// Make test_support available for integration tests
pub mod test_support;

pub use domain::{CommandOutput, CommandRunner, ContainerRecord, ImageRecord, LogLevel, Version};
pub use error::{PodmanError, Result};
pub use infra::{PodmanAdapter, ProcessRunner};
