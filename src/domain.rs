mod container;
mod log_level;
pub mod traits;
pub mod version;

pub use container::{ContainerRecord, ImageRecord, TOOLBOX_LABELS};
pub use log_level::LogLevel;
pub use traits::{CommandOutput, CommandRunner};
pub use version::{MINIMUM_SUPPORTED_VERSION, Version};
