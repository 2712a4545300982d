pub mod config;
pub mod output;
pub mod podman_adapter;
pub mod process_runner;

pub use podman_adapter::PodmanAdapter;
pub use process_runner::ProcessRunner;
