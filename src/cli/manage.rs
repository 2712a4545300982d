use anyhow::{Context, Result};
use clap::Subcommand;
use podprobe::PodmanAdapter;
use std::process::ExitCode;
use tracing::info;

#[derive(Subcommand)]
pub enum ManageCommand {
    /// Pull an image
    Pull { image: String },
    /// Remove a container
    Rm {
        name: String,
        /// Remove even if running
        #[arg(long, short)]
        force: bool,
    },
    /// Remove an image
    Rmi {
        image: String,
        /// Remove even if in use
        #[arg(long, short)]
        force: bool,
    },
}

pub fn run(command: ManageCommand, adapter: &PodmanAdapter) -> Result<ExitCode> {
    match command {
        ManageCommand::Pull { image } => {
            info!("pulling {image}");
            adapter
                .pull(&image)
                .with_context(|| format!("pulling image {image}"))?;
        }
        ManageCommand::Rm { name, force } => {
            adapter
                .remove_container(&name, force)
                .with_context(|| format!("removing container {name}"))?;
            println!("{name}");
        }
        ManageCommand::Rmi { image, force } => {
            adapter
                .remove_image(&image, force)
                .with_context(|| format!("removing image {image}"))?;
            println!("{image}");
        }
    }

    Ok(ExitCode::SUCCESS)
}
