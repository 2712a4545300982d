use anyhow::{Context, Result};
use clap::Subcommand;
use podprobe::{ContainerRecord, ImageRecord, PodmanAdapter, PodmanError};
use std::process::ExitCode;
use tracing::info;

#[derive(Subcommand)]
pub enum QueryCommand {
    /// Print the installed podman version
    Version,
    /// Exit with status 0 when podman is supported and at least REQUIRED
    CheckVersion { required: String },
    /// Exit with status 0 when the container exists
    Exists { name: String },
    /// Exit with status 0 when the image exists
    ImageExists { image: String },
    /// List containers
    Ps {
        /// Include stopped containers
        #[arg(long)]
        all: bool,
        /// Only containers created by toolbox (implies --all)
        #[arg(long, conflicts_with_all = ["all", "extra"])]
        toolbox: bool,
        /// Extra arguments passed to `podman ps` verbatim
        #[arg(last = true)]
        extra: Vec<String>,
    },
    /// List images
    Images {
        /// Include intermediate images
        #[arg(long)]
        all: bool,
        /// Only images created for toolbox
        #[arg(long, conflicts_with = "all")]
        toolbox: bool,
    },
}

pub fn run(command: QueryCommand, adapter: &PodmanAdapter) -> Result<ExitCode> {
    match command {
        QueryCommand::Version => {
            let version = adapter.get_version().context("querying podman version")?;
            println!("{version}");
            Ok(ExitCode::SUCCESS)
        }
        QueryCommand::CheckVersion { required } => {
            if adapter.check_version(&required) {
                info!("podman satisfies {required}");
                Ok(ExitCode::SUCCESS)
            } else {
                eprintln!("podman does not satisfy required version {required}");
                Ok(ExitCode::FAILURE)
            }
        }
        QueryCommand::Exists { name } => exit_for(adapter.container_exists(&name)),
        QueryCommand::ImageExists { image } => exit_for(adapter.image_exists(&image)),
        QueryCommand::Ps {
            all,
            toolbox,
            mut extra,
        } => {
            let containers = if toolbox {
                adapter.get_toolbox_containers()?
            } else {
                if all {
                    extra.insert(0, "--all".into());
                }
                adapter.get_containers(extra.as_slice())?
            };
            print_containers(&containers);
            Ok(ExitCode::SUCCESS)
        }
        QueryCommand::Images { all, toolbox } => {
            let images = if toolbox {
                adapter.get_toolbox_images()?
            } else if all {
                adapter.get_images(&["--all"])?
            } else {
                adapter.get_images::<&str>(&[])?
            };
            print_images(&images);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_for(result: podprobe::Result<bool>) -> Result<ExitCode> {
    Ok(if found(result)? {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Absence is a normal answer here; any other failure is passed on.
fn found(result: podprobe::Result<bool>) -> Result<bool> {
    match result {
        Ok(exists) => Ok(exists),
        Err(e @ (PodmanError::NotFound { .. } | PodmanError::ImageNotFound { .. })) => {
            eprintln!("{e}");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_containers(containers: &[ContainerRecord]) {
    println!("{:<14} {:<30} {:<10} IMAGE", "ID", "NAME", "STATE");
    for c in containers {
        println!(
            "{:<14} {:<30} {:<10} {}",
            short_id(&c.id),
            c.name().unwrap_or("<none>"),
            c.state,
            c.image
        );
    }
}

fn print_images(images: &[ImageRecord]) {
    println!("{:<14} {:<50} SIZE", "ID", "NAME");
    for image in images {
        let name = image.names.first().map(String::as_str).unwrap_or("<none>");
        let size = image.size.map(|s| s.to_string()).unwrap_or_default();
        println!("{:<14} {:<50} {}", short_id(&image.id), name, size);
    }
}

fn short_id(id: &str) -> &str {
    let id = id.strip_prefix("sha256:").unwrap_or(id);
    id.get(..12).unwrap_or(id)
}
