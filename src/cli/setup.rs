use anyhow::Result;
use podprobe::infra::config::install_default_config;
use std::path::Path;
use tracing::info;

pub fn install(config_dir: &Path) -> Result<()> {
    info!("preparing config in {:?}", config_dir);

    let path = install_default_config(config_dir)?;
    println!("{}", path.display());

    Ok(())
}
