pub mod dispatch;
pub mod job;
pub mod queue;
pub mod resource;
pub mod wire;

use std::path::PathBuf;

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Failed to get config directory"))
        .map(|p| p.join("fitq"))
}
