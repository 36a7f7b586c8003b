use crate::core::get_config_dir;
use crate::core::queue::{BackpressurePolicy, JobQueue};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Debug, Default, Clone)]
pub struct Config {
    #[serde(default)]
    pub queue: QueueConfig,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct QueueConfig {
    /// Maximum number of queued jobs (absent = unbounded)
    #[serde(default)]
    pub capacity: Option<usize>,
    /// What `push` does when a bounded queue is full (default: block)
    #[serde(default)]
    pub backpressure: BackpressurePolicy,
}

impl QueueConfig {
    pub fn build_queue(&self) -> JobQueue {
        match self.capacity {
            Some(capacity) => JobQueue::bounded(capacity, self.backpressure),
            None => JobQueue::new(),
        }
    }
}

pub fn load_config(config_path: Option<&PathBuf>) -> Result<Config, config::ConfigError> {
    let mut config_vec = vec![];

    // User-provided config file
    if let Some(config_path) = config_path {
        if config_path.exists() {
            config_vec.push(config_path.clone());
        } else {
            eprintln!("Warning: Config file {config_path:?} not found.");
        }
    }

    // Default config file
    if let Ok(default_config_path) = get_config_dir().map(|d| d.join("fitq.toml")) {
        if default_config_path.exists() {
            config_vec.push(default_config_path);
        }
    }

    let settings = config::Config::builder();
    let settings = config_vec.iter().fold(settings, |s, path| {
        s.add_source(config::File::from(path.as_path()))
    });

    settings
        .add_source(
            config::Environment::with_prefix("FITQ")
                .separator("_")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
