use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use story_core::{PlayerConfig, SystemConfig};

#[derive(Serialize, Default)]
struct FullConfig {
    system: SystemConfig,
    player: PlayerConfig,
}

pub fn default_config_toml() -> anyhow::Result<String> {
    toml::to_string_pretty(&FullConfig::default()).context("Failed to serialize default config")
}

pub fn ensure_config_exists(path: &str) -> anyhow::Result<()> {
    if Path::new(path).exists() {
        return Ok(());
    }

    println!("Creating default configuration at '{}'...", path);
    let toml_str = default_config_toml()?;

    if let Err(e) = fs::write(path, toml_str) {
        eprintln!("Failed to write config file: {}", e);
    } else {
        println!("Config file created successfully.");
    }
    Ok(())
}
