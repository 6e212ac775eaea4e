//! Settings file commands.

use anyhow::Context;

use crate::config;

/// Print the effective configuration as TOML.
pub fn cmd_config_show() -> anyhow::Result<()> {
    let config = config::load();
    match config::config_path() {
        Some(path) if path.exists() => println!("# {}", path.display()),
        Some(path) => println!("# {} (not created yet, showing defaults)", path.display()),
        None => println!("# no config directory, showing defaults"),
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

/// Change one `[lyrics]` switch and save.
pub fn cmd_config_set(key: &str, value: bool) -> anyhow::Result<()> {
    let mut config = config::load();
    config.lyrics.set(key, value)?;
    let path = config::save(&config).context("Failed to save settings")?;
    println!("{} = {} ({})", key, value, path.display());
    Ok(())
}

pub fn cmd_config_path() -> anyhow::Result<()> {
    let path = config::config_path().context("Could not determine config directory")?;
    println!("{}", path.display());
    Ok(())
}
