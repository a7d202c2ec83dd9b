//! Config command handlers.

use anyhow::{Context, Result};
use vortex_core::config::{self, Config};
use vortex_core::theme::{ThemeController, ThemeMode};

pub fn path() -> Result<()> {
    println!("{}", config::paths::config_path().display());
    Ok(())
}

pub fn init() -> Result<()> {
    let config_path = config::paths::config_path();
    Config::init(&config_path)
        .with_context(|| format!("init config at {}", config_path.display()))?;
    println!("Created config at {}", config_path.display());
    Ok(())
}

pub fn theme(config: &Config, mode: Option<&str>) -> Result<()> {
    let mut controller = ThemeController::init(config);

    match mode {
        None => {
            controller.toggle();
        }
        Some("light") => controller.set(ThemeMode::Light),
        Some("dark") => controller.set(ThemeMode::Dark),
        Some(other) => anyhow::bail!("unknown theme '{other}' (light or dark)"),
    }

    let mode = controller.mode();
    controller.teardown().context("persist theme")?;
    println!("Theme: {mode}");
    Ok(())
}
