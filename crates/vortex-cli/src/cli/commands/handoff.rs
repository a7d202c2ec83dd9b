//! Session handoff handlers.

use anyhow::{Context, Result};
use vortex_core::auth::{handoff, SessionManager};
use vortex_core::config::Config;

pub fn export(config: &Config, target: &str) -> Result<()> {
    let manager = SessionManager::new(config)?;
    let session = manager
        .store()
        .read()?
        .context("no stored session to export; sign in first")?;

    println!("{}", handoff::outbound_url(target, &session)?);
    Ok(())
}

pub fn import(config: &Config, url: &str) -> Result<()> {
    let manager = SessionManager::new(config)?;
    match handoff::absorb(url, &manager)? {
        Some(cleaned) => {
            let user = manager
                .current_user()
                .ok_or_else(|| anyhow::anyhow!("absorbed session without a user"))?;
            println!("Signed in as {} <{}>", user.username, user.email);
            println!("Continue at {cleaned}");
            Ok(())
        }
        None => anyhow::bail!("URL carries no session payload"),
    }
}
