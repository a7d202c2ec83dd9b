//! Command handlers.

pub mod auth;
pub mod config;
pub mod handoff;
pub mod movements;
pub mod product_types;
pub mod products;
pub mod reports;

use anyhow::Result;
use vortex_core::api::ApiClient;
use vortex_core::auth::guard::{self, GuardDecision, Route};
use vortex_core::auth::SessionManager;
use vortex_core::config::Config;

/// Runs the access guard for a protected command and hands back an
/// authenticated client, or fails with the sign-in URL.
pub(crate) async fn authenticated_client(
    config: &Config,
    route_path: &str,
) -> Result<ApiClient> {
    let manager = SessionManager::new(config)?;
    match guard::before_each(&Route::protected(route_path), &manager).await? {
        GuardDecision::Proceed => Ok(ApiClient::new(config, manager)?),
        GuardDecision::Redirect(url) => anyhow::bail!(
            "Not signed in. Run 'vortex login <identifier> -p <password>' or sign in at {url} \
             and import the session with 'vortex handoff import <url>'"
        ),
    }
}

/// Prints a value as pretty JSON.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
