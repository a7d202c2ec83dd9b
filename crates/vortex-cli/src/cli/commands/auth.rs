//! Session command handlers.

use anyhow::Result;
use vortex_core::api::auth::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest,
};
use vortex_core::auth::{AuthState, SessionManager};
use vortex_core::config::Config;

pub async fn login(
    config: &Config,
    identifier: String,
    password: String,
    remember: bool,
) -> Result<()> {
    let manager = SessionManager::new(config)?;
    let session = manager
        .login(&LoginRequest {
            identifier,
            password,
            remember_me: remember.then_some(true),
        })
        .await?;

    println!("Signed in as {} <{}>", session.user.username, session.user.email);
    if let Some(url) = manager.store().take_return_url() {
        println!("Return to {url}");
    }
    Ok(())
}

pub async fn register(
    config: &Config,
    email: String,
    username: String,
    password: String,
) -> Result<()> {
    let manager = SessionManager::new(config)?;
    let session = manager
        .register(&RegisterRequest {
            email,
            username,
            confirm_password: password.clone(),
            password,
        })
        .await?;

    println!("Account created. Signed in as {}", session.user.username);
    Ok(())
}

pub async fn logout(config: &Config) -> Result<()> {
    let manager = SessionManager::new(config)?;
    manager.initialize().await?;
    let url = manager.logout().await?;
    println!("Signed out. Sign in again at {url}");
    Ok(())
}

pub async fn status(config: &Config) -> Result<()> {
    let manager = SessionManager::new(config)?;
    manager.initialize().await?;

    match manager.auth_state() {
        AuthState::Authenticated => {
            let user = manager
                .current_user()
                .ok_or_else(|| anyhow::anyhow!("authenticated without a user"))?;
            println!("Signed in as {} <{}>", user.username, user.email);
            if !user.roles.is_empty() {
                println!("Roles: {}", user.roles.join(", "));
            }
        }
        _ => println!("Not signed in"),
    }
    Ok(())
}

pub async fn forgot_password(config: &Config, email: String) -> Result<()> {
    let manager = SessionManager::new(config)?;
    manager.forgot_password(&ForgotPasswordRequest { email }).await?;
    println!("Recovery email sent (if the address is registered)");
    Ok(())
}

pub async fn reset_password(config: &Config, token: String, password: String) -> Result<()> {
    let manager = SessionManager::new(config)?;
    manager
        .reset_password(&ResetPasswordRequest {
            token,
            confirm_password: password.clone(),
            password,
        })
        .await?;
    println!("Password updated. Sign in with the new password.");
    Ok(())
}
