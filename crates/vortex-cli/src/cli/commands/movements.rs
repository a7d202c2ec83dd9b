//! Stock movement command handlers.

use anyhow::Result;
use vortex_core::api::movements::{MovementDraft, MovementKind};
use vortex_core::config::Config;

use super::{authenticated_client, print_json};

pub async fn list(config: &Config) -> Result<()> {
    let client = authenticated_client(config, "/movements").await?;
    print_json(&client.list_movements().await?)
}

pub async fn show(config: &Config, id: i64) -> Result<()> {
    let client = authenticated_client(config, "/movements").await?;
    print_json(&client.get_movement(id).await?)
}

pub async fn entry(config: &Config, product_id: i64, quantity: i64) -> Result<()> {
    register(config, MovementKind::Entry, product_id, quantity).await
}

pub async fn exit(config: &Config, product_id: i64, quantity: i64) -> Result<()> {
    register(config, MovementKind::Exit, product_id, quantity).await
}

async fn register(
    config: &Config,
    kind: MovementKind,
    product_id: i64,
    quantity: i64,
) -> Result<()> {
    let client = authenticated_client(config, "/movements").await?;
    print_json(
        &client
            .create_movement(&MovementDraft {
                kind,
                quantity,
                product_id,
            })
            .await?,
    )
}

pub async fn update(
    config: &Config,
    id: i64,
    kind: &str,
    product_id: i64,
    quantity: i64,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let client = authenticated_client(config, "/movements").await?;
    print_json(
        &client
            .update_movement(
                id,
                &MovementDraft {
                    kind,
                    quantity,
                    product_id,
                },
            )
            .await?,
    )
}

fn parse_kind(kind: &str) -> Result<MovementKind> {
    match kind {
        "entry" => Ok(MovementKind::Entry),
        "exit" => Ok(MovementKind::Exit),
        other => anyhow::bail!("unknown movement kind '{other}' (entry or exit)"),
    }
}

pub async fn delete(config: &Config, id: i64) -> Result<()> {
    let client = authenticated_client(config, "/movements").await?;
    client.delete_movement(id).await?;
    println!("Deleted movement {id}");
    Ok(())
}
