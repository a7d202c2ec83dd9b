//! Product type command handlers.

use anyhow::Result;
use vortex_core::api::product_types::ProductTypeDraft;
use vortex_core::config::Config;

use super::{authenticated_client, print_json};

pub async fn list(config: &Config) -> Result<()> {
    let client = authenticated_client(config, "/product-types").await?;
    print_json(&client.list_product_types().await?)
}

pub async fn show(config: &Config, id: i64) -> Result<()> {
    let client = authenticated_client(config, "/product-types").await?;
    print_json(&client.get_product_type(id).await?)
}

pub async fn create(config: &Config, name: String) -> Result<()> {
    let client = authenticated_client(config, "/product-types").await?;
    print_json(&client.create_product_type(&ProductTypeDraft { name }).await?)
}

pub async fn update(config: &Config, id: i64, name: String) -> Result<()> {
    let client = authenticated_client(config, "/product-types").await?;
    print_json(
        &client
            .update_product_type(id, &ProductTypeDraft { name })
            .await?,
    )
}

pub async fn delete(config: &Config, id: i64) -> Result<()> {
    let client = authenticated_client(config, "/product-types").await?;
    client.delete_product_type(id).await?;
    println!("Deleted product type {id}");
    Ok(())
}
