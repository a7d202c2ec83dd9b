//! Product command handlers.

use anyhow::Result;
use vortex_core::api::products::ProductDraft;
use vortex_core::config::Config;

use super::{authenticated_client, print_json};

pub async fn list(config: &Config) -> Result<()> {
    let client = authenticated_client(config, "/products").await?;
    print_json(&client.list_products().await?)
}

pub async fn show(config: &Config, id: i64) -> Result<()> {
    let client = authenticated_client(config, "/products").await?;
    print_json(&client.get_product(id).await?)
}

pub async fn create(
    config: &Config,
    description: String,
    supplier_value: f64,
    quantity_in_stock: i64,
    product_type_id: i64,
) -> Result<()> {
    let client = authenticated_client(config, "/products").await?;
    print_json(
        &client
            .create_product(&ProductDraft {
                description,
                supplier_value,
                quantity_in_stock,
                product_type_id,
            })
            .await?,
    )
}

pub async fn update(
    config: &Config,
    id: i64,
    description: String,
    supplier_value: f64,
    quantity_in_stock: i64,
    product_type_id: i64,
) -> Result<()> {
    let client = authenticated_client(config, "/products").await?;
    print_json(
        &client
            .update_product(
                id,
                &ProductDraft {
                    description,
                    supplier_value,
                    quantity_in_stock,
                    product_type_id,
                },
            )
            .await?,
    )
}

pub async fn delete(config: &Config, id: i64) -> Result<()> {
    let client = authenticated_client(config, "/products").await?;
    client.delete_product(id).await?;
    println!("Deleted product {id}");
    Ok(())
}
