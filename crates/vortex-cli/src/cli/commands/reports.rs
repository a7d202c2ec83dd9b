//! Report command handlers.

use anyhow::Result;
use vortex_core::config::Config;

use super::authenticated_client;

pub async fn products_by_type(config: &Config, product_type_id: i64) -> Result<()> {
    let client = authenticated_client(config, "/reports").await?;
    let rows = client.products_by_type(product_type_id).await?;

    for row in rows {
        println!(
            "{}\t{}\tstock {}\texits {}",
            row.id, row.description, row.quantity_in_stock, row.total_exits
        );
    }
    Ok(())
}

pub async fn profit_by_product(config: &Config) -> Result<()> {
    let client = authenticated_client(config, "/reports").await?;
    let rows = client.profit_by_product().await?;

    for row in rows {
        println!(
            "{}\t{}\tsold {}\tprofit {:.2}",
            row.id, row.description, row.units_sold, row.total_profit
        );
    }
    Ok(())
}
