//! Inventory reports (`/api/relatorios`).

use serde::Deserialize;

use super::{ApiClient, ApiError};

/// Row of the products-by-type report.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductsByTypeRow {
    pub id: i64,
    #[serde(rename = "descricao")]
    pub description: String,
    /// Total units that left stock
    #[serde(rename = "totalSaidas")]
    pub total_exits: i64,
    #[serde(rename = "quantidadeEmEstoque")]
    pub quantity_in_stock: i64,
}

/// Row of the profit-by-product report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfitByProductRow {
    pub id: i64,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "totalUnidadesVendidas")]
    pub units_sold: i64,
    #[serde(rename = "lucroTotal")]
    pub total_profit: f64,
}

impl ApiClient {
    /// `GET /api/relatorios/produtos-por-tipo?tipoProdutoId={id}`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn products_by_type(
        &self,
        product_type_id: i64,
    ) -> Result<Vec<ProductsByTypeRow>, ApiError> {
        self.get(&format!(
            "/api/relatorios/produtos-por-tipo?tipoProdutoId={product_type_id}"
        ))
        .await
    }

    /// `GET /api/relatorios/lucro-por-produto`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn profit_by_product(&self) -> Result<Vec<ProfitByProductRow>, ApiError> {
        self.get("/api/relatorios/lucro-por-produto").await
    }
}
