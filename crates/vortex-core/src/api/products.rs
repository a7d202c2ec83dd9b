//! Product catalog (`/api/produtos`).

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    #[serde(rename = "descricao")]
    pub description: String,
    /// Unit cost paid to the supplier
    #[serde(rename = "valorFornecedor")]
    pub supplier_value: f64,
    #[serde(rename = "quantidadeEmEstoque")]
    pub quantity_in_stock: i64,
    #[serde(rename = "tipoProdutoId")]
    pub product_type_id: i64,
}

/// Payload for creating or updating a product.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDraft {
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valorFornecedor")]
    pub supplier_value: f64,
    #[serde(rename = "quantidadeEmEstoque")]
    pub quantity_in_stock: i64,
    #[serde(rename = "tipoProdutoId")]
    pub product_type_id: i64,
}

impl ApiClient {
    /// `GET /api/produtos`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.get("/api/produtos").await
    }

    /// `GET /api/produtos/{id}`
    ///
    /// # Errors
    /// `ApiError::Status` with 404 when the product does not exist.
    pub async fn get_product(&self, id: i64) -> Result<Product, ApiError> {
        self.get(&format!("/api/produtos/{id}")).await
    }

    /// `POST /api/produtos`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.post("/api/produtos", draft).await
    }

    /// `PUT /api/produtos/{id}`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn update_product(&self, id: i64, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.put(&format!("/api/produtos/{id}"), draft).await
    }

    /// `DELETE /api/produtos/{id}`
    ///
    /// # Errors
    /// `ApiError::Status` when the product has movements or is missing.
    pub async fn delete_product(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/produtos/{id}")).await
    }
}
