//! Product type catalog (`/api/tipos-produto`).
//!
//! The inventory API speaks Portuguese on the wire; serde renames keep the
//! Rust side in English.

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

/// Payload for creating or updating a product type.
#[derive(Debug, Clone, Serialize)]
pub struct ProductTypeDraft {
    #[serde(rename = "nome")]
    pub name: String,
}

impl ApiClient {
    /// `GET /api/tipos-produto`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn list_product_types(&self) -> Result<Vec<ProductType>, ApiError> {
        self.get("/api/tipos-produto").await
    }

    /// `GET /api/tipos-produto/{id}`
    ///
    /// # Errors
    /// `ApiError::Status` with 404 when the type does not exist.
    pub async fn get_product_type(&self, id: i64) -> Result<ProductType, ApiError> {
        self.get(&format!("/api/tipos-produto/{id}")).await
    }

    /// `POST /api/tipos-produto`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn create_product_type(
        &self,
        draft: &ProductTypeDraft,
    ) -> Result<ProductType, ApiError> {
        self.post("/api/tipos-produto", draft).await
    }

    /// `PUT /api/tipos-produto/{id}`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn update_product_type(
        &self,
        id: i64,
        draft: &ProductTypeDraft,
    ) -> Result<ProductType, ApiError> {
        self.put(&format!("/api/tipos-produto/{id}"), draft).await
    }

    /// `DELETE /api/tipos-produto/{id}`
    ///
    /// # Errors
    /// `ApiError::Status` when the type is in use or missing.
    pub async fn delete_product_type(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/tipos-produto/{id}")).await
    }
}
