//! Stock movements (`/api/movimentos`).

use serde::{Deserialize, Serialize};

use super::{ApiClient, ApiError};

/// Movement direction. Entries increase stock, exits decrease it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "ENTRADA")]
    Entry,
    #[serde(rename = "SAIDA")]
    Exit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: i64,
    /// Server-assigned timestamp (ISO 8601, no zone)
    #[serde(rename = "dataMovimento")]
    pub moved_at: String,
    #[serde(rename = "tipoMovimentacao")]
    pub kind: MovementKind,
    #[serde(rename = "quantidadeMovimentada")]
    pub quantity: i64,
    /// Unit sale value; set by the server for exits, absent for entries
    #[serde(rename = "valorVenda")]
    pub sale_value: Option<f64>,
    #[serde(rename = "produtoId")]
    pub product_id: i64,
}

/// Payload for registering a movement. Timestamp and sale value are
/// server-assigned.
#[derive(Debug, Clone, Serialize)]
pub struct MovementDraft {
    #[serde(rename = "tipoMovimentacao")]
    pub kind: MovementKind,
    #[serde(rename = "quantidadeMovimentada")]
    pub quantity: i64,
    #[serde(rename = "produtoId")]
    pub product_id: i64,
}

impl ApiClient {
    /// `GET /api/movimentos`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn list_movements(&self) -> Result<Vec<StockMovement>, ApiError> {
        self.get("/api/movimentos").await
    }

    /// `GET /api/movimentos/{id}`
    ///
    /// # Errors
    /// `ApiError::Status` with 404 when the movement does not exist.
    pub async fn get_movement(&self, id: i64) -> Result<StockMovement, ApiError> {
        self.get(&format!("/api/movimentos/{id}")).await
    }

    /// `POST /api/movimentos`
    ///
    /// # Errors
    /// `ApiError::Status` with 400 for exits exceeding the stock on hand.
    pub async fn create_movement(&self, draft: &MovementDraft) -> Result<StockMovement, ApiError> {
        self.post("/api/movimentos", draft).await
    }

    /// `PUT /api/movimentos/{id}`
    ///
    /// # Errors
    /// `ApiError::Status` with 400 when the change would drive stock negative.
    pub async fn update_movement(
        &self,
        id: i64,
        draft: &MovementDraft,
    ) -> Result<StockMovement, ApiError> {
        self.put(&format!("/api/movimentos/{id}"), draft).await
    }

    /// `DELETE /api/movimentos/{id}`
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn delete_movement(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/api/movimentos/{id}")).await
    }
}
