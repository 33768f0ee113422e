//! Catalog repository: reference lookups for salons, professionals,
//! clients and services

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Client, Professional, Service},
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: Pool<Postgres>,
}

impl CatalogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Service lookup scoped to the salon
    pub async fn get_service(&self, salon_id: Uuid, id: Uuid) -> AppResult<Service> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1 AND salon_id = $2")
            .bind(id)
            .bind(salon_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    /// Professional lookup scoped to the salon
    pub async fn get_professional(&self, salon_id: Uuid, id: Uuid) -> AppResult<Professional> {
        sqlx::query_as::<_, Professional>(
            "SELECT * FROM professionals WHERE id = $1 AND salon_id = $2",
        )
        .bind(id)
        .bind(salon_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Professional {} not found", id)))
    }

    /// Active professionals of a salon, in stable order for the
    /// next-availability scan
    pub async fn list_active_professionals(&self, salon_id: Uuid) -> AppResult<Vec<Professional>> {
        let rows = sqlx::query_as::<_, Professional>(
            "SELECT * FROM professionals WHERE salon_id = $1 AND active ORDER BY name, id",
        )
        .bind(salon_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Client lookup scoped to the salon
    pub async fn get_client(&self, salon_id: Uuid, id: Uuid) -> AppResult<Client> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1 AND salon_id = $2")
            .bind(id)
            .bind(salon_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
    }
}
