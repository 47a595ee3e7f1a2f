use async_trait::async_trait;
use chrono::{DateTime, Utc};
use labtrack_core::models::{NewShipment, Shipment, DELIVERED_STATUS};
use labtrack_core::AppError;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

/// Storage operations for shipments.
///
/// The ingestion workflow depends on this trait rather than on the concrete
/// repository so it can be exercised with an in-memory store in tests.
#[async_trait]
pub trait ShipmentStore: Send + Sync {
    async fn insert(&self, new: NewShipment) -> Result<Shipment, AppError>;
    async fn list_all(&self) -> Result<Vec<Shipment>, AppError>;
    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<Shipment>, AppError>;
    async fn mark_received(
        &self,
        id: Uuid,
        received_at: DateTime<Utc>,
    ) -> Result<Shipment, AppError>;
}

/// SQLSTATE 23505: unique constraint violated.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

/// Repository for the `shipments` table
#[derive(Clone)]
pub struct ShipmentRepository {
    pool: PgPool,
}

impl ShipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShipmentStore for ShipmentRepository {
    /// Insert a new shipment. The unique index on `tracking_number` is the
    /// safety net under the workflow's own duplicate check; a violation here
    /// surfaces as `Conflict` rather than a generic database error.
    #[tracing::instrument(skip(self), fields(db.table = "shipments", db.operation = "insert"))]
    async fn insert(&self, new: NewShipment) -> Result<Shipment, AppError> {
        let shipment = sqlx::query_as::<Postgres, Shipment>(
            r#"
            INSERT INTO shipments
                (tracking_number, carrier, status, sample_type, priority, expected_delivery_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&new.tracking_number)
        .bind(new.carrier.to_string())
        .bind(&new.status)
        .bind(&new.sample_type)
        .bind(new.priority.map(|p| p.to_string()))
        .bind(&new.expected_delivery_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Tracking number already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(shipment)
    }

    /// List all shipments, newest first. Pagination is applied by the caller.
    #[tracing::instrument(skip(self), fields(db.table = "shipments", db.operation = "select"))]
    async fn list_all(&self) -> Result<Vec<Shipment>, AppError> {
        let shipments = sqlx::query_as::<Postgres, Shipment>(
            "SELECT * FROM shipments ORDER BY date_created DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(shipments)
    }

    #[tracing::instrument(skip(self), fields(db.table = "shipments", db.operation = "select"))]
    async fn find_by_tracking_number(
        &self,
        tracking_number: &str,
    ) -> Result<Option<Shipment>, AppError> {
        let shipment = sqlx::query_as::<Postgres, Shipment>(
            "SELECT * FROM shipments WHERE tracking_number = $1",
        )
        .bind(tracking_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(shipment)
    }

    /// Stamp the receipt timestamp and force the delivered status. An unknown
    /// id is an error, not an empty success.
    #[tracing::instrument(skip(self), fields(db.table = "shipments", db.operation = "update", db.record_id = %id))]
    async fn mark_received(
        &self,
        id: Uuid,
        received_at: DateTime<Utc>,
    ) -> Result<Shipment, AppError> {
        let shipment = sqlx::query_as::<Postgres, Shipment>(
            r#"
            UPDATE shipments
            SET date_received = $2, status = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(received_at)
        .bind(DELIVERED_STATUS)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Shipment not found".to_string()))?;

        Ok(shipment)
    }
}
