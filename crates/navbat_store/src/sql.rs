//! SQL implementation of the reservation record store.
//!
//! Timestamps are persisted as RFC3339 UTC text. Every stored value uses
//! the same format and offset, so lexicographic comparison in SQL matches
//! chronological comparison and range queries need no driver-side
//! timestamp support.

use chrono::{DateTime, Utc};
use navbat_common::{
    BoxFuture, NewReservation, Reservation, ReservationStatus, ReservationStore, StoreError,
};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::client::DbClient;

/// SQL implementation of the reservation store.
#[derive(Debug, Clone)]
pub struct SqlReservationStore {
    db_client: DbClient,
}

impl SqlReservationStore {
    /// Create a new SQL reservation store.
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// Create the reservation table if it does not exist.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        debug!("Initializing reservation schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS reservation (
                id TEXT PRIMARY KEY,
                subject_id TEXT NOT NULL,
                service_id TEXT NOT NULL,
                start_at TEXT NOT NULL,
                end_at TEXT NOT NULL,
                status TEXT NOT NULL
            )
        "#;

        self.db_client.execute(query).await?;

        info!("Reservation schema initialized successfully");
        Ok(())
    }
}

fn row_to_reservation(row: &AnyRow) -> Result<Reservation, StoreError> {
    let start_raw: String = row
        .try_get("start_at")
        .map_err(|e| StoreError::Decode(e.to_string()))?;
    let end_raw: String = row
        .try_get("end_at")
        .map_err(|e| StoreError::Decode(e.to_string()))?;
    let status_raw: String = row
        .try_get("status")
        .map_err(|e| StoreError::Decode(e.to_string()))?;

    Ok(Reservation {
        id: row
            .try_get("id")
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        subject_id: row
            .try_get("subject_id")
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        service_id: row
            .try_get("service_id")
            .map_err(|e| StoreError::Decode(e.to_string()))?,
        start: DateTime::parse_from_rfc3339(&start_raw)
            .map_err(|e| StoreError::Decode(format!("Invalid start_at: {e}")))?
            .with_timezone(&Utc),
        end: DateTime::parse_from_rfc3339(&end_raw)
            .map_err(|e| StoreError::Decode(format!("Invalid end_at: {e}")))?
            .with_timezone(&Utc),
        status: status_raw
            .parse::<ReservationStatus>()
            .map_err(StoreError::Decode)?,
    })
}

impl ReservationStore for SqlReservationStore {
    fn list_overlapping(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<Reservation>, StoreError> {
        Box::pin(async move {
            let query = r#"
                SELECT id, subject_id, service_id, start_at, end_at, status
                FROM reservation
                WHERE start_at < $1 AND end_at > $2 AND status = 'booked'
                ORDER BY start_at
            "#;

            let rows = sqlx::query(query)
                .bind(end.to_rfc3339())
                .bind(start.to_rfc3339())
                .fetch_all(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list overlapping reservations: {}", e);
                    StoreError::Unavailable(e.to_string())
                })?;

            rows.iter().map(row_to_reservation).collect()
        })
    }

    fn insert_reservation(
        &self,
        new: NewReservation,
    ) -> BoxFuture<'_, Reservation, StoreError> {
        Box::pin(async move {
            let reservation = Reservation {
                id: Uuid::new_v4().to_string(),
                subject_id: new.subject_id,
                service_id: new.service_id,
                start: new.start,
                end: new.end,
                status: ReservationStatus::Booked,
            };

            debug!(
                "Inserting reservation {} for subject {}",
                reservation.id, reservation.subject_id
            );

            let query = r#"
                INSERT INTO reservation (id, subject_id, service_id, start_at, end_at, status)
                VALUES ($1, $2, $3, $4, $5, $6)
            "#;

            sqlx::query(query)
                .bind(&reservation.id)
                .bind(&reservation.subject_id)
                .bind(&reservation.service_id)
                .bind(reservation.start.to_rfc3339())
                .bind(reservation.end.to_rfc3339())
                .bind(reservation.status.as_str())
                .execute(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to insert reservation: {}", e);
                    StoreError::InsertRejected(e.to_string())
                })?;

            info!("Reservation {} inserted successfully", reservation.id);
            Ok(reservation)
        })
    }

    fn conditional_update_status(
        &self,
        id: &str,
        subject_id: &str,
        expected_status: ReservationStatus,
        new_status: ReservationStatus,
    ) -> BoxFuture<'_, u64, StoreError> {
        let id = id.to_string();
        let subject_id = subject_id.to_string();

        Box::pin(async move {
            let query = r#"
                UPDATE reservation
                SET status = $1
                WHERE id = $2 AND subject_id = $3 AND status = $4
            "#;

            let result = sqlx::query(query)
                .bind(new_status.as_str())
                .bind(&id)
                .bind(&subject_id)
                .bind(expected_status.as_str())
                .execute(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to update reservation status: {}", e);
                    StoreError::Unavailable(e.to_string())
                })?;

            Ok(result.rows_affected())
        })
    }

    fn find_active(
        &self,
        subject_id: &str,
        now: DateTime<Utc>,
    ) -> BoxFuture<'_, Option<Reservation>, StoreError> {
        let subject_id = subject_id.to_string();

        Box::pin(async move {
            let query = r#"
                SELECT id, subject_id, service_id, start_at, end_at, status
                FROM reservation
                WHERE subject_id = $1 AND status = 'booked' AND end_at > $2
                LIMIT 1
            "#;

            let row = sqlx::query(query)
                .bind(&subject_id)
                .bind(now.to_rfc3339())
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find active reservation: {}", e);
                    StoreError::Unavailable(e.to_string())
                })?;

            row.as_ref().map(row_to_reservation).transpose()
        })
    }

    fn find_same_day(
        &self,
        subject_id: &str,
        service_id: &str,
        day_start: DateTime<Utc>,
        day_end: DateTime<Utc>,
    ) -> BoxFuture<'_, Option<Reservation>, StoreError> {
        let subject_id = subject_id.to_string();
        let service_id = service_id.to_string();

        Box::pin(async move {
            let query = r#"
                SELECT id, subject_id, service_id, start_at, end_at, status
                FROM reservation
                WHERE subject_id = $1 AND service_id = $2 AND status = 'booked'
                  AND start_at >= $3 AND start_at < $4
                LIMIT 1
            "#;

            let row = sqlx::query(query)
                .bind(&subject_id)
                .bind(&service_id)
                .bind(day_start.to_rfc3339())
                .bind(day_end.to_rfc3339())
                .fetch_optional(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to find same-day reservation: {}", e);
                    StoreError::Unavailable(e.to_string())
                })?;

            row.as_ref().map(row_to_reservation).transpose()
        })
    }

    fn list_for_subject(&self, subject_id: &str) -> BoxFuture<'_, Vec<Reservation>, StoreError> {
        let subject_id = subject_id.to_string();

        Box::pin(async move {
            let query = r#"
                SELECT id, subject_id, service_id, start_at, end_at, status
                FROM reservation
                WHERE subject_id = $1
                ORDER BY start_at
            "#;

            let rows = sqlx::query(query)
                .bind(&subject_id)
                .fetch_all(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to list reservations for subject: {}", e);
                    StoreError::Unavailable(e.to_string())
                })?;

            rows.iter().map(row_to_reservation).collect()
        })
    }
}
