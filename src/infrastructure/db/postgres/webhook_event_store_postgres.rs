use crate::infrastructure::db::dto::WebhookEventRow;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::webhook_event_store::{
    WebhookEventRepositoryError, WebhookEventStore,
};
use async_trait::async_trait;
use sqlx::PgConnection;
use time::OffsetDateTime;

#[derive(Clone)]
pub struct WebhookEventStorePostgres {
    db: std::sync::Arc<PostgresDatabase>,
}

/// Uniqueness violations surface as `Conflict`; everything else means the store is unusable.
fn map_sqlx_error(err: sqlx::Error) -> WebhookEventRepositoryError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            WebhookEventRepositoryError::Conflict
        }
        _ => WebhookEventRepositoryError::StorageUnavailable,
    }
}

impl WebhookEventStorePostgres {
    /// Build a Postgres-backed webhook event store.
    pub fn new(db: std::sync::Arc<PostgresDatabase>) -> Self {
        Self { db }
    }

    async fn get_impl_conn(
        conn: &mut PgConnection,
        event_id: &str,
    ) -> Result<Option<WebhookEventRow>, WebhookEventRepositoryError> {
        let row = sqlx::query_as::<_, WebhookEventRow>(
            "SELECT
                event_id,
                event_type,
                payload_digest,
                created_at
            FROM webhook_events
            WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row)
    }

    async fn claim_impl_conn(
        conn: &mut PgConnection,
        row: &WebhookEventRow,
        expired_before: OffsetDateTime,
    ) -> Result<WebhookEventRow, WebhookEventRepositoryError> {
        // The conflict arm only fires for a record already past retention. A live record
        // makes the WHERE false, no row comes back, and the claim is refused.
        let stored = sqlx::query_as::<_, WebhookEventRow>(
            "INSERT INTO webhook_events (
                event_id,
                event_type,
                payload_digest,
                created_at
            )
            VALUES ($1,$2,$3,$4)
            ON CONFLICT (event_id) DO UPDATE SET
                event_type = EXCLUDED.event_type,
                payload_digest = EXCLUDED.payload_digest,
                created_at = EXCLUDED.created_at
            WHERE webhook_events.created_at < $5
            RETURNING
                event_id,
                event_type,
                payload_digest,
                created_at",
        )
        .bind(&row.event_id)
        .bind(&row.event_type)
        .bind(&row.payload_digest)
        .bind(row.created_at)
        .bind(expired_before)
        .fetch_optional(&mut *conn)
        .await
        .map_err(map_sqlx_error)?;

        match stored {
            Some(row) => Ok(row),
            None => Err(WebhookEventRepositoryError::Conflict),
        }
    }

    async fn delete_created_before_impl_conn(
        conn: &mut PgConnection,
        cutoff: OffsetDateTime,
    ) -> Result<u64, WebhookEventRepositoryError> {
        let result = sqlx::query("DELETE FROM webhook_events WHERE created_at < $1")
            .bind(cutoff)
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn ping_impl_conn(conn: &mut PgConnection) -> Result<(), WebhookEventRepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl WebhookEventStore for WebhookEventStorePostgres {
    async fn get(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRow>, WebhookEventRepositoryError> {
        let event_id = event_id.to_string();
        self.db
            .with_conn(move |conn| {
                let event_id = event_id;
                Box::pin(async move { Self::get_impl_conn(conn, &event_id).await })
            })
            .await
    }

    async fn claim(
        &self,
        row: &WebhookEventRow,
        expired_before: OffsetDateTime,
    ) -> Result<WebhookEventRow, WebhookEventRepositoryError> {
        let row = row.clone();
        self.db
            .with_conn(move |conn| {
                let row = row;
                Box::pin(async move { Self::claim_impl_conn(conn, &row, expired_before).await })
            })
            .await
    }

    async fn delete_created_before(
        &self,
        cutoff: OffsetDateTime,
    ) -> Result<u64, WebhookEventRepositoryError> {
        self.db
            .with_conn(move |conn| Box::pin(Self::delete_created_before_impl_conn(conn, cutoff)))
            .await
    }

    async fn ping(&self) -> Result<(), WebhookEventRepositoryError> {
        self.db
            .with_conn(|conn| Box::pin(Self::ping_impl_conn(conn)))
            .await
    }
}
