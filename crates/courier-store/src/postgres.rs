//! PostgreSQL notification store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use courier_core::error::{AppError, ErrorKind};
use courier_core::result::AppResult;
use courier_core::types::pagination::PageRequest;
use courier_entity::notification::model::Notification;

use crate::store::{NotificationQuery, NotificationStats, NotificationStore, NotificationUpdate};

/// Notification store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &NotificationQuery) {
        if let Some(recipient) = &query.recipient_key {
            builder.push(" AND recipient_key = ");
            builder.push_bind(recipient.clone());
        }
        if let Some(kind) = &query.kind {
            builder.push(" AND kind = ");
            builder.push_bind(kind.clone());
        }
        if let Some(status) = query.status {
            builder.push(" AND status = ");
            builder.push_bind(status);
        }
        if query.unread_only {
            builder.push(" AND read = FALSE");
        }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    async fn insert(&self, n: &Notification) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO notifications (\
                id, recipient_key, kind, title, message, data, resolved_channels, \
                delivery_outcomes, status, priority, attempts, max_attempts, last_error, \
                read, read_at, metadata, created_at, updated_at, scheduled_for, expires_at, sent_at\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)",
        )
        .bind(n.id)
        .bind(&n.recipient_key)
        .bind(&n.kind)
        .bind(&n.title)
        .bind(&n.message)
        .bind(&n.data)
        .bind(&n.resolved_channels)
        .bind(&n.delivery_outcomes)
        .bind(n.status)
        .bind(n.priority)
        .bind(n.attempts)
        .bind(n.max_attempts)
        .bind(&n.last_error)
        .bind(n.read)
        .bind(n.read_at)
        .bind(&n.metadata)
        .bind(n.created_at)
        .bind(n.updated_at)
        .bind(n.scheduled_for)
        .bind(n.expires_at)
        .bind(n.sent_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::StoreUnavailable,
                "Failed to insert notification",
                e,
            )
        })?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to fetch notification", e)
            })
    }

    async fn apply(&self, id: Uuid, update: NotificationUpdate) -> AppResult<()> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("UPDATE notifications SET updated_at = NOW()");

        if let Some(status) = update.status {
            builder.push(", status = ");
            builder.push_bind(status);
        }
        if let Some(outcomes) = update.delivery_outcomes {
            builder.push(", delivery_outcomes = ");
            builder.push_bind(outcomes);
        }
        if let Some(sent_at) = update.sent_at {
            builder.push(", sent_at = ");
            builder.push_bind(sent_at);
        }
        if let Some(attempts) = update.attempts {
            builder.push(", attempts = ");
            builder.push_bind(attempts);
        }
        if let Some(last_error) = update.last_error {
            builder.push(", last_error = ");
            builder.push_bind(last_error);
        }

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to update notification", e)
            })?;
        Ok(())
    }

    async fn mark_read(
        &self,
        id: Uuid,
        recipient_key: &str,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE, read_at = $3, updated_at = NOW() \
             WHERE id = $1 AND recipient_key = $2 AND read = FALSE",
        )
        .bind(id)
        .bind(recipient_key)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_all_read(&self, recipient_key: &str, at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notifications SET read = TRUE, read_at = $2, updated_at = NOW() \
             WHERE recipient_key = $1 AND read = FALSE",
        )
        .bind(recipient_key)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM notifications WHERE expires_at < $1 AND status != 'sent'")
                .bind(now)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to delete expired notifications",
                        e,
                    )
                })?;
        Ok(result.rows_affected())
    }

    async fn find_page(
        &self,
        query: &NotificationQuery,
        page: PageRequest,
    ) -> AppResult<Vec<Notification>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT * FROM notifications WHERE TRUE");
        Self::push_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(page.limit as i64);
        builder.push(" OFFSET ");
        builder.push_bind(page.offset as i64);

        builder
            .build_query_as::<Notification>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
            })
    }

    async fn count(&self, query: &NotificationQuery) -> AppResult<u64> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM notifications WHERE TRUE");
        Self::push_filters(&mut builder, query);

        let count: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
            })?;
        Ok(count as u64)
    }

    async fn statistics(&self, recipient_key: Option<&str>) -> AppResult<NotificationStats> {
        let row: (i64, i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE status = 'sent'), \
                    COUNT(*) FILTER (WHERE status = 'failed'), \
                    COUNT(*) FILTER (WHERE status = 'pending'), \
                    COUNT(*) FILTER (WHERE read = FALSE) \
             FROM notifications \
             WHERE ($1::text IS NULL OR recipient_key = $1)",
        )
        .bind(recipient_key)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate statistics", e)
        })?;

        Ok(NotificationStats {
            total: row.0,
            sent: row.1,
            failed: row.2,
            pending: row.3,
            unread: row.4,
        })
    }
}
