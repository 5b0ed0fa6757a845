use sqlx::PgPool;

use crate::{error::AppResult, models::ClickedHotel};

/// Persistence of session click events
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ClickStore: Send + Sync {
    /// Records a click. Repeating a (session, hotel) pair is a no-op.
    async fn log_click(&self, session_id: &str, hotel_id: i64) -> AppResult<()>;

    /// Every distinct hotel the session has clicked, with its stored highlights
    async fn clicked_hotels(&self, session_id: &str) -> AppResult<Vec<ClickedHotel>>;
}

/// Click store backed by the `user_clicks` table
#[derive(Clone)]
pub struct PgClickStore {
    pool: PgPool,
}

impl PgClickStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ClickStore for PgClickStore {
    async fn log_click(&self, session_id: &str, hotel_id: i64) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_clicks (session_id, hotel_id)
            VALUES ($1, $2)
            ON CONFLICT (session_id, hotel_id) DO NOTHING
            "#,
        )
        .bind(session_id)
        .bind(hotel_id)
        .execute(&self.pool)
        .await?;

        tracing::debug!(
            session_id = %session_id,
            hotel_id,
            inserted = result.rows_affected(),
            "Click stored"
        );

        Ok(())
    }

    async fn clicked_hotels(&self, session_id: &str) -> AppResult<Vec<ClickedHotel>> {
        // LEFT JOIN keeps clicks on ids that have no hotel row
        let rows = sqlx::query_as::<_, ClickedHotel>(
            r#"
            SELECT c.hotel_id, h.highlights
            FROM user_clicks c
            LEFT JOIN hotels h ON h.id = c.hotel_id
            WHERE c.session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
