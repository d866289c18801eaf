use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use tracing::debug;

use crate::errors::AppError;
use crate::models::order::OrderRow;
use crate::models::snapshot::{BuildReportRow, CharacterRow, EquipRow};
use crate::models::squad::{SquadMemberRow, SquadRow, SquadSummaryRow};
use crate::models::user::UserRow;
use crate::store::{GuildSession, GuildStore};

/// `GuildStore` backed by the bot's PostgreSQL database.
#[derive(Clone)]
pub struct PgGuildStore {
    pool: PgPool,
}

impl PgGuildStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildStore for PgGuildStore {
    async fn session(&self) -> Result<Box<dyn GuildSession>, AppError> {
        let conn = self.pool.acquire().await?;
        Ok(Box::new(PgGuildSession { conn }))
    }
}

/// One pooled connection, returned to the pool on drop.
pub struct PgGuildSession {
    conn: PoolConnection<Postgres>,
}

#[async_trait]
impl GuildSession for PgGuildSession {
    async fn list_users(&mut self) -> Result<Vec<UserRow>, AppError> {
        Ok(sqlx::query_as::<_, UserRow>(
            "SELECT id, username, first_name, last_name, date_added FROM users ORDER BY id",
        )
        .fetch_all(&mut *self.conn)
        .await?)
    }

    async fn users_by_ids(&mut self, ids: &[i64]) -> Result<Vec<UserRow>, AppError> {
        Ok(sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, first_name, last_name, date_added
            FROM users
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *self.conn)
        .await?)
    }

    async fn list_squads(&mut self) -> Result<Vec<SquadSummaryRow>, AppError> {
        Ok(sqlx::query_as::<_, SquadSummaryRow>(
            r#"
            SELECT s.chat_id,
                   s.squad_name,
                   COALESCE(s.hiring, FALSE) AS hiring,
                   COUNT(m.user_id) FILTER (WHERE m.approved) AS member_count
            FROM squads s
            LEFT JOIN squad_members m ON m.squad_id = s.chat_id
            GROUP BY s.chat_id, s.squad_name, s.hiring
            ORDER BY s.squad_name
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?)
    }

    async fn squad(&mut self, chat_id: i64) -> Result<Option<SquadRow>, AppError> {
        Ok(sqlx::query_as::<_, SquadRow>(
            r#"
            SELECT chat_id,
                   squad_name,
                   invite_link,
                   COALESCE(thorns_enabled, TRUE) AS thorns_enabled,
                   COALESCE(hiring, FALSE) AS hiring
            FROM squads
            WHERE chat_id = $1
            "#,
        )
        .bind(chat_id)
        .fetch_optional(&mut *self.conn)
        .await?)
    }

    async fn squad_members(&mut self, chat_id: i64) -> Result<Vec<SquadMemberRow>, AppError> {
        Ok(sqlx::query_as::<_, SquadMemberRow>(
            r#"
            SELECT squad_id, user_id, approved
            FROM squad_members
            WHERE squad_id = $1 AND approved
            ORDER BY user_id
            "#,
        )
        .bind(chat_id)
        .fetch_all(&mut *self.conn)
        .await?)
    }

    async fn characters(
        &mut self,
        owners: Option<&[i64]>,
        castle: Option<&str>,
    ) -> Result<Vec<CharacterRow>, AppError> {
        let rows = sqlx::query_as::<_, CharacterRow>(
            r#"
            SELECT user_id, date, name, prof,
                   COALESCE(level, 0) AS level,
                   COALESCE(attack, 0) AS attack,
                   COALESCE(defence, 0) AS defence,
                   COALESCE(exp, 0) AS exp,
                   castle,
                   COALESCE(gold, 0) AS gold
            FROM characters
            WHERE ($1::BIGINT[] IS NULL OR user_id = ANY($1))
              AND ($2::TEXT IS NULL OR castle = $2)
            ORDER BY user_id, date
            "#,
        )
        .bind(owners)
        .bind(castle)
        .fetch_all(&mut *self.conn)
        .await?;
        debug!("Fetched {} character snapshots", rows.len());
        Ok(rows)
    }

    async fn equips(&mut self, owners: &[i64]) -> Result<Vec<EquipRow>, AppError> {
        let rows = sqlx::query_as::<_, EquipRow>(
            r#"
            SELECT user_id, date, equip
            FROM equip
            WHERE user_id = ANY($1)
            ORDER BY user_id, date
            "#,
        )
        .bind(owners)
        .fetch_all(&mut *self.conn)
        .await?;
        debug!("Fetched {} equipment snapshots", rows.len());
        Ok(rows)
    }

    async fn build_reports(&mut self, owners: &[i64]) -> Result<Vec<BuildReportRow>, AppError> {
        Ok(sqlx::query_as::<_, BuildReportRow>(
            r#"
            SELECT user_id, date, building,
                   COALESCE(progress_percent, 0) AS progress_percent,
                   COALESCE(report_type, 0) AS report_type
            FROM build_reports
            WHERE user_id = ANY($1)
            ORDER BY user_id, date
            "#,
        )
        .bind(owners)
        .fetch_all(&mut *self.conn)
        .await?)
    }

    async fn orders(&mut self, chat_id: i64) -> Result<Vec<OrderRow>, AppError> {
        Ok(sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.chat_id, o.text, o.date,
                   COUNT(c.user_id) AS confirmed_count
            FROM orders o
            LEFT JOIN order_cleared c ON c.order_id = o.id
            WHERE o.chat_id = $1
            GROUP BY o.id, o.chat_id, o.text, o.date
            ORDER BY o.date DESC
            "#,
        )
        .bind(chat_id)
        .fetch_all(&mut *self.conn)
        .await?)
    }
}
