//! Data-access capability: the only place that talks to the database.
//!
//! Handlers never touch the pool directly. `AppState` carries an
//! `Arc<dyn GuildStore>`; each request opens one `GuildSession`, which holds a
//! single pooled connection until it is dropped at the end of the request.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::order::OrderRow;
use crate::models::snapshot::{BuildReportRow, CharacterRow, EquipRow};
use crate::models::squad::{SquadMemberRow, SquadRow, SquadSummaryRow};
use crate::models::user::UserRow;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgGuildStore;

#[async_trait]
pub trait GuildStore: Send + Sync {
    /// Opens a read session for one request.
    async fn session(&self) -> Result<Box<dyn GuildSession>, AppError>;
}

#[async_trait]
pub trait GuildSession: Send {
    async fn list_users(&mut self) -> Result<Vec<UserRow>, AppError>;

    async fn users_by_ids(&mut self, ids: &[i64]) -> Result<Vec<UserRow>, AppError>;

    async fn list_squads(&mut self) -> Result<Vec<SquadSummaryRow>, AppError>;

    async fn squad(&mut self, chat_id: i64) -> Result<Option<SquadRow>, AppError>;

    /// Approved members of a squad.
    async fn squad_members(&mut self, chat_id: i64) -> Result<Vec<SquadMemberRow>, AppError>;

    /// Character snapshots for the given users (all users when `owners` is
    /// `None`), restricted to one castle when `castle` is set.
    async fn characters(
        &mut self,
        owners: Option<&[i64]>,
        castle: Option<&str>,
    ) -> Result<Vec<CharacterRow>, AppError>;

    async fn equips(&mut self, owners: &[i64]) -> Result<Vec<EquipRow>, AppError>;

    async fn build_reports(&mut self, owners: &[i64]) -> Result<Vec<BuildReportRow>, AppError>;

    /// Orders posted to a squad chat, newest first.
    async fn orders(&mut self, chat_id: i64) -> Result<Vec<OrderRow>, AppError>;
}
