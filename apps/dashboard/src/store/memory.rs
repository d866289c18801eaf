//! In-memory `GuildStore` for handler and dashboard tests.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::order::OrderRow;
use crate::models::snapshot::{BuildReportRow, CharacterRow, EquipRow};
use crate::models::squad::{SquadMemberRow, SquadRow, SquadSummaryRow};
use crate::models::user::UserRow;
use crate::store::{GuildSession, GuildStore};

#[derive(Default, Clone)]
pub struct MemoryStore {
    pub users: Vec<UserRow>,
    pub squads: Vec<SquadRow>,
    pub members: Vec<SquadMemberRow>,
    pub characters: Vec<CharacterRow>,
    pub equips: Vec<EquipRow>,
    pub build_reports: Vec<BuildReportRow>,
    pub orders: Vec<OrderRow>,
    /// When set, every call fails as if the database were unreachable.
    pub broken: bool,
}

impl MemoryStore {
    fn check(&self) -> Result<(), AppError> {
        if self.broken {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl GuildStore for MemoryStore {
    async fn session(&self) -> Result<Box<dyn GuildSession>, AppError> {
        self.check()?;
        Ok(Box::new(self.clone()))
    }
}

/// A session is a private copy of the fixture data.
#[async_trait]
impl GuildSession for MemoryStore {
    async fn list_users(&mut self) -> Result<Vec<UserRow>, AppError> {
        self.check()?;
        Ok(self.users.clone())
    }

    async fn users_by_ids(&mut self, ids: &[i64]) -> Result<Vec<UserRow>, AppError> {
        self.check()?;
        Ok(self.users.iter().filter(|u| ids.contains(&u.id)).cloned().collect())
    }

    async fn list_squads(&mut self) -> Result<Vec<SquadSummaryRow>, AppError> {
        self.check()?;
        let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
        for m in self.members.iter().filter(|m| m.approved) {
            *counts.entry(m.squad_id).or_default() += 1;
        }
        Ok(self
            .squads
            .iter()
            .map(|s| SquadSummaryRow {
                chat_id: s.chat_id,
                squad_name: s.squad_name.clone(),
                hiring: s.hiring,
                member_count: counts.get(&s.chat_id).copied().unwrap_or(0),
            })
            .collect())
    }

    async fn squad(&mut self, chat_id: i64) -> Result<Option<SquadRow>, AppError> {
        self.check()?;
        Ok(self.squads.iter().find(|s| s.chat_id == chat_id).cloned())
    }

    async fn squad_members(&mut self, chat_id: i64) -> Result<Vec<SquadMemberRow>, AppError> {
        self.check()?;
        Ok(self
            .members
            .iter()
            .filter(|m| m.squad_id == chat_id && m.approved)
            .cloned()
            .collect())
    }

    async fn characters(
        &mut self,
        owners: Option<&[i64]>,
        castle: Option<&str>,
    ) -> Result<Vec<CharacterRow>, AppError> {
        self.check()?;
        Ok(self
            .characters
            .iter()
            .filter(|c| owners.map_or(true, |o| o.contains(&c.user_id)))
            .filter(|c| castle.map_or(true, |k| c.castle.as_deref() == Some(k)))
            .cloned()
            .collect())
    }

    async fn equips(&mut self, owners: &[i64]) -> Result<Vec<EquipRow>, AppError> {
        self.check()?;
        Ok(self
            .equips
            .iter()
            .filter(|e| owners.contains(&e.user_id))
            .cloned()
            .collect())
    }

    async fn build_reports(&mut self, owners: &[i64]) -> Result<Vec<BuildReportRow>, AppError> {
        self.check()?;
        Ok(self
            .build_reports
            .iter()
            .filter(|r| owners.contains(&r.user_id))
            .cloned()
            .collect())
    }

    async fn orders(&mut self, chat_id: i64) -> Result<Vec<OrderRow>, AppError> {
        self.check()?;
        let mut orders: Vec<_> = self
            .orders
            .iter()
            .filter(|o| o.chat_id == chat_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(orders)
    }
}
