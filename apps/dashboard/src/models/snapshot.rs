//! Append-only, timestamped per-user records. Rows are never updated; a newer
//! row for the same user supersedes the older ones.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CharacterRow {
    pub user_id: i64,
    pub date: NaiveDateTime,
    pub name: Option<String>,
    pub prof: Option<String>,
    pub level: i32,
    pub attack: i32,
    pub defence: i32,
    pub exp: i32,
    pub castle: Option<String>,
    pub gold: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EquipRow {
    pub user_id: i64,
    pub date: NaiveDateTime,
    /// Newline-delimited loadout text as reported by the game.
    pub equip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BuildReportRow {
    pub user_id: i64,
    pub date: NaiveDateTime,
    pub building: Option<String>,
    pub progress_percent: i32,
    pub report_type: i32,
}

impl Snapshot for CharacterRow {
    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn taken_at(&self) -> NaiveDateTime {
        self.date
    }
}

impl Snapshot for EquipRow {
    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn taken_at(&self) -> NaiveDateTime {
        self.date
    }
}

impl Snapshot for BuildReportRow {
    fn owner_id(&self) -> i64 {
        self.user_id
    }

    fn taken_at(&self) -> NaiveDateTime {
        self.date
    }
}
