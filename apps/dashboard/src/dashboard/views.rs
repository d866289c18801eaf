//! View-models handed to the rendering layer as JSON.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::equipment::{RosterTotals, Slot, SlotDisplay};
use crate::models::snapshot::CharacterRow;
use crate::models::user::UserRow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub name: String,
    pub handle: Option<String>,
}

impl From<&UserRow> for UserView {
    fn from(user: &UserRow) -> Self {
        Self {
            id: user.id,
            name: user.display_name(),
            handle: user.handle(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SquadListItem {
    pub chat_id: i64,
    pub name: String,
    pub member_count: i64,
    pub hiring: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub name: Option<String>,
    pub prof: Option<String>,
    pub castle: Option<String>,
    pub level: i32,
    pub attack: i32,
    pub defence: i32,
    pub updated_at: NaiveDateTime,
}

impl From<&CharacterRow> for CharacterSummary {
    fn from(c: &CharacterRow) -> Self {
        Self {
            name: c.name.clone(),
            prof: c.prof.clone(),
            castle: c.castle.clone(),
            level: c.level,
            attack: c.attack,
            defence: c.defence,
            updated_at: c.date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMember {
    pub user: UserView,
    /// `None` when the member never reported a profile.
    pub character: Option<CharacterSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterView {
    pub squad_id: i64,
    pub squad_name: String,
    pub members: Vec<RosterMember>,
    pub totals: RosterTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentRowView {
    pub user: UserView,
    pub level: i32,
    pub attack: i32,
    pub defence: i32,
    /// One cell per slot, in `EquipmentBoard::slots` order.
    pub cells: Vec<SlotDisplay>,
    /// Number of cells holding a recognised item.
    pub equipped: usize,
    pub reported_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentBoard {
    pub squad_id: i64,
    pub squad_name: String,
    pub slots: Vec<Slot>,
    pub rows: Vec<EquipmentRowView>,
    pub totals: RosterTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildRowView {
    pub user: UserView,
    pub building: Option<String>,
    pub progress_percent: i32,
    pub reported_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildBoard {
    pub squad_id: i64,
    pub squad_name: String,
    pub rows: Vec<BuildRowView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastleBoard {
    pub castle: Option<String>,
    pub characters: Vec<RosterMember>,
    pub totals: RosterTotals,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub id: i32,
    pub text: String,
    pub posted_at: NaiveDateTime,
    pub confirmed_count: i64,
}
