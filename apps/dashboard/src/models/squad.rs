use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SquadRow {
    pub chat_id: i64,
    pub squad_name: Option<String>,
    pub invite_link: Option<String>,
    pub thorns_enabled: bool,
    pub hiring: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SquadMemberRow {
    pub squad_id: i64,
    pub user_id: i64,
    pub approved: bool,
}

/// Squad listing row with its approved member count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SquadSummaryRow {
    pub chat_id: i64,
    pub squad_name: Option<String>,
    pub hiring: bool,
    pub member_count: i64,
}
