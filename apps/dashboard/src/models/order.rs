use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An order posted to a squad chat, with the number of members who confirmed it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderRow {
    pub id: i32,
    pub chat_id: i64,
    pub text: Option<String>,
    pub date: NaiveDateTime,
    pub confirmed_count: i64,
}
