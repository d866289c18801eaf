use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::dashboard::views::{
    BuildBoard, CastleBoard, EquipmentBoard, OrderView, RosterView, SquadListItem, UserView,
};
use crate::errors::AppError;
use crate::state::AppState;

const MAX_CASTLE_LEN: usize = 100;

#[derive(Deserialize)]
pub struct CastleQuery {
    pub castle: Option<String>,
}

/// GET /api/v1/users
pub async fn handle_list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserView>>, AppError> {
    let mut session = state.store.session().await?;
    Ok(Json(super::list_users(session.as_mut()).await?))
}

/// GET /api/v1/squads
pub async fn handle_list_squads(
    State(state): State<AppState>,
) -> Result<Json<Vec<SquadListItem>>, AppError> {
    let mut session = state.store.session().await?;
    Ok(Json(super::list_squads(session.as_mut()).await?))
}

/// GET /api/v1/squads/:id/roster
pub async fn handle_squad_roster(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> Result<Json<RosterView>, AppError> {
    let mut session = state.store.session().await?;
    Ok(Json(super::squad_roster(session.as_mut(), chat_id).await?))
}

/// GET /api/v1/squads/:id/equipment
pub async fn handle_squad_equipment(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> Result<Json<EquipmentBoard>, AppError> {
    let mut session = state.store.session().await?;
    let board = super::equipment_board(session.as_mut(), &state.catalog, chat_id).await?;
    Ok(Json(board))
}

/// GET /api/v1/squads/:id/builds
pub async fn handle_squad_builds(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> Result<Json<BuildBoard>, AppError> {
    let mut session = state.store.session().await?;
    Ok(Json(super::build_board(session.as_mut(), chat_id).await?))
}

/// GET /api/v1/squads/:id/orders
pub async fn handle_squad_orders(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
) -> Result<Json<Vec<OrderView>>, AppError> {
    let mut session = state.store.session().await?;
    Ok(Json(super::squad_orders(session.as_mut(), chat_id).await?))
}

/// GET /api/v1/characters?castle=
pub async fn handle_characters(
    State(state): State<AppState>,
    Query(params): Query<CastleQuery>,
) -> Result<Json<CastleBoard>, AppError> {
    let castle = params
        .castle
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    if castle.is_some_and(|c| c.chars().count() > MAX_CASTLE_LEN) {
        return Err(AppError::Validation(format!(
            "castle must be at most {MAX_CASTLE_LEN} characters"
        )));
    }
    let mut session = state.store.session().await?;
    Ok(Json(super::castle_board(session.as_mut(), castle).await?))
}
