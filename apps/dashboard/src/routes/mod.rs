pub mod health;

use axum::{routing::get, Router};

use crate::dashboard::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/robots.txt", get(health::robots_handler))
        .route("/api/v1/users", get(handlers::handle_list_users))
        .route("/api/v1/squads", get(handlers::handle_list_squads))
        .route(
            "/api/v1/squads/:id/roster",
            get(handlers::handle_squad_roster),
        )
        .route(
            "/api/v1/squads/:id/equipment",
            get(handlers::handle_squad_equipment),
        )
        .route(
            "/api/v1/squads/:id/builds",
            get(handlers::handle_squad_builds),
        )
        .route(
            "/api/v1/squads/:id/orders",
            get(handlers::handle_squad_orders),
        )
        .route("/api/v1/characters", get(handlers::handle_characters))
        .with_state(state)
}
