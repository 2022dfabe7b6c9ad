use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::health::StatusSnapshot;

use super::AdminState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub checkers: Vec<StatusSnapshot>,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        checkers: state.registry.snapshots(),
    })
}

pub async fn get_checker(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Json<StatusSnapshot>, StatusCode> {
    state
        .registry
        .get(&name)
        .map(|handle| Json(handle.snapshot()))
        .ok_or(StatusCode::NOT_FOUND)
}
