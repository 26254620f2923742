//! Schematic snapshot routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use crate::services::schematics::{self, SchematicRow, SchematicsError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSchematicBody {
    pub name: String,
    pub state: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct ReplaceSchematicBody {
    pub name: Option<String>,
    pub state: serde_json::Value,
}

/// `POST /api/schematics`: store a new schematic.
pub async fn create_schematic(
    State(state): State<AppState>,
    Json(body): Json<CreateSchematicBody>,
) -> Result<(StatusCode, Json<SchematicRow>), StatusCode> {
    let row = schematics::create_schematic(&state.pool, &body.name, body.state)
        .await
        .map_err(schematics_error_to_status)?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// `GET /api/schematics/:id`: fetch one schematic.
pub async fn get_schematic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SchematicRow>, StatusCode> {
    let row = schematics::get_schematic(&state.pool, id)
        .await
        .map_err(schematics_error_to_status)?;
    Ok(Json(row))
}

/// `PUT /api/schematics/:id`: replace a schematic's snapshot.
pub async fn replace_schematic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReplaceSchematicBody>,
) -> Result<Json<SchematicRow>, StatusCode> {
    let row = schematics::replace_schematic(&state.pool, id, body.name.as_deref(), body.state)
        .await
        .map_err(schematics_error_to_status)?;
    Ok(Json(row))
}

/// `DELETE /api/schematics/:id`: delete a schematic.
pub async fn delete_schematic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    schematics::delete_schematic(&state.pool, id)
        .await
        .map_err(schematics_error_to_status)?;
    Ok(Json(serde_json::json!({ "ok": true })))
}

pub(crate) fn schematics_error_to_status(err: SchematicsError) -> StatusCode {
    match err {
        SchematicsError::NotFound(_) => StatusCode::NOT_FOUND,
        SchematicsError::InvalidState(e) => {
            warn!(error = %e, "rejected schematic state");
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SchematicsError::InvalidName(reason) => {
            warn!(%reason, "rejected schematic name");
            StatusCode::BAD_REQUEST
        }
        SchematicsError::Encode(e) => {
            error!(error = %e, "schematic state encode failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SchematicsError::Database(e) => {
            error!(error = %e, "schematics query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
#[path = "schematics_test.rs"]
mod tests;
