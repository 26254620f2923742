//! Schematics service: validated CRUD over stored floor-plan snapshots.
//!
//! DESIGN
//! ======
//! A schematic is a named snapshot of the editor's `AppState`. Every state
//! written here is first decoded by the floorplan core and re-encoded, so the
//! table only ever holds snapshots the editor can load back.

#[cfg(test)]
#[path = "schematics_test.rs"]
mod tests;

use floorplan::attach;
use floorplan::doc::AppState as PlanState;
use floorplan::error::EditorError;
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

// =============================================================================
// TYPES
// =============================================================================

/// Longest accepted schematic name, in characters.
pub const MAX_NAME_LEN: usize = 255;

#[derive(Debug, thiserror::Error)]
pub enum SchematicsError {
    #[error("schematic not found: {0}")]
    NotFound(Uuid),
    #[error("invalid schematic state: {0}")]
    InvalidState(#[from] EditorError),
    #[error("invalid schematic name: {0}")]
    InvalidName(String),
    #[error("failed to encode schematic state: {0}")]
    Encode(serde_json::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Row returned from schematic queries. Timestamps are Unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchematicRow {
    pub id: Uuid,
    pub name: String,
    pub state: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}

type RowTuple = (Uuid, String, serde_json::Value, i64, i64);

impl From<RowTuple> for SchematicRow {
    fn from((id, name, state, created_at, updated_at): RowTuple) -> Self {
        Self { id, name, state, created_at, updated_at }
    }
}

const RETURNING: &str = "RETURNING id, name, state, \
     (extract(epoch FROM created_at) * 1000)::int8, \
     (extract(epoch FROM updated_at) * 1000)::int8";

// =============================================================================
// VALIDATION
// =============================================================================

/// Trim `raw` and check it is a usable name.
///
/// # Errors
///
/// Returns [`SchematicsError::InvalidName`] for a blank or overlong name.
pub fn validate_name(raw: &str) -> Result<String, SchematicsError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(SchematicsError::InvalidName("name must not be empty".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(SchematicsError::InvalidName(format!("name longer than {MAX_NAME_LEN} characters")));
    }
    Ok(name.to_owned())
}

/// Decode a submitted snapshot. Accepts either a JSON object or a JSON
/// string holding the serialized snapshot.
///
/// # Errors
///
/// Returns [`SchematicsError::InvalidState`] if the snapshot does not decode.
pub fn decode_state(value: serde_json::Value) -> Result<PlanState, SchematicsError> {
    Ok(PlanState::from_json_value(value)?)
}

/// Decode a submitted snapshot, repair chair/table links, and re-encode it
/// into its stored form.
///
/// # Errors
///
/// Returns [`SchematicsError::InvalidState`] if the snapshot does not decode,
/// or [`SchematicsError::Encode`] if the repaired state cannot be re-encoded.
pub fn normalize_state(value: serde_json::Value) -> Result<serde_json::Value, SchematicsError> {
    let mut state = decode_state(value)?;
    state.elements = attach::reconcile(&state.elements);
    serde_json::to_value(&state).map_err(SchematicsError::Encode)
}

// =============================================================================
// CRUD
// =============================================================================

/// Create a new schematic.
///
/// # Errors
///
/// Returns a validation error for a bad name or state, or a database error.
pub async fn create_schematic(
    pool: &PgPool,
    name: &str,
    state: serde_json::Value,
) -> Result<SchematicRow, SchematicsError> {
    let name = validate_name(name)?;
    let state = normalize_state(state)?;
    let id = Uuid::new_v4();
    let row = sqlx::query_as::<_, RowTuple>(&format!(
        "INSERT INTO schematics (id, name, state) VALUES ($1, $2, $3) {RETURNING}"
    ))
    .bind(id)
    .bind(&name)
    .bind(&state)
    .fetch_one(pool)
    .await?;

    info!(%id, %name, "created schematic");
    Ok(row.into())
}

/// Fetch one schematic.
///
/// # Errors
///
/// Returns [`SchematicsError::NotFound`] for an unknown id, or a database error.
pub async fn get_schematic(pool: &PgPool, id: Uuid) -> Result<SchematicRow, SchematicsError> {
    let row = sqlx::query_as::<_, RowTuple>(
        "SELECT id, name, state, \
         (extract(epoch FROM created_at) * 1000)::int8, \
         (extract(epoch FROM updated_at) * 1000)::int8 \
         FROM schematics WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(SchematicsError::NotFound(id))?;
    Ok(row.into())
}

/// Replace a schematic's snapshot, and its name when one is given.
///
/// # Errors
///
/// Returns a validation error, [`SchematicsError::NotFound`], or a database error.
pub async fn replace_schematic(
    pool: &PgPool,
    id: Uuid,
    name: Option<&str>,
    state: serde_json::Value,
) -> Result<SchematicRow, SchematicsError> {
    let name = name.map(validate_name).transpose()?;
    let state = normalize_state(state)?;
    let row = sqlx::query_as::<_, RowTuple>(&format!(
        "UPDATE schematics SET name = COALESCE($2, name), state = $3, updated_at = now() \
         WHERE id = $1 {RETURNING}"
    ))
    .bind(id)
    .bind(name.as_deref())
    .bind(&state)
    .fetch_optional(pool)
    .await?
    .ok_or(SchematicsError::NotFound(id))?;

    info!(%id, "saved schematic");
    Ok(row.into())
}

/// Delete a schematic.
///
/// # Errors
///
/// Returns [`SchematicsError::NotFound`] for an unknown id, or a database error.
pub async fn delete_schematic(pool: &PgPool, id: Uuid) -> Result<(), SchematicsError> {
    let result = sqlx::query("DELETE FROM schematics WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(SchematicsError::NotFound(id));
    }
    info!(%id, "deleted schematic");
    Ok(())
}
