//! HTTP route handlers for the dashboard API.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde::Deserialize;
use tracing::warn;

use inspector::io::config::{InspectorConfig, load_config};
use inspector::io::store::{InspectionStore, JsonFileStore};
use inspector::record::StoredInspection;

use crate::state::AppState;

/// Build the API router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/inspections", get(list_inspections))
        .route("/inspections/{id}", get(get_inspection))
        .route("/config", get(get_config))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Deserialize)]
struct ListParams {
    /// Restrict the listing to one user's inspections.
    user: Option<String>,
}

fn store_for(state: &AppState) -> JsonFileStore {
    JsonFileStore::new(state.inspections_dir(), state.schema_path())
}

fn config_for(state: &AppState) -> Result<InspectorConfig, StatusCode> {
    load_config(&state.config_path()).map_err(|err| {
        warn!(error = %format!("{err:#}"), "failed to load config");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// GET /api/inspections - list saved inspections, newest first.
async fn list_inspections(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<StoredInspection>>, StatusCode> {
    let config = config_for(&state)?;
    let store = store_for(&state);

    let records = match params.user {
        Some(user) => store.list_inspections(&user, config.list_limit),
        None => store.load_all().map(|mut records| {
            records.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            });
            records.truncate(config.list_limit);
            records
        }),
    };

    match records {
        Ok(records) => Ok(Json(records)),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "failed to list inspections");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/inspections/:id - one inspection in full.
async fn get_inspection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<StoredInspection>, StatusCode> {
    let store = store_for(&state);
    match store.get_inspection(&id) {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            warn!(id = %id, error = %format!("{err:#}"), "failed to load inspection");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/config - the effective inspector configuration.
async fn get_config(State(state): State<AppState>) -> Result<Json<InspectorConfig>, StatusCode> {
    config_for(&state).map(Json)
}
