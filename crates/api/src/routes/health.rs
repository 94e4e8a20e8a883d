//! Public liveness check.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Reachability of the database at check time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Reachable,
    Unreachable,
}

#[derive(Debug, Serialize)]
pub struct Health {
    /// `ok`, or `degraded` while the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub database: Database,
}

impl Health {
    fn report(database: Database) -> Self {
        Self {
            status: match database {
                Database::Reachable => "ok",
                Database::Unreachable => "degraded",
            },
            version: env!("CARGO_PKG_VERSION"),
            database,
        }
    }
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<Health> {
    let database = match noda_db::health_check(&state.pool).await {
        Ok(()) => Database::Reachable,
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            Database::Unreachable
        }
    };
    Json(Health::report(database))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
