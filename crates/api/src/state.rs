use std::sync::Arc;

use crate::config::ServerConfig;

/// Handler state: the pool and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub pool: noda_db::DbPool,
    /// Server configuration, including the token signing secret.
    pub config: Arc<ServerConfig>,
}
