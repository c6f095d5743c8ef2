use std::sync::Arc;

use tokio::sync::RwLock;

use crate::backend::RigBackend;
use crate::config::Config;
use crate::dashboard::Dashboard;

/// Shared handle to the rendered dashboard.
pub type SharedDashboard = Arc<RwLock<Dashboard>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<dyn RigBackend>,
    pub dashboard: SharedDashboard,
}

impl AppState {
    pub fn new(config: Config, backend: Arc<dyn RigBackend>, dashboard: Dashboard) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            dashboard: Arc::new(RwLock::new(dashboard)),
        }
    }
}
