use std::path::PathBuf;
use std::sync::Arc;

use crate::dashboard::Dashboard;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Dashboard>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(dashboard: Dashboard, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
            static_dir: static_dir.into(),
        }
    }

    pub fn backend_tag(&self) -> &'static str {
        self.dashboard.reader().store().backend_tag()
    }
}
