// Application state for HTTP handlers
use crate::application::dashboard_registry::DashboardRegistry;

#[derive(Clone)]
pub struct AppState {
    pub dashboards: DashboardRegistry,
}
