// Dashboard registry - the independently mounted dashboards of the service
use crate::application::dashboard_service::{DashboardService, DashboardDefinition};
use crate::application::layout_repository::LayoutRepository;
use crate::domain::dashboard::DashboardSummary;
use crate::error::DashboardError;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Dashboard to mount plus the template ids used when nothing was saved yet
pub struct DashboardSeed {
    pub definition: DashboardDefinition,
    pub seed: Vec<String>,
}

/// Each dashboard sits behind its own lock so requests against it apply one
/// at a time, in arrival order. Dashboards never share state.
#[derive(Clone)]
pub struct DashboardRegistry {
    dashboards: Vec<(String, Arc<Mutex<DashboardService>>)>,
}

impl DashboardRegistry {
    /// Mount every dashboard from its saved layout, falling back to the seed
    /// templates when there is no saved layout or it cannot be read.
    pub async fn load(seeds: Vec<DashboardSeed>, repository: Arc<dyn LayoutRepository>) -> Self {
        let mut dashboards = Vec::with_capacity(seeds.len());
        for DashboardSeed { definition, seed } in seeds {
            let id = definition.id.clone();
            let dashboard = match repository.load(&id).await {
                Ok(Some(widgets)) => DashboardService::mount(definition, widgets, repository.clone()),
                Ok(None) => DashboardService::mount_seeded(definition, &seed, repository.clone()),
                Err(e) => {
                    tracing::error!("Failed to load saved layout for {}: {:#}", id, e);
                    DashboardService::mount_seeded(definition, &seed, repository.clone())
                }
            };
            dashboards.push((id, Arc::new(Mutex::new(dashboard))));
        }
        Self { dashboards }
    }

    pub fn get(&self, dashboard_id: &str) -> Result<Arc<Mutex<DashboardService>>, DashboardError> {
        self.dashboards
            .iter()
            .find(|(id, _)| id == dashboard_id)
            .map(|(_, dashboard)| dashboard.clone())
            .ok_or_else(|| DashboardError::UnknownDashboard(dashboard_id.to_string()))
    }

    pub async fn list(&self) -> Vec<DashboardSummary> {
        let mut summaries = Vec::with_capacity(self.dashboards.len());
        for (_, dashboard) in &self.dashboards {
            let snapshot = dashboard.lock().await.snapshot();
            summaries.push(DashboardSummary::from(&snapshot));
        }
        summaries
    }
}
