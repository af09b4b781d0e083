// Repository trait for persisted dashboard layouts
use crate::domain::widget::WidgetInstance;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[async_trait]
pub trait LayoutRepository: Send + Sync {
    /// Load the saved widget list for a dashboard, if one was ever saved
    async fn load(&self, dashboard_id: &str) -> anyhow::Result<Option<Vec<WidgetInstance>>>;

    /// Replace the saved widget list for a dashboard
    async fn save(&self, dashboard_id: &str, widgets: &[WidgetInstance]) -> anyhow::Result<()>;
}

/// Keeps saved layouts in process memory; nothing survives a restart
#[derive(Default)]
pub struct InMemoryLayoutRepository {
    layouts: RwLock<HashMap<String, Vec<WidgetInstance>>>,
}

impl InMemoryLayoutRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LayoutRepository for InMemoryLayoutRepository {
    async fn load(&self, dashboard_id: &str) -> anyhow::Result<Option<Vec<WidgetInstance>>> {
        Ok(self.layouts.read().await.get(dashboard_id).cloned())
    }

    async fn save(&self, dashboard_id: &str, widgets: &[WidgetInstance]) -> anyhow::Result<()> {
        self.layouts
            .write()
            .await
            .insert(dashboard_id.to_string(), widgets.to_vec());
        Ok(())
    }
}
