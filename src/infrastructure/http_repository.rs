// Backend API implementation of LayoutRepository
use crate::application::layout_repository::LayoutRepository;
use crate::domain::widget::WidgetInstance;
use crate::error::DashboardError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Stores layouts through the storefront backend:
/// `GET/PUT {base_url}/dashboards/{id}/widgets`
pub struct HttpLayoutRepository {
    client: Client,
    base_url: String,
}

impl HttpLayoutRepository {
    pub fn new(base_url: impl Into<String>) -> Result<Self, DashboardError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn widgets_url(&self, dashboard_id: &str) -> String {
        format!("{}/dashboards/{}/widgets", self.base_url, dashboard_id)
    }
}

#[async_trait]
impl LayoutRepository for HttpLayoutRepository {
    async fn load(&self, dashboard_id: &str) -> anyhow::Result<Option<Vec<WidgetInstance>>> {
        let response = self
            .client
            .get(self.widgets_url(dashboard_id))
            .send()
            .await
            .map_err(DashboardError::from)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let widgets = response
            .error_for_status()
            .map_err(DashboardError::from)?
            .json::<Vec<WidgetInstance>>()
            .await
            .map_err(DashboardError::from)?;
        Ok(Some(widgets))
    }

    async fn save(&self, dashboard_id: &str, widgets: &[WidgetInstance]) -> anyhow::Result<()> {
        self.client
            .put(self.widgets_url(dashboard_id))
            .json(widgets)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(DashboardError::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widgets_url_trims_trailing_slash() {
        let repo = HttpLayoutRepository::new("http://backend.local/api/").unwrap();
        assert_eq!(repo.widgets_url("admin"), "http://backend.local/api/dashboards/admin/widgets");
    }
}
