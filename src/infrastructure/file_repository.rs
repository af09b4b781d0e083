// JSON file implementation of LayoutRepository - one file per dashboard
use crate::application::layout_repository::LayoutRepository;
use crate::domain::widget::WidgetInstance;
use crate::error::DashboardError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct FileLayoutRepository {
    dir: PathBuf,
}

impl FileLayoutRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, dashboard_id: &str) -> PathBuf {
        // Ids come from configuration, but never let one escape the directory
        let file_name: String = dashboard_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }

    async fn read(path: &Path) -> Result<Option<Vec<WidgetInstance>>, DashboardError> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    async fn write(&self, path: &Path, widgets: &[WidgetInstance]) -> Result<(), DashboardError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_vec_pretty(widgets)?;

        // Write then rename so a crash never leaves a half-written layout
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl LayoutRepository for FileLayoutRepository {
    async fn load(&self, dashboard_id: &str) -> anyhow::Result<Option<Vec<WidgetInstance>>> {
        let path = self.path_for(dashboard_id);
        let widgets = Self::read(&path).await?;
        tracing::debug!(
            "Loaded layout for {} from {}: {}",
            dashboard_id,
            path.display(),
            widgets.as_ref().map_or(0, Vec::len)
        );
        Ok(widgets)
    }

    async fn save(&self, dashboard_id: &str, widgets: &[WidgetInstance]) -> anyhow::Result<()> {
        let path = self.path_for(dashboard_id);
        self.write(&path, widgets).await?;
        tracing::debug!("Wrote {} widgets to {}", widgets.len(), path.display());
        Ok(())
    }
}
