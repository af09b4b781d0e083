use crate::application::layout_adapter::GridSettings;
use crate::domain::widget::WidgetTemplate;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub persistence: PersistenceSettings,
    #[serde(default)]
    pub dashboards: Vec<DashboardConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub addr: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PersistenceBackend {
    File,
    Http,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PersistenceSettings {
    pub backend: PersistenceBackend,
    #[serde(default = "default_layout_dir")]
    pub dir: PathBuf,
    pub url: Option<String>,
}

fn default_layout_dir() -> PathBuf {
    PathBuf::from("data/dashboards")
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            backend: PersistenceBackend::File,
            dir: default_layout_dir(),
            url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub id: String,
    pub title: String,
    #[serde(default = "default_editable")]
    pub editable: bool,
    /// Template ids placed on first load, before any layout was saved
    #[serde(default)]
    pub seed: Vec<String>,
    #[serde(default)]
    pub templates: Vec<WidgetTemplate>,
}

fn default_editable() -> bool {
    true
}

/// Load `config/dashboards` (any format the config crate understands) with
/// `DASHBOARD__SECTION__KEY` environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/dashboards")
}

pub fn load_app_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path))
        .add_source(config::Environment::with_prefix("DASHBOARD").separator("__"))
        .build()?;

    let app_config: AppConfig = settings.try_deserialize()?;
    validate(&app_config)?;
    Ok(app_config)
}

fn validate(app_config: &AppConfig) -> anyhow::Result<()> {
    for (i, dashboard) in app_config.dashboards.iter().enumerate() {
        if app_config.dashboards[..i].iter().any(|d| d.id == dashboard.id) {
            anyhow::bail!("dashboard id '{}' is configured twice", dashboard.id);
        }
        for template in &dashboard.templates {
            if template.default_layout.w == 0 || template.default_layout.h == 0 {
                anyhow::bail!(
                    "template '{}' of dashboard '{}' has an empty default layout",
                    template.id,
                    dashboard.id
                );
            }
        }
    }
    if app_config.persistence.backend == PersistenceBackend::Http && app_config.persistence.url.is_none() {
        anyhow::bail!("persistence.url is required for the http backend");
    }
    Ok(())
}
