// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::application::dashboard_registry::{DashboardRegistry, DashboardSeed};
use crate::application::dashboard_service::DashboardDefinition;
use crate::application::layout_repository::{InMemoryLayoutRepository, LayoutRepository};
use crate::domain::catalog::WidgetCatalog;
use crate::infrastructure::config::{load_app_config, AppConfig, PersistenceBackend};
use crate::infrastructure::file_repository::FileLayoutRepository;
use crate::infrastructure::http_repository::HttpLayoutRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::events::stream_events;
use crate::presentation::handlers::{
    add_widget, begin_edit, configure_widget, duplicate_widget, get_dashboard, get_layout, get_layouts,
    health_check, list_dashboards, list_templates, remove_widget, render_dashboard, save_dashboard,
    select_widget, update_layout,
};
use crate::presentation::widgets::builtin_renderers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    infrastructure::logging::init();

    // Load configuration
    let app_config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository = build_repository(&app_config)?;

    // Mount dashboards (application layer)
    let renderers = Arc::new(builtin_renderers());
    let seeds = app_config
        .dashboards
        .iter()
        .map(|dashboard| DashboardSeed {
            definition: DashboardDefinition {
                id: dashboard.id.clone(),
                title: dashboard.title.clone(),
                editable: dashboard.editable,
                catalog: Arc::new(WidgetCatalog::new(dashboard.templates.clone())),
                renderers: renderers.clone(),
                grid: app_config.grid.clone(),
            },
            seed: dashboard.seed.clone(),
        })
        .collect();
    let dashboards = DashboardRegistry::load(seeds, repository).await;

    // Create application state
    let state = Arc::new(AppState { dashboards });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboards", get(list_dashboards))
        .route("/dashboards/:id", get(get_dashboard))
        .route("/dashboards/:id/templates", get(list_templates))
        .route("/dashboards/:id/layout", get(get_layout).post(update_layout))
        .route("/dashboards/:id/layouts", get(get_layouts))
        .route("/dashboards/:id/render", get(render_dashboard))
        .route("/dashboards/:id/events", get(stream_events))
        .route("/dashboards/:id/edit", post(begin_edit))
        .route("/dashboards/:id/save", post(save_dashboard))
        .route("/dashboards/:id/widgets", post(add_widget))
        .route(
            "/dashboards/:id/widgets/:widget_id",
            axum::routing::delete(remove_widget).patch(configure_widget),
        )
        .route("/dashboards/:id/widgets/:widget_id/duplicate", post(duplicate_widget))
        .route("/dashboards/:id/widgets/:widget_id/select", post(select_widget))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = app_config.server.addr;
    tracing::info!("Starting widget-dashboard service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}

fn build_repository(app_config: &AppConfig) -> anyhow::Result<Arc<dyn LayoutRepository>> {
    let persistence = &app_config.persistence;
    let repository: Arc<dyn LayoutRepository> = match persistence.backend {
        PersistenceBackend::File => {
            tracing::info!("Persisting layouts under {}", persistence.dir.display());
            Arc::new(FileLayoutRepository::new(persistence.dir.clone()))
        }
        PersistenceBackend::Http => {
            let url = persistence
                .url
                .clone()
                .ok_or_else(|| anyhow::anyhow!("persistence.url is required for the http backend"))?;
            tracing::info!("Persisting layouts to {}", url);
            Arc::new(HttpLayoutRepository::new(url)?)
        }
        PersistenceBackend::Memory => {
            tracing::warn!("Persisting layouts in memory; saves are lost on restart");
            Arc::new(InMemoryLayoutRepository::new())
        }
    };
    Ok(repository)
}
